//! Renders a harness IR into a standalone Rust crate.
//!
//! The emitted program embeds the proof and public inputs as hex constants,
//! re-validates them with statements rendered from the codec layout tables,
//! then deploys the verifier on a disposable anvil node and calls it once.

use snarkcheck_codec::layout::{
    groth16_proof_len, COMMITMENT_COUNT_BYTES, FIELD_ELEMENT_BYTES, FR_MODULUS_LIMBS,
    GROTH16_PROOF_CHUNKS,
};

use crate::ir::{ArgumentValue, CallArgument, HarnessIr, ProofLayout};
use crate::{HarnessProgram, BINDINGS_FILE, EXIT_PROOF_INVALID, MAIN_FILE};

/// Renders `main.rs` and the module descriptor for the given call shape.
///
/// Pure text construction: identical inputs yield byte-identical output.
pub fn render(
    ir: &HarnessIr,
    proof_hex: &str,
    input_hex: &str,
    nb_public_inputs: usize,
) -> HarnessProgram {
    HarnessProgram {
        main_rs: render_main(ir, proof_hex, input_hex, nb_public_inputs),
        manifest: render_manifest(),
    }
}

fn render_main(ir: &HarnessIr, proof_hex: &str, input_hex: &str, nb_public_inputs: usize) -> String {
    let mut out = String::new();
    out.push_str("//! Throwaway verification harness: deploys the verifier contract on a\n");
    out.push_str("//! disposable anvil node, submits the embedded proof once and reports\n");
    out.push_str("//! the outcome through the exit code.\n\n");
    out.push_str(&format!("#[path = \"{BINDINGS_FILE}\"]\n"));
    out.push_str("mod bindings;\n\n");
    if ir.uses_opaque_proof() {
        out.push_str("use alloy::primitives::{Bytes, U256};\n");
    } else {
        out.push_str("use alloy::primitives::U256;\n");
    }
    out.push_str("use alloy::providers::ProviderBuilder;\n");
    out.push_str("use eyre::{ensure, WrapErr};\n\n");

    out.push_str(&format!("const PROOF_HEX: &str = \"{proof_hex}\";\n"));
    out.push_str(&format!("const INPUT_HEX: &str = \"{input_hex}\";\n"));
    out.push_str(&format!(
        "const NB_PUBLIC_INPUTS: usize = {nb_public_inputs};\n"
    ));
    out.push_str(&format!(
        "const FIELD_ELEMENT_BYTES: usize = {FIELD_ELEMENT_BYTES};\n"
    ));
    match ir.layout {
        ProofLayout::Chunked { nb_commitments: 0 } => {
            out.push_str(&format!(
                "const PROOF_BYTES: usize = {};\n",
                groth16_proof_len(0)
            ));
        }
        ProofLayout::Chunked { nb_commitments } => {
            out.push_str(&format!(
                "const NB_COMMITMENTS: usize = {nb_commitments};\n"
            ));
            out.push_str(&format!(
                "const PROOF_BYTES: usize = {};\n",
                groth16_proof_len(nb_commitments)
            ));
            out.push_str(&format!(
                "const CORE_PROOF_BYTES: usize = {};\n",
                FIELD_ELEMENT_BYTES * GROTH16_PROOF_CHUNKS
            ));
            out.push_str(&format!(
                "const COMMITMENT_COUNT_BYTES: usize = {COMMITMENT_COUNT_BYTES};\n"
            ));
        }
        ProofLayout::Opaque => {}
    }
    out.push_str("const FR_MODULUS: U256 = U256::from_limbs([\n");
    for limb in FR_MODULUS_LIMBS {
        out.push_str(&format!("    0x{limb:016x},\n"));
    }
    out.push_str("]);\n\n");

    out.push_str("fn chunk(bytes: &[u8], index: usize) -> U256 {\n");
    out.push_str(
        "    U256::from_be_slice(&bytes[FIELD_ELEMENT_BYTES * index..FIELD_ELEMENT_BYTES * (index + 1)])\n",
    );
    out.push_str("}\n\n");

    out.push_str("#[tokio::main]\n");
    out.push_str("async fn main() -> eyre::Result<()> {\n");
    out.push_str("    if check_proof().await? {\n");
    out.push_str("        println!(\"proof is valid\");\n");
    out.push_str("        return Ok(());\n");
    out.push_str("    }\n");
    out.push_str("    println!(\"proof is invalid\");\n");
    out.push_str(&format!("    std::process::exit({EXIT_PROOF_INVALID});\n"));
    out.push_str("}\n\n");

    out.push_str("async fn check_proof() -> eyre::Result<bool> {\n");
    out.push_str("    let proof = hex::decode(PROOF_HEX).wrap_err(\"decode proof hex\")?;\n");
    out.push_str("    let inputs = hex::decode(INPUT_HEX).wrap_err(\"decode public-input hex\")?;\n\n");
    out.push_str(&render_proof_checks(ir.layout));
    out.push_str(&render_input_checks());
    out.push('\n');
    if let ProofLayout::Chunked { nb_commitments } = ir.layout {
        if nb_commitments > 0 {
            out.push_str("    let tail = &proof[CORE_PROOF_BYTES + COMMITMENT_COUNT_BYTES..];\n");
        }
    }
    for argument in &ir.arguments {
        out.push_str(&render_argument(argument, ir.layout));
    }
    out.push('\n');
    out.push_str("    // deploy the verifier on a fresh dev node and call it once\n");
    out.push_str("    let provider = ProviderBuilder::new().connect_anvil_with_wallet();\n");
    out.push_str(&format!(
        "    let verifier = bindings::{}::deploy(&provider).await?;\n",
        ir.contract
    ));
    let names: Vec<&str> = ir.arguments.iter().map(|argument| argument.name).collect();
    out.push_str("    let valid = verifier\n");
    out.push_str(&format!("        .{}({})\n", ir.method, names.join(", ")));
    out.push_str("        .call()\n");
    out.push_str("        .await?;\n");
    out.push_str("    Ok(valid)\n");
    out.push_str("}\n");
    out
}

fn render_proof_checks(layout: ProofLayout) -> String {
    let mut out = String::new();
    match layout {
        ProofLayout::Chunked { nb_commitments } => {
            out.push_str("    ensure!(\n");
            out.push_str("        proof.len() == PROOF_BYTES,\n");
            out.push_str("        \"proof is {} bytes, expected {PROOF_BYTES}\",\n");
            out.push_str("        proof.len()\n");
            out.push_str("    );\n");
            if nb_commitments > 0 {
                out.push_str("    let counter = u32::from_be_bytes([\n");
                out.push_str("        proof[CORE_PROOF_BYTES],\n");
                out.push_str("        proof[CORE_PROOF_BYTES + 1],\n");
                out.push_str("        proof[CORE_PROOF_BYTES + 2],\n");
                out.push_str("        proof[CORE_PROOF_BYTES + 3],\n");
                out.push_str("    ]) as usize;\n");
                out.push_str("    ensure!(\n");
                out.push_str("        counter == NB_COMMITMENTS,\n");
                out.push_str(
                    "        \"proof encodes {counter} commitments, {NB_COMMITMENTS} declared\"\n",
                );
                out.push_str("    );\n");
            }
        }
        ProofLayout::Opaque => {
            out.push_str("    ensure!(!proof.is_empty(), \"empty proof payload\");\n");
        }
    }
    out
}

fn render_input_checks() -> String {
    let mut out = String::new();
    out.push_str("    ensure!(\n");
    out.push_str("        inputs.len() % FIELD_ELEMENT_BYTES == 0,\n");
    out.push_str(
        "        \"public inputs are {} bytes, expected a multiple of {FIELD_ELEMENT_BYTES}\",\n",
    );
    out.push_str("        inputs.len()\n");
    out.push_str("    );\n");
    out.push_str("    ensure!(\n");
    out.push_str("        inputs.len() / FIELD_ELEMENT_BYTES == NB_PUBLIC_INPUTS,\n");
    out.push_str(
        "        \"public inputs encode {} field elements, {NB_PUBLIC_INPUTS} declared\",\n",
    );
    out.push_str("        inputs.len() / FIELD_ELEMENT_BYTES\n");
    out.push_str("    );\n");
    out
}

fn render_argument(argument: &CallArgument, layout: ProofLayout) -> String {
    let name = argument.name;
    match argument.value {
        ArgumentValue::G1Chunks { x, y } => {
            format!("    let {name} = [chunk(&proof, {x}), chunk(&proof, {y})];\n")
        }
        ArgumentValue::G2Chunks { x0, x1, y0, y1 } => format!(
            "    let {name} = [\n        [chunk(&proof, {x0}), chunk(&proof, {x1})],\n        [chunk(&proof, {y0}), chunk(&proof, {y1})],\n    ];\n"
        ),
        ArgumentValue::CommitmentLimbs => format!(
            "    let mut {name} = [U256::ZERO; 2 * NB_COMMITMENTS];\n    for (i, limb) in {name}.iter_mut().enumerate() {{\n        *limb = chunk(tail, i);\n    }}\n"
        ),
        ArgumentValue::CommitmentPok => format!(
            "    let {name} = [chunk(tail, 2 * NB_COMMITMENTS), chunk(tail, 2 * NB_COMMITMENTS + 1)];\n"
        ),
        ArgumentValue::OpaqueProof => format!("    let {name} = Bytes::from(proof);\n"),
        ArgumentValue::PublicInputs => render_input_decode(name, layout),
    }
}

fn render_input_decode(name: &str, layout: ProofLayout) -> String {
    let mut out = String::new();
    match layout {
        ProofLayout::Chunked { .. } => {
            // inputs are scalar-field elements; proof coordinates stay raw
            out.push_str(&format!(
                "    let mut {name} = [U256::ZERO; NB_PUBLIC_INPUTS];\n"
            ));
        }
        ProofLayout::Opaque => {
            out.push_str(&format!(
                "    let mut {name} = vec![U256::ZERO; NB_PUBLIC_INPUTS];\n"
            ));
        }
    }
    out.push_str(&format!(
        "    for (i, element) in {name}.iter_mut().enumerate() {{\n"
    ));
    out.push_str("        *element = chunk(&inputs, i).reduce_mod(FR_MODULUS);\n");
    out.push_str("    }\n");
    out
}

fn render_manifest() -> String {
    let mut out = String::new();
    out.push_str("[package]\n");
    out.push_str("name = \"tmpverifier\"\n");
    out.push_str("version = \"0.1.0\"\n");
    out.push_str("edition = \"2021\"\n");
    out.push_str("publish = false\n\n");
    out.push_str("[[bin]]\n");
    out.push_str("name = \"tmpverifier\"\n");
    out.push_str(&format!("path = \"{MAIN_FILE}\"\n\n"));
    out.push_str("[workspace]\n\n");
    out.push_str("[dependencies]\n");
    out.push_str("alloy = { version = \"1.0.32\", features = [\"full\", \"node-bindings\"] }\n");
    out.push_str("eyre = \"0.6.12\"\n");
    out.push_str("hex = \"0.4.3\"\n");
    out.push_str("tokio = { version = \"1.45.0\", features = [\"macros\", \"rt-multi-thread\"] }\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groth16_main_embeds_payloads_and_call_shape() {
        let ir = HarnessIr::groth16();
        let program = render(&ir, "aabb", "ccdd", 2);
        assert!(program.main_rs.contains("const PROOF_HEX: &str = \"aabb\";"));
        assert!(program.main_rs.contains("const INPUT_HEX: &str = \"ccdd\";"));
        assert!(program.main_rs.contains("const NB_PUBLIC_INPUTS: usize = 2;"));
        assert!(program.main_rs.contains("const PROOF_BYTES: usize = 256;"));
        assert!(program
            .main_rs
            .contains("let verifier = bindings::Verifier::deploy(&provider).await?;"));
        assert!(program.main_rs.contains(".verifyProof(a, b, c, input)"));
        assert!(program.main_rs.contains("std::process::exit(42);"));
        assert!(!program.main_rs.contains("NB_COMMITMENTS"));
    }

    #[test]
    fn committed_main_reads_the_tail_and_checks_the_counter() {
        let ir = HarnessIr::groth16_committed(2);
        let program = render(&ir, "aa", "bb", 1);
        assert!(program.main_rs.contains("const NB_COMMITMENTS: usize = 2;"));
        assert!(program.main_rs.contains("const PROOF_BYTES: usize = 452;"));
        assert!(program.main_rs.contains("const CORE_PROOF_BYTES: usize = 256;"));
        assert!(program.main_rs.contains("counter == NB_COMMITMENTS"));
        assert!(program
            .main_rs
            .contains("let tail = &proof[CORE_PROOF_BYTES + COMMITMENT_COUNT_BYTES..];"));
        assert!(program
            .main_rs
            .contains(".verifyProof(a, b, c, commitments, commitment_pok, input)"));
    }

    #[test]
    fn plonk_main_passes_the_payload_whole() {
        let ir = HarnessIr::plonk();
        let program = render(&ir, "aa", "bb", 1);
        assert!(program.main_rs.contains("use alloy::primitives::{Bytes, U256};"));
        assert!(program.main_rs.contains("ensure!(!proof.is_empty()"));
        assert!(program.main_rs.contains("let proof_bytes = Bytes::from(proof);"));
        assert!(program
            .main_rs
            .contains("let mut input = vec![U256::ZERO; NB_PUBLIC_INPUTS];"));
        assert!(program
            .main_rs
            .contains("let verifier = bindings::PlonkVerifier::deploy(&provider).await?;"));
        assert!(program.main_rs.contains(".Verify(proof_bytes, input)"));
        assert!(!program.main_rs.contains("PROOF_BYTES"));
    }

    #[test]
    fn modulus_limbs_come_from_the_shared_layout() {
        let program = render(&HarnessIr::groth16(), "aa", "bb", 1);
        for limb in FR_MODULUS_LIMBS {
            assert!(program.main_rs.contains(&format!("0x{limb:016x},")));
        }
    }

    #[test]
    fn manifest_targets_the_flat_crate_layout() {
        let program = render(&HarnessIr::groth16(), "aa", "bb", 1);
        assert!(program.manifest.contains("name = \"tmpverifier\""));
        assert!(program.manifest.contains("path = \"main.rs\""));
        assert!(program.manifest.contains("[workspace]"));
        assert!(program.manifest.contains("node-bindings"));
        assert!(program.manifest.contains("tokio"));
    }
}
