//! Synthesis of throwaway verification harnesses.
//!
//! [`synthesize`] turns a hex-encoded proof and public-input pair into a
//! self-contained Rust program that deploys the generated verifier contract
//! on a local dev node and submits the proof once. The payloads are decoded
//! with [`snarkcheck_codec`] before any text is rendered, so a malformed
//! blob never reaches the external toolchain.

pub mod emit;
pub mod ir;

use snarkcheck_codec::{
    decode_groth16_committed, decode_groth16_proof, decode_plonk_proof, decode_public_inputs,
    DecodeError, ProofSystem,
};
use thiserror::Error;

use crate::ir::{HarnessIr, TemplateError};

/// Name of the bindings file the generated program compiles against.
pub const BINDINGS_FILE: &str = "bindings.rs";
/// Name of the generated program file.
pub const MAIN_FILE: &str = "main.rs";
/// Name of the generated module descriptor.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Exit code the generated program uses for a well-formed proof the
/// verifier rejected, distinguishing it from failures of the run itself.
pub const EXIT_PROOF_INVALID: i32 = 42;

/// A synthesized harness, ready to be written into a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessProgram {
    /// Program text for [`MAIN_FILE`].
    pub main_rs: String,
    /// Module descriptor text for [`MANIFEST_FILE`].
    pub manifest: String,
}

/// Failure to synthesize a harness.
#[derive(Debug, Error, PartialEq)]
pub enum SynthesisError {
    /// The proof or public-input payload failed validation.
    #[error("invalid input: {0}")]
    Input(#[from] DecodeError),
    /// The call template is structurally unsound.
    #[error("malformed template: {0}")]
    Template(#[from] TemplateError),
}

/// Validates the payloads against the declared proof system and renders the
/// matching harness program.
///
/// The hex strings are embedded verbatim in the generated program, which
/// repeats the same checks before touching the chain.
pub fn synthesize(
    system: ProofSystem,
    proof_hex: &str,
    input_hex: &str,
    nb_public_inputs: usize,
) -> Result<HarnessProgram, SynthesisError> {
    let proof = hex::decode(proof_hex).map_err(DecodeError::from)?;
    let inputs = hex::decode(input_hex).map_err(DecodeError::from)?;

    match system {
        ProofSystem::Groth16 => {
            decode_groth16_proof(&proof)?;
        }
        ProofSystem::Groth16WithCommitments(nb_commitments) => {
            decode_groth16_committed(&proof, nb_commitments)?;
        }
        ProofSystem::Plonk => {
            decode_plonk_proof(&proof)?;
        }
    }
    decode_public_inputs(&inputs, nb_public_inputs)?;

    let template = HarnessIr::for_system(system);
    template.validate()?;
    Ok(emit::rust::render(&template, proof_hex, input_hex, nb_public_inputs))
}
