use anyhow::{Context, Result};
use snarkcheck_harness::{synthesize, BINDINGS_FILE};
use tracing::{error, info, warn};

use crate::codegen;
use crate::config::{GenerateConfig, VerifyConfig};
use crate::runner::{HarnessRunner, Verdict};
use crate::toolchain::{AlloyBindings, BindingsArtifact, ProcessExecutor, Solc};

pub fn generate(config: &GenerateConfig) -> Result<()> {
    info!("generating verifier bindings in {}", config.dir.display());

    let executor = ProcessExecutor;
    let compiler = Solc::new(&executor);
    let artifact = codegen::generate(config, &compiler, &AlloyBindings)?;

    info!("bindings written to {}", artifact.path.display());
    Ok(())
}

pub fn verify(config: &VerifyConfig) -> Result<Verdict> {
    info!("verifying {} proof in {}", config.system, config.dir.display());

    let bindings = BindingsArtifact::existing(config.dir.join(BINDINGS_FILE))
        .context("no contract bindings found, run generate first")?;
    let program = synthesize(
        config.system,
        &config.proof_hex,
        &config.input_hex,
        config.nb_public_inputs,
    )?;

    let executor = ProcessExecutor;
    let verdict = HarnessRunner::new(&executor).run(&program, &bindings, &config.dir);
    match &verdict {
        Verdict::Valid => info!("proof accepted"),
        Verdict::Invalid => warn!("proof rejected"),
        Verdict::ToolchainFailure(detail) => error!("{detail}"),
    }

    Ok(verdict)
}
