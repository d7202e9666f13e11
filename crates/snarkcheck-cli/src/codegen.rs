use tracing::info;

use crate::config::GenerateConfig;
use crate::toolchain::{BindingGenerator, BindingsArtifact, SolidityCompiler, ToolchainError};

/// Compiles the verifier contract and renders its bindings.
///
/// Fail-fast: the binder only runs when compilation produced its artifact,
/// and compiler diagnostics are carried through verbatim.
pub fn generate(
    config: &GenerateConfig,
    compiler: &dyn SolidityCompiler,
    binder: &dyn BindingGenerator,
) -> Result<BindingsArtifact, ToolchainError> {
    let source = config.source_path();
    if !source.exists() {
        return Err(ToolchainError::MissingArtifact { path: source });
    }
    // The compiler runs inside the working directory, so it gets the
    // source name relative to it, not the invoker-resolved path.
    let contracts = compiler.compile(&config.solidity, &config.dir)?;
    info!("compiled {} contracts from {}", contracts.len(), source.display());
    binder.bind(&contracts, &config.dir)
}
