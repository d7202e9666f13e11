use std::path::PathBuf;

use snarkcheck_codec::ProofSystem;

/// Immutable settings for one `generate` invocation.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Working directory owning every artifact of the invocation.
    pub dir: PathBuf,
    /// Contract source, relative to `dir`.
    pub solidity: PathBuf,
}

impl GenerateConfig {
    pub fn source_path(&self) -> PathBuf {
        self.dir.join(&self.solidity)
    }
}

/// Immutable settings for one `verify` invocation.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub dir: PathBuf,
    pub system: ProofSystem,
    pub proof_hex: String,
    pub input_hex: String,
    pub nb_public_inputs: usize,
}

impl VerifyConfig {
    /// Folds the CLI selector flags into a proof-system variant. The
    /// commitment count only forks the Groth16 side; a PlonK proof carries
    /// its commitment material inside the opaque payload.
    pub fn select_system(groth16: bool, nb_commitments: usize) -> ProofSystem {
        if groth16 {
            ProofSystem::groth16_with(nb_commitments)
        } else {
            ProofSystem::Plonk
        }
    }
}
