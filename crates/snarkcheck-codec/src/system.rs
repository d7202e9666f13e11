//! Proof-system selection.

use std::fmt;

/// Proof-system variant accepted by the checker.
///
/// The variant pins both the serialized proof layout and the shape of the
/// verifier call the generated harness performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofSystem {
    /// Plain Groth16: eight fixed chunks.
    Groth16,
    /// Groth16 with commitments: fixed chunks plus counter, commitment
    /// points and proof of knowledge.
    Groth16WithCommitments(usize),
    /// PlonK: opaque payload handed to the contract whole.
    Plonk,
}

impl ProofSystem {
    /// Folds a commitment count into the matching Groth16 flavor.
    pub fn groth16_with(nb_commitments: usize) -> Self {
        if nb_commitments == 0 {
            Self::Groth16
        } else {
            Self::Groth16WithCommitments(nb_commitments)
        }
    }
}

impl fmt::Display for ProofSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Groth16 => write!(f, "groth16"),
            Self::Groth16WithCommitments(nb) => write!(f, "groth16 ({nb} commitments)"),
            Self::Plonk => write!(f, "plonk"),
        }
    }
}
