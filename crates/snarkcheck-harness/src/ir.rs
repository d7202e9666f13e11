//! Target-neutral description of the verifier call a harness performs.
//!
//! A [`HarnessIr`] couples the decode plan for the serialized proof with the
//! ordered argument list of the contract call. The builders in this module
//! produce the three shapes the verifier exporter emits; the emitters under
//! [`crate::emit`] turn an IR into program text without re-deriving any of
//! the byte layout.

use snarkcheck_codec::layout::{A_CHUNKS, B_CHUNKS, C_CHUNKS, GROTH16_PROOF_CHUNKS};
use snarkcheck_codec::ProofSystem;
use thiserror::Error;

/// How the generated program takes the serialized proof apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofLayout {
    /// Fixed 32-byte chunks, optionally followed by the commitment tail.
    Chunked { nb_commitments: usize },
    /// The payload is handed to the contract whole.
    Opaque,
}

impl ProofLayout {
    fn nb_commitments(&self) -> usize {
        match self {
            Self::Chunked { nb_commitments } => *nb_commitments,
            Self::Opaque => 0,
        }
    }
}

/// Where one call argument's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentValue {
    /// Affine G1 point read from two proof chunks.
    G1Chunks { x: usize, y: usize },
    /// Affine G2 point read from four proof chunks, in serialized limb order.
    G2Chunks { x0: usize, x1: usize, y0: usize, y1: usize },
    /// Every commitment coordinate from the proof tail, flattened.
    CommitmentLimbs,
    /// The proof-of-knowledge point closing the proof tail.
    CommitmentPok,
    /// The whole proof payload, passed through untouched.
    OpaqueProof,
    /// The decoded public-input array.
    PublicInputs,
}

/// One argument of the verifier call, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallArgument {
    pub name: &'static str,
    pub value: ArgumentValue,
}

/// Structural defect in a harness template.
///
/// The builders on [`HarnessIr`] always produce templates that pass
/// [`HarnessIr::validate`]; these errors exist so a hand-assembled template
/// surfaces as a recoverable failure instead of broken program text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("proof chunk {chunk} is bound more than once")]
    DuplicateChunk { chunk: usize },
    #[error("proof chunk {chunk} is out of range for a {limit}-chunk proof")]
    ChunkOutOfRange { chunk: usize, limit: usize },
    #[error("argument `{name}` reads proof chunks but the proof is opaque")]
    ChunksUnavailable { name: &'static str },
    #[error("argument `{name}` reads commitment data but the layout carries none")]
    CommitmentsUnavailable { name: &'static str },
    #[error("argument `{name}` passes the proof through whole but the proof is chunked")]
    OpaqueUnavailable { name: &'static str },
    #[error("no argument binds the public inputs")]
    MissingPublicInputs,
    #[error("public inputs are bound more than once")]
    DuplicatePublicInputs,
}

/// The verifier call one harness performs: which contract and method to
/// invoke, how to decode the proof and which arguments to pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessIr {
    pub contract: &'static str,
    pub method: &'static str,
    pub layout: ProofLayout,
    pub arguments: Vec<CallArgument>,
}

impl HarnessIr {
    /// Selects the call shape for a proof system. A commitment count of
    /// zero falls back to the plain Groth16 shape; PlonK proofs carry any
    /// commitment material inside the opaque payload and have a single
    /// shape regardless of the count.
    pub fn for_system(system: ProofSystem) -> Self {
        match system {
            ProofSystem::Groth16 => Self::groth16(),
            ProofSystem::Groth16WithCommitments(0) => Self::groth16(),
            ProofSystem::Groth16WithCommitments(nb) => Self::groth16_committed(nb),
            ProofSystem::Plonk => Self::plonk(),
        }
    }

    /// `Verifier.verifyProof(a, b, c, input)`.
    pub fn groth16() -> Self {
        Self {
            contract: "Verifier",
            method: "verifyProof",
            layout: ProofLayout::Chunked { nb_commitments: 0 },
            arguments: vec![
                CallArgument {
                    name: "a",
                    value: ArgumentValue::G1Chunks {
                        x: A_CHUNKS[0],
                        y: A_CHUNKS[1],
                    },
                },
                CallArgument {
                    name: "b",
                    value: ArgumentValue::G2Chunks {
                        x0: B_CHUNKS[0],
                        x1: B_CHUNKS[1],
                        y0: B_CHUNKS[2],
                        y1: B_CHUNKS[3],
                    },
                },
                CallArgument {
                    name: "c",
                    value: ArgumentValue::G1Chunks {
                        x: C_CHUNKS[0],
                        y: C_CHUNKS[1],
                    },
                },
                CallArgument {
                    name: "input",
                    value: ArgumentValue::PublicInputs,
                },
            ],
        }
    }

    /// `Verifier.verifyProof(a, b, c, commitments, commitmentPok, input)`.
    pub fn groth16_committed(nb_commitments: usize) -> Self {
        let mut template = Self::groth16();
        template.layout = ProofLayout::Chunked { nb_commitments };
        template.arguments.insert(
            3,
            CallArgument {
                name: "commitments",
                value: ArgumentValue::CommitmentLimbs,
            },
        );
        template.arguments.insert(
            4,
            CallArgument {
                name: "commitment_pok",
                value: ArgumentValue::CommitmentPok,
            },
        );
        template
    }

    /// `PlonkVerifier.Verify(proof, input)`.
    pub fn plonk() -> Self {
        Self {
            contract: "PlonkVerifier",
            method: "Verify",
            layout: ProofLayout::Opaque,
            arguments: vec![
                CallArgument {
                    name: "proof_bytes",
                    value: ArgumentValue::OpaqueProof,
                },
                CallArgument {
                    name: "input",
                    value: ArgumentValue::PublicInputs,
                },
            ],
        }
    }

    /// Whether any argument passes the raw proof payload through.
    pub fn uses_opaque_proof(&self) -> bool {
        self.arguments
            .iter()
            .any(|argument| matches!(argument.value, ArgumentValue::OpaqueProof))
    }

    /// Checks that every argument can be produced from the declared layout,
    /// that no proof chunk feeds two arguments and that the public inputs
    /// are bound exactly once.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let mut bound = [false; GROTH16_PROOF_CHUNKS];
        let mut public_inputs = 0usize;
        for argument in &self.arguments {
            match argument.value {
                ArgumentValue::G1Chunks { x, y } => {
                    self.claim_chunks(&mut bound, argument.name, &[x, y])?;
                }
                ArgumentValue::G2Chunks { x0, x1, y0, y1 } => {
                    self.claim_chunks(&mut bound, argument.name, &[x0, x1, y0, y1])?;
                }
                ArgumentValue::CommitmentLimbs | ArgumentValue::CommitmentPok => {
                    if self.layout.nb_commitments() == 0 {
                        return Err(TemplateError::CommitmentsUnavailable {
                            name: argument.name,
                        });
                    }
                }
                ArgumentValue::OpaqueProof => {
                    if matches!(self.layout, ProofLayout::Chunked { .. }) {
                        return Err(TemplateError::OpaqueUnavailable {
                            name: argument.name,
                        });
                    }
                }
                ArgumentValue::PublicInputs => public_inputs += 1,
            }
        }
        match public_inputs {
            0 => Err(TemplateError::MissingPublicInputs),
            1 => Ok(()),
            _ => Err(TemplateError::DuplicatePublicInputs),
        }
    }

    fn claim_chunks(
        &self,
        bound: &mut [bool; GROTH16_PROOF_CHUNKS],
        name: &'static str,
        chunks: &[usize],
    ) -> Result<(), TemplateError> {
        if matches!(self.layout, ProofLayout::Opaque) {
            return Err(TemplateError::ChunksUnavailable { name });
        }
        for &chunk in chunks {
            if chunk >= GROTH16_PROOF_CHUNKS {
                return Err(TemplateError::ChunkOutOfRange {
                    chunk,
                    limit: GROTH16_PROOF_CHUNKS,
                });
            }
            if bound[chunk] {
                return Err(TemplateError::DuplicateChunk { chunk });
            }
            bound[chunk] = true;
        }
        Ok(())
    }
}
