//! Pure decoders from serialized proof material to typed call arguments.

use alloy_primitives::U256;
use thiserror::Error;

use crate::layout::{
    groth16_proof_len, A_CHUNKS, B_CHUNKS, C_CHUNKS, COMMITMENT_COUNT_BYTES, FIELD_ELEMENT_BYTES,
    FR_MODULUS, GROTH16_PROOF_CHUNKS,
};
use crate::point::{CommitmentData, G1Point, G2Point, Groth16Proof};

/// Validation failure while mapping serialized bytes onto a proof layout.
///
/// Every variant is fatal for the invocation and is raised before any
/// external process runs.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The hex string itself could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// Public-input bytes do not divide into field-element chunks.
    #[error("public inputs are {len} bytes, expected a multiple of {width}")]
    UnalignedInputs { len: usize, width: usize },
    /// The proof payload has the wrong length for the selected layout.
    #[error("proof is {len} bytes, expected {expected}")]
    ProofLength { expected: usize, len: usize },
    /// The payload encodes a different number of public inputs than
    /// declared.
    #[error("public inputs encode {encoded} field elements, {declared} declared")]
    InputCountMismatch { declared: usize, encoded: usize },
    /// The embedded commitment counter disagrees with the declared count.
    #[error("proof encodes {encoded} commitments, {declared} declared")]
    CommitmentCountMismatch { declared: usize, encoded: usize },
    /// An empty proof payload can never verify.
    #[error("empty proof payload")]
    EmptyProof,
}

/// Splits `bytes` into field-element chunks and reduces each modulo the
/// scalar field, preserving stream order.
///
/// The division must be exact and the chunk count must equal `declared`;
/// a shortfall or surplus is an error, never a truncation.
pub fn decode_public_inputs(bytes: &[u8], declared: usize) -> Result<Vec<U256>, DecodeError> {
    if bytes.len() % FIELD_ELEMENT_BYTES != 0 {
        return Err(DecodeError::UnalignedInputs {
            len: bytes.len(),
            width: FIELD_ELEMENT_BYTES,
        });
    }
    let encoded = bytes.len() / FIELD_ELEMENT_BYTES;
    if encoded != declared {
        return Err(DecodeError::InputCountMismatch { declared, encoded });
    }
    Ok(bytes
        .chunks_exact(FIELD_ELEMENT_BYTES)
        .map(|chunk| U256::from_be_slice(chunk).reduce_mod(FR_MODULUS))
        .collect())
}

/// Decodes the eight fixed chunks of a plain Groth16 proof.
///
/// Coordinates are taken as raw big-endian integers and are not reduced:
/// the verifier contract range-checks its curve points itself, and
/// reducing here would repair malformed proofs instead of rejecting them.
pub fn decode_groth16_proof(bytes: &[u8]) -> Result<Groth16Proof, DecodeError> {
    let expected = groth16_proof_len(0);
    if bytes.len() != expected {
        return Err(DecodeError::ProofLength {
            expected,
            len: bytes.len(),
        });
    }
    Ok(groth16_points(bytes))
}

/// Decodes a commitment-carrying Groth16 proof: the fixed chunks, the
/// big-endian counter, `nb_commitments` commitment points and the trailing
/// proof of knowledge. A zero count is the plain layout and yields no
/// commitment data.
pub fn decode_groth16_committed(
    bytes: &[u8],
    nb_commitments: usize,
) -> Result<(Groth16Proof, Option<CommitmentData>), DecodeError> {
    if nb_commitments == 0 {
        return Ok((decode_groth16_proof(bytes)?, None));
    }

    let expected = groth16_proof_len(nb_commitments);
    if bytes.len() != expected {
        return Err(DecodeError::ProofLength {
            expected,
            len: bytes.len(),
        });
    }

    let core = FIELD_ELEMENT_BYTES * GROTH16_PROOF_CHUNKS;
    let encoded = u32::from_be_bytes([
        bytes[core],
        bytes[core + 1],
        bytes[core + 2],
        bytes[core + 3],
    ]) as usize;
    if encoded != nb_commitments {
        return Err(DecodeError::CommitmentCountMismatch {
            declared: nb_commitments,
            encoded,
        });
    }

    let tail = &bytes[core + COMMITMENT_COUNT_BYTES..];
    let commitments = (0..nb_commitments)
        .map(|i| G1Point {
            x: coordinate(tail, 2 * i),
            y: coordinate(tail, 2 * i + 1),
        })
        .collect();
    let proof_of_knowledge = G1Point {
        x: coordinate(tail, 2 * nb_commitments),
        y: coordinate(tail, 2 * nb_commitments + 1),
    };

    Ok((
        groth16_points(bytes),
        Some(CommitmentData {
            commitments,
            proof_of_knowledge,
        }),
    ))
}

/// PlonK proofs pass through opaque; only emptiness is rejected. The
/// contract takes the blob as `bytes` and does its own parsing.
pub fn decode_plonk_proof(bytes: &[u8]) -> Result<&[u8], DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyProof);
    }
    Ok(bytes)
}

/// Inverse of [`decode_public_inputs`] for values already below the
/// modulus.
pub fn encode_public_inputs(inputs: &[U256]) -> Vec<u8> {
    let mut out = Vec::with_capacity(inputs.len() * FIELD_ELEMENT_BYTES);
    for input in inputs {
        out.extend_from_slice(&input.to_be_bytes::<FIELD_ELEMENT_BYTES>());
    }
    out
}

fn coordinate(bytes: &[u8], chunk: usize) -> U256 {
    U256::from_be_slice(&bytes[FIELD_ELEMENT_BYTES * chunk..FIELD_ELEMENT_BYTES * (chunk + 1)])
}

fn groth16_points(bytes: &[u8]) -> Groth16Proof {
    let [ax, ay] = A_CHUNKS.map(|chunk| coordinate(bytes, chunk));
    let [bx0, bx1, by0, by1] = B_CHUNKS.map(|chunk| coordinate(bytes, chunk));
    let [cx, cy] = C_CHUNKS.map(|chunk| coordinate(bytes, chunk));
    Groth16Proof {
        a: G1Point { x: ax, y: ay },
        b: G2Point {
            x0: bx0,
            x1: bx1,
            y0: by0,
            y1: by1,
        },
        c: G1Point { x: cx, y: cy },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn be_chunk(value: U256) -> [u8; FIELD_ELEMENT_BYTES] {
        value.to_be_bytes::<FIELD_ELEMENT_BYTES>()
    }

    fn sequential_proof() -> Vec<u8> {
        let mut bytes = Vec::new();
        for value in 1..=GROTH16_PROOF_CHUNKS as u64 {
            bytes.extend_from_slice(&be_chunk(U256::from(value)));
        }
        bytes
    }

    fn committed_proof(nb: u32) -> Vec<u8> {
        let mut bytes = sequential_proof();
        bytes.extend_from_slice(&nb.to_be_bytes());
        for i in 0..2 * u64::from(nb) + 2 {
            bytes.extend_from_slice(&be_chunk(U256::from(100 + i)));
        }
        bytes
    }

    #[test]
    fn public_inputs_keep_stream_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&be_chunk(U256::from(7u64)));
        bytes.extend_from_slice(&be_chunk(U256::from(9u64)));
        let inputs = decode_public_inputs(&bytes, 2).unwrap();
        assert_eq!(inputs, vec![U256::from(7u64), U256::from(9u64)]);
    }

    #[test]
    fn public_inputs_are_reduced_modulo_r() {
        let bytes = be_chunk(FR_MODULUS + U256::from(5u64));
        let inputs = decode_public_inputs(&bytes, 1).unwrap();
        assert_eq!(inputs, vec![U256::from(5u64)]);
    }

    #[test]
    fn unaligned_public_inputs_are_rejected() {
        let err = decode_public_inputs(&[0u8; 33], 1).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnalignedInputs {
                len: 33,
                width: FIELD_ELEMENT_BYTES
            }
        );
    }

    #[test]
    fn input_count_mismatch_is_fatal() {
        let err = decode_public_inputs(&[0u8; 64], 3).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InputCountMismatch {
                declared: 3,
                encoded: 2
            }
        );
    }

    #[test]
    fn groth16_chunks_map_to_named_points() {
        let proof = decode_groth16_proof(&sequential_proof()).unwrap();
        assert_eq!(
            proof.a,
            G1Point {
                x: U256::from(1u64),
                y: U256::from(2u64)
            }
        );
        assert_eq!(
            proof.b,
            G2Point {
                x0: U256::from(3u64),
                x1: U256::from(4u64),
                y0: U256::from(5u64),
                y1: U256::from(6u64)
            }
        );
        assert_eq!(
            proof.c,
            G1Point {
                x: U256::from(7u64),
                y: U256::from(8u64)
            }
        );
    }

    #[test]
    fn groth16_length_must_be_exact() {
        for len in [0usize, 255, 257] {
            let err = decode_groth16_proof(&vec![0u8; len]).unwrap_err();
            assert_eq!(err, DecodeError::ProofLength { expected: 256, len });
        }
    }

    #[test]
    fn proof_coordinates_are_not_reduced() {
        let oversized = FR_MODULUS + U256::from(5u64);
        let mut bytes = sequential_proof();
        bytes[..FIELD_ELEMENT_BYTES].copy_from_slice(&be_chunk(oversized));
        let proof = decode_groth16_proof(&bytes).unwrap();
        assert_eq!(proof.a.x, oversized);
    }

    #[test]
    fn committed_proof_decodes_tail() {
        let (proof, data) = decode_groth16_committed(&committed_proof(2), 2).unwrap();
        let data = data.unwrap();
        assert_eq!(proof.c.y, U256::from(8u64));
        assert_eq!(data.commitments.len(), 2);
        assert_eq!(
            data.commitments[0],
            G1Point {
                x: U256::from(100u64),
                y: U256::from(101u64)
            }
        );
        assert_eq!(
            data.commitments[1],
            G1Point {
                x: U256::from(102u64),
                y: U256::from(103u64)
            }
        );
        assert_eq!(
            data.proof_of_knowledge,
            G1Point {
                x: U256::from(104u64),
                y: U256::from(105u64)
            }
        );
    }

    #[test]
    fn committed_counter_must_match_declared() {
        // Payload shaped for two commitments but the counter says one.
        let mut bytes = committed_proof(2);
        let core = FIELD_ELEMENT_BYTES * GROTH16_PROOF_CHUNKS;
        bytes[core..core + COMMITMENT_COUNT_BYTES].copy_from_slice(&1u32.to_be_bytes());
        let err = decode_groth16_committed(&bytes, 2).unwrap_err();
        assert_eq!(
            err,
            DecodeError::CommitmentCountMismatch {
                declared: 2,
                encoded: 1
            }
        );
    }

    #[test]
    fn committed_length_includes_tail() {
        let err = decode_groth16_committed(&sequential_proof(), 1).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ProofLength {
                expected: 388,
                len: 256
            }
        );
    }

    #[test]
    fn zero_commitments_fall_back_to_plain_layout() {
        let (proof, data) = decode_groth16_committed(&sequential_proof(), 0).unwrap();
        assert_eq!(proof.a.x, U256::from(1u64));
        assert!(data.is_none());
    }

    #[test]
    fn plonk_rejects_empty_payloads_only() {
        assert_eq!(decode_plonk_proof(&[]).unwrap_err(), DecodeError::EmptyProof);
        assert_eq!(decode_plonk_proof(&[0xab]).unwrap(), &[0xab]);
    }

    #[test]
    fn proof_roundtrips_through_canonical_layout() {
        let bytes = sequential_proof();
        let proof = decode_groth16_proof(&bytes).unwrap();
        assert_eq!(proof.to_bytes(), bytes);
        assert_eq!(decode_groth16_proof(&proof.to_bytes()).unwrap(), proof);
    }

    #[test]
    fn inputs_roundtrip_when_below_modulus() {
        let inputs = vec![U256::from(3u64), FR_MODULUS - U256::from(1u64)];
        let bytes = encode_public_inputs(&inputs);
        assert_eq!(decode_public_inputs(&bytes, 2).unwrap(), inputs);
    }
}
