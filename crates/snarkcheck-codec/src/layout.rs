//! Byte-layout tables for serialized bn254 proofs and public inputs.
//!
//! Both halves of the pipeline read these tables: the in-process decoders
//! in [`crate::decode`] and the emitter that renders the same checks into
//! the generated harness. Keeping them in one place means the two decoders
//! cannot drift apart.

use alloy_primitives::U256;

/// Serialized width of one bn254 field element.
pub const FIELD_ELEMENT_BYTES: usize = 32;

/// Fixed chunk count of a Groth16 proof: two for A, four for B, two for C.
pub const GROTH16_PROOF_CHUNKS: usize = 8;

/// Width of the big-endian commitment counter that follows the fixed
/// chunks in a commitment-carrying proof.
pub const COMMITMENT_COUNT_BYTES: usize = 4;

/// Little-endian limbs of [`FR_MODULUS`], in the form the emitter renders
/// into generated source.
pub const FR_MODULUS_LIMBS: [u64; 4] = [
    0x43e1f593f0000001,
    0x2833e84879b97091,
    0xb85045b68181585d,
    0x30644e72e131a029,
];

/// Order of the bn254 scalar field. Public-input chunks are reduced modulo
/// this value; proof coordinates are not.
pub const FR_MODULUS: U256 = U256::from_limbs(FR_MODULUS_LIMBS);

/// Chunk indices of the proof points in stream order:
/// A.x, A.y, B.x0, B.x1, B.y0, B.y1, C.x, C.y.
pub const A_CHUNKS: [usize; 2] = [0, 1];
pub const B_CHUNKS: [usize; 4] = [2, 3, 4, 5];
pub const C_CHUNKS: [usize; 2] = [6, 7];

/// Exact serialized length of a Groth16 proof carrying `nb_commitments`
/// commitments. Plain proofs are the eight fixed chunks; committed proofs
/// append the counter, two limbs per commitment and the proof of
/// knowledge.
pub const fn groth16_proof_len(nb_commitments: usize) -> usize {
    let core = FIELD_ELEMENT_BYTES * GROTH16_PROOF_CHUNKS;
    if nb_commitments == 0 {
        core
    } else {
        core + COMMITMENT_COUNT_BYTES + FIELD_ELEMENT_BYTES * (2 * nb_commitments + 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_tables_are_disjoint_and_cover_the_proof() {
        let mut seen = [false; GROTH16_PROOF_CHUNKS];
        for chunk in A_CHUNKS.iter().chain(&B_CHUNKS).chain(&C_CHUNKS) {
            assert!(!seen[*chunk], "chunk {chunk} assigned twice");
            seen[*chunk] = true;
        }
        assert!(seen.iter().all(|covered| *covered));
    }

    #[test]
    fn committed_lengths_grow_by_two_chunks_per_commitment() {
        assert_eq!(groth16_proof_len(0), 256);
        assert_eq!(groth16_proof_len(1), 256 + 4 + 32 * 4);
        assert_eq!(groth16_proof_len(2), 256 + 4 + 32 * 6);
    }
}
