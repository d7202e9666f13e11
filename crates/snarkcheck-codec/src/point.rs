//! Named curve-point views over the serialized proof chunks.

use alloy_primitives::U256;

use crate::layout::{FIELD_ELEMENT_BYTES, GROTH16_PROOF_CHUNKS};

/// Affine bn254 G1 point with coordinates held as raw big-endian integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct G1Point {
    pub x: U256,
    pub y: U256,
}

/// Affine bn254 G2 point. The extension-field coordinates keep the limb
/// order of the serialized proof: x0, x1, y0, y1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct G2Point {
    pub x0: U256,
    pub x1: U256,
    pub y0: U256,
    pub y1: U256,
}

/// The (A, B, C) points of a Groth16 proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Groth16Proof {
    pub a: G1Point,
    pub b: G2Point,
    pub c: G1Point,
}

/// Commitment points and their proof of knowledge trailing a
/// commitment-carrying Groth16 proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitmentData {
    pub commitments: Vec<G1Point>,
    pub proof_of_knowledge: G1Point,
}

impl Groth16Proof {
    /// Coordinates in canonical chunk order.
    pub fn coordinates(&self) -> [U256; GROTH16_PROOF_CHUNKS] {
        [
            self.a.x, self.a.y, self.b.x0, self.b.x1, self.b.y0, self.b.y1, self.c.x, self.c.y,
        ]
    }

    /// Serializes the proof back into the canonical chunk layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(FIELD_ELEMENT_BYTES * GROTH16_PROOF_CHUNKS);
        for coordinate in self.coordinates() {
            out.extend_from_slice(&coordinate.to_be_bytes::<FIELD_ELEMENT_BYTES>());
        }
        out
    }
}
