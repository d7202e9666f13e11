//! Byte-layout codec for serialized bn254 proof material.
//!
//! This crate is the single source of truth for how Groth16 and PlonK
//! proofs and their public inputs map onto verifier-call arguments. The
//! in-process validators in [`decode`] and the statements the harness
//! emitter renders into generated programs both read the tables in
//! [`layout`], so the two sides cannot disagree about offsets or
//! reductions.

pub mod decode;
pub mod layout;
pub mod point;
pub mod system;

pub use decode::{
    decode_groth16_committed, decode_groth16_proof, decode_plonk_proof, decode_public_inputs,
    encode_public_inputs, DecodeError,
};
pub use point::{CommitmentData, G1Point, G2Point, Groth16Proof};
pub use system::ProofSystem;
