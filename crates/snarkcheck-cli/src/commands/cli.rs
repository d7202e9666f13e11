use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

pub const VERSION: &str = "v0.1.0";

#[derive(Parser)]
#[command(
    name = "snarkcheck",
    version = VERSION,
    about = "Checks SNARK proofs against generated Solidity verifiers on a local dev node",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the verifier contract and generate its bindings
    Generate {
        /// Base directory for the contract and every generated file
        #[arg(long)]
        dir: PathBuf,

        /// Solidity file to compile, relative to --dir
        #[arg(long)]
        solidity: PathBuf,
    },

    /// Synthesize a verification harness and run it against the bindings
    #[command(group = ArgGroup::new("system").required(true))]
    Verify {
        /// Base directory holding the bindings and generated files
        #[arg(long)]
        dir: PathBuf,

        /// Hex encoded proof to verify
        #[arg(short = 'p', long)]
        proof: String,

        /// Hex encoded public inputs to verify
        #[arg(long)]
        public_inputs: String,

        /// Number of public inputs
        #[arg(short = 'n', long)]
        nb_public_inputs: usize,

        /// Use groth16 verification
        #[arg(long, group = "system")]
        groth16: bool,

        /// Use plonk verification
        #[arg(long, group = "system")]
        plonk: bool,

        /// Number of commitments in the proof
        #[arg(long, default_value_t = 0)]
        commitment: usize,
    },
}
