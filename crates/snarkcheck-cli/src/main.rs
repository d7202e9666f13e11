use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use snarkcheck_cli::commands::{
    self,
    cli::{Cli, Commands},
};
use snarkcheck_cli::config::{GenerateConfig, VerifyConfig};

fn main() -> ExitCode {
    // Progress at info level by default, RUST_LOG directives extend it.
    let mut filter = EnvFilter::new("info");
    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        if let Ok(parsed) = env_filter.parse() {
            filter = filter.add_directive(parsed);
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Generate { dir, solidity } => {
            commands::command::generate(&GenerateConfig { dir, solidity })?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify {
            dir,
            proof,
            public_inputs,
            nb_public_inputs,
            groth16,
            plonk: _,
            commitment,
        } => {
            let config = VerifyConfig {
                dir,
                system: VerifyConfig::select_system(groth16, commitment),
                proof_hex: proof,
                input_hex: public_inputs,
                nb_public_inputs,
            };
            let verdict = commands::command::verify(&config)?;
            Ok(verdict.exit_code())
        }
    }
}
