use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{Executor, ToolchainError};

/// Combined ABI and bytecode artifact solc writes into the output
/// directory.
pub const COMBINED_JSON: &str = "combined.json";

/// Compiles a contract source into ABI plus deploy bytecode.
///
/// The compiler runs with `out_dir` as its working directory and
/// `source` is resolved from there, so a relative working directory
/// means the same thing to the invoker and to the spawned process.
pub trait SolidityCompiler {
    fn compile(&self, source: &Path, out_dir: &Path)
        -> Result<Vec<CompiledContract>, ToolchainError>;
}

/// One contract out of solc's combined JSON output.
#[derive(Debug, Clone)]
pub struct CompiledContract {
    pub name: String,
    pub abi: Vec<AbiItem>,
    pub bytecode: String,
}

/// One entry of a contract ABI, as solc serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default, rename = "stateMutability")]
    pub state_mutability: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub components: Vec<AbiParam>,
}

#[derive(Deserialize)]
struct CombinedJson {
    contracts: BTreeMap<String, RawContract>,
}

#[derive(Deserialize)]
struct RawContract {
    abi: serde_json::Value,
    #[serde(default)]
    bin: String,
}

/// [`SolidityCompiler`] shelling out to `solc`.
pub struct Solc<'a> {
    executor: &'a dyn Executor,
}

impl<'a> Solc<'a> {
    pub fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }
}

impl SolidityCompiler for Solc<'_> {
    fn compile(
        &self,
        source: &Path,
        out_dir: &Path,
    ) -> Result<Vec<CompiledContract>, ToolchainError> {
        // All path arguments are relative to the child working directory.
        let args = vec![
            "--via-ir".to_string(),
            "--evm-version".to_string(),
            "paris".to_string(),
            "--combined-json".to_string(),
            "abi,bin".to_string(),
            source.display().to_string(),
            "-o".to_string(),
            ".".to_string(),
            "--overwrite".to_string(),
        ];
        self.executor.run("solc", &args, out_dir)?.expect_success()?;
        parse_combined_json(&out_dir.join(COMBINED_JSON))
    }
}

/// Parses solc's combined JSON, accepting both the current array form of
/// the `abi` field and the legacy form where it is a JSON string.
pub fn parse_combined_json(path: &Path) -> Result<Vec<CompiledContract>, ToolchainError> {
    if !path.exists() {
        return Err(ToolchainError::MissingArtifact {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path)?;
    let combined: CombinedJson =
        serde_json::from_str(&raw).map_err(|err| malformed(path, err.to_string()))?;
    if combined.contracts.is_empty() {
        return Err(malformed(path, "no contracts in output".to_string()));
    }

    let mut contracts = Vec::with_capacity(combined.contracts.len());
    for (key, raw) in combined.contracts {
        // Keys are `<source path>:<contract name>`.
        let name = match key.rsplit(':').next() {
            Some(name) => name.to_string(),
            None => key.clone(),
        };
        let abi = match raw.abi {
            serde_json::Value::String(encoded) => serde_json::from_str(&encoded)
                .map_err(|err| malformed(path, err.to_string()))?,
            value => {
                serde_json::from_value(value).map_err(|err| malformed(path, err.to_string()))?
            }
        };
        contracts.push(CompiledContract {
            name,
            abi,
            bytecode: raw.bin,
        });
    }
    Ok(contracts)
}

fn malformed(path: &Path, reason: String) -> ToolchainError {
    ToolchainError::MalformedArtifact {
        path: path.to_path_buf(),
        reason,
    }
}
