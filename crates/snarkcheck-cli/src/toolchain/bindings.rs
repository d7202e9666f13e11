use std::fs;
use std::path::{Path, PathBuf};

use snarkcheck_harness::BINDINGS_FILE;
use tracing::info;

use super::solc::{AbiItem, AbiParam, CompiledContract};
use super::ToolchainError;

/// Handle to the bindings file the generated harness compiles against.
#[derive(Debug, Clone)]
pub struct BindingsArtifact {
    pub path: PathBuf,
}

impl BindingsArtifact {
    /// Wraps a bindings file that must already be on disk.
    pub fn existing(path: PathBuf) -> Result<Self, ToolchainError> {
        if path.exists() {
            Ok(Self { path })
        } else {
            Err(ToolchainError::MissingArtifact { path })
        }
    }
}

/// Renders compiled contracts into source bindings for the harness.
pub trait BindingGenerator {
    fn bind(
        &self,
        contracts: &[CompiledContract],
        out_dir: &Path,
    ) -> Result<BindingsArtifact, ToolchainError>;
}

/// [`BindingGenerator`] emitting `alloy::sol!` interface blocks with the
/// deploy bytecode attached. The typed expansion happens when cargo builds
/// the harness, so this step stays a pure text rendering.
pub struct AlloyBindings;

impl BindingGenerator for AlloyBindings {
    fn bind(
        &self,
        contracts: &[CompiledContract],
        out_dir: &Path,
    ) -> Result<BindingsArtifact, ToolchainError> {
        let mut source = String::from("//! Contract bindings rendered from solc output. Do not edit.\n");
        for contract in contracts {
            source.push('\n');
            source.push_str(&render_contract(contract)?);
        }
        let path = out_dir.join(BINDINGS_FILE);
        fs::write(&path, source)?;
        info!("generated bindings for {}", contract_names(contracts));
        Ok(BindingsArtifact { path })
    }
}

fn contract_names(contracts: &[CompiledContract]) -> String {
    contracts
        .iter()
        .map(|contract| contract.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_contract(contract: &CompiledContract) -> Result<String, ToolchainError> {
    let mut out = String::new();
    out.push_str("alloy::sol! {\n");
    if contract.bytecode.is_empty() {
        out.push_str("    #[sol(rpc)]\n");
    } else {
        out.push_str(&format!(
            "    #[sol(rpc, bytecode = \"{}\")]\n",
            contract.bytecode
        ));
    }
    out.push_str(&format!("    contract {} {{\n", contract.name));
    for item in &contract.abi {
        if let Some(rendered) = render_item(&contract.name, item)? {
            out.push_str("        ");
            out.push_str(&rendered);
            out.push('\n');
        }
    }
    out.push_str("    }\n");
    out.push_str("}\n");
    Ok(out)
}

fn render_item(contract: &str, item: &AbiItem) -> Result<Option<String>, ToolchainError> {
    let rendered = match item.kind.as_str() {
        "function" => {
            let mut signature = format!(
                "function {}({}) external",
                item.name,
                render_params(contract, &item.inputs, false)?
            );
            match item.state_mutability.as_deref() {
                Some("view") => signature.push_str(" view"),
                Some("pure") => signature.push_str(" pure"),
                Some("payable") => signature.push_str(" payable"),
                _ => {}
            }
            if !item.outputs.is_empty() {
                signature.push_str(&format!(
                    " returns ({})",
                    render_types(contract, &item.outputs)?
                ));
            }
            signature.push(';');
            Some(signature)
        }
        "constructor" => {
            let mut signature =
                format!("constructor({})", render_params(contract, &item.inputs, false)?);
            if item.state_mutability.as_deref() == Some("payable") {
                signature.push_str(" payable");
            }
            signature.push(';');
            Some(signature)
        }
        "event" => Some(format!(
            "event {}({});",
            item.name,
            render_params(contract, &item.inputs, true)?
        )),
        "error" => Some(format!(
            "error {}({});",
            item.name,
            render_params(contract, &item.inputs, false)?
        )),
        // fallback and receive carry nothing the harness could call
        _ => None,
    };
    Ok(rendered)
}

fn render_params(
    contract: &str,
    params: &[AbiParam],
    with_indexed: bool,
) -> Result<String, ToolchainError> {
    let mut rendered = Vec::with_capacity(params.len());
    for param in params {
        let mut piece = param_type(contract, param)?;
        if with_indexed && param.indexed {
            piece.push_str(" indexed");
        }
        if !param.name.is_empty() {
            piece.push(' ');
            piece.push_str(&param.name);
        }
        rendered.push(piece);
    }
    Ok(rendered.join(", "))
}

fn render_types(contract: &str, params: &[AbiParam]) -> Result<String, ToolchainError> {
    let mut rendered = Vec::with_capacity(params.len());
    for param in params {
        rendered.push(param_type(contract, param)?);
    }
    Ok(rendered.join(", "))
}

fn param_type(contract: &str, param: &AbiParam) -> Result<String, ToolchainError> {
    if param.ty.starts_with("tuple") || !param.components.is_empty() {
        return Err(ToolchainError::UnsupportedAbi {
            contract: contract.to_string(),
            reason: format!("tuple parameter `{}`", param.name),
        });
    }
    Ok(param.ty.clone())
}
