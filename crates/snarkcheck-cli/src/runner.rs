use std::fmt;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use snarkcheck_harness::{HarnessProgram, EXIT_PROOF_INVALID, MAIN_FILE, MANIFEST_FILE};
use tracing::info;

use crate::toolchain::{BindingsArtifact, Executor, ToolchainError};

/// Outcome of one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The verifier accepted the proof.
    Valid,
    /// The verifier rejected a well-formed proof.
    Invalid,
    /// The pipeline failed before a verdict could be reached.
    ToolchainFailure(String),
}

impl Verdict {
    /// Process exit code mirroring the verdict: 0 valid, 42 invalid,
    /// 1 failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Verdict::Valid => ExitCode::SUCCESS,
            Verdict::Invalid => ExitCode::from(EXIT_PROOF_INVALID as u8),
            Verdict::ToolchainFailure(_) => ExitCode::FAILURE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Writing,
    DependencyResolution,
    Run,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Writing => write!(f, "writing harness"),
            Stage::DependencyResolution => write!(f, "resolving dependencies"),
            Stage::Run => write!(f, "running harness"),
        }
    }
}

/// Drives a synthesized harness through the external toolchain: writes it
/// next to the bindings, resolves its dependencies and runs it once.
///
/// Every stage failure short-circuits into [`Verdict::ToolchainFailure`];
/// only the harness process itself can produce the other two verdicts.
pub struct HarnessRunner<'a> {
    executor: &'a dyn Executor,
}

impl<'a> HarnessRunner<'a> {
    pub fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }

    pub fn run(
        &self,
        program: &HarnessProgram,
        bindings: &BindingsArtifact,
        workdir: &Path,
    ) -> Verdict {
        if let Err(err) = self.write_harness(program, bindings, workdir) {
            return Verdict::ToolchainFailure(format!("{}: {err}", Stage::Writing));
        }
        if let Err(err) = self.resolve_dependencies(workdir) {
            return Verdict::ToolchainFailure(format!("{}: {err}", Stage::DependencyResolution));
        }

        let args = vec!["run".to_string(), "--quiet".to_string()];
        let output = match self.executor.run("cargo", &args, workdir) {
            Ok(output) => output,
            Err(err) => return Verdict::ToolchainFailure(format!("{}: {err}", Stage::Run)),
        };
        match output.code {
            Some(0) => {
                info!("{}", output.stdout.trim_end());
                Verdict::Valid
            }
            Some(EXIT_PROOF_INVALID) => {
                info!("{}", output.stdout.trim_end());
                Verdict::Invalid
            }
            _ => Verdict::ToolchainFailure(format!("{}: {}", Stage::Run, output.failure())),
        }
    }

    fn write_harness(
        &self,
        program: &HarnessProgram,
        bindings: &BindingsArtifact,
        workdir: &Path,
    ) -> Result<(), ToolchainError> {
        // Checked again here so the runner is safe to call on its own.
        if !bindings.path.exists() {
            return Err(ToolchainError::MissingArtifact {
                path: bindings.path.clone(),
            });
        }
        info!("writing {MAIN_FILE} and {MANIFEST_FILE} to {}", workdir.display());
        fs::write(workdir.join(MAIN_FILE), &program.main_rs)?;
        fs::write(workdir.join(MANIFEST_FILE), &program.manifest)?;
        Ok(())
    }

    fn resolve_dependencies(&self, workdir: &Path) -> Result<(), ToolchainError> {
        let args = vec!["fetch".to_string()];
        self.executor.run("cargo", &args, workdir)?.expect_success()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use snarkcheck_codec::ProofSystem;
    use snarkcheck_harness::{synthesize, BINDINGS_FILE};
    use tempfile::TempDir;

    use crate::toolchain::CommandOutput;

    use super::*;

    /// Scripts cargo: `fetch` and `run` exit with the configured codes.
    struct FakeCargo {
        calls: RefCell<Vec<String>>,
        fetch_exit: i32,
        run_exit: i32,
        stdout: &'static str,
    }

    impl FakeCargo {
        fn new(fetch_exit: i32, run_exit: i32, stdout: &'static str) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fetch_exit,
                run_exit,
                stdout,
            }
        }
    }

    impl Executor for FakeCargo {
        fn run(
            &self,
            program: &str,
            args: &[String],
            _dir: &Path,
        ) -> Result<CommandOutput, ToolchainError> {
            let command = format!("{program} {}", args.join(" "));
            self.calls.borrow_mut().push(command.clone());
            let code = if args.first().map(String::as_str) == Some("fetch") {
                self.fetch_exit
            } else {
                self.run_exit
            };
            Ok(CommandOutput {
                command,
                code: Some(code),
                stdout: self.stdout.to_string(),
                stderr: String::new(),
            })
        }
    }

    fn program() -> HarnessProgram {
        let proof = "01".repeat(256);
        let inputs = "02".repeat(32);
        synthesize(ProofSystem::Groth16, &proof, &inputs, 1).unwrap()
    }

    fn workdir_with_bindings() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(BINDINGS_FILE), "// bindings").unwrap();
        dir
    }

    fn bindings(dir: &TempDir) -> BindingsArtifact {
        BindingsArtifact {
            path: dir.path().join(BINDINGS_FILE),
        }
    }

    #[test]
    fn clean_run_is_valid_and_writes_the_harness() {
        let dir = workdir_with_bindings();
        let cargo = FakeCargo::new(0, 0, "proof is valid\n");
        let program = program();

        let verdict = HarnessRunner::new(&cargo).run(&program, &bindings(&dir), dir.path());

        assert_eq!(verdict, Verdict::Valid);
        assert_eq!(
            *cargo.calls.borrow(),
            vec!["cargo fetch".to_string(), "cargo run --quiet".to_string()]
        );
        let main_rs = fs::read_to_string(dir.path().join(MAIN_FILE)).unwrap();
        assert_eq!(main_rs, program.main_rs);
        let manifest = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(manifest, program.manifest);
    }

    #[test]
    fn exit_42_maps_to_invalid() {
        let dir = workdir_with_bindings();
        let cargo = FakeCargo::new(0, 42, "proof is invalid\n");
        let verdict = HarnessRunner::new(&cargo).run(&program(), &bindings(&dir), dir.path());
        assert_eq!(verdict, Verdict::Invalid);
    }

    #[test]
    fn other_exit_codes_are_toolchain_failures() {
        let dir = workdir_with_bindings();
        let cargo = FakeCargo::new(0, 101, "error[E0308]: mismatched types\n");
        let verdict = HarnessRunner::new(&cargo).run(&program(), &bindings(&dir), dir.path());
        match verdict {
            Verdict::ToolchainFailure(detail) => {
                assert!(detail.contains("running harness"));
                assert!(detail.contains("exit code 101"));
                assert!(detail.contains("mismatched types"));
            }
            other => panic!("expected toolchain failure, got {other:?}"),
        }
    }

    #[test]
    fn fetch_failure_short_circuits_the_run() {
        let dir = workdir_with_bindings();
        let cargo = FakeCargo::new(1, 0, "");
        let verdict = HarnessRunner::new(&cargo).run(&program(), &bindings(&dir), dir.path());
        match verdict {
            Verdict::ToolchainFailure(detail) => {
                assert!(detail.contains("resolving dependencies"));
            }
            other => panic!("expected toolchain failure, got {other:?}"),
        }
        assert_eq!(*cargo.calls.borrow(), vec!["cargo fetch".to_string()]);
    }

    #[test]
    fn missing_bindings_abort_before_any_command() {
        let dir = TempDir::new().unwrap();
        let cargo = FakeCargo::new(0, 0, "");
        let verdict = HarnessRunner::new(&cargo).run(&program(), &bindings(&dir), dir.path());
        match verdict {
            Verdict::ToolchainFailure(detail) => {
                assert!(detail.contains("writing harness"));
                assert!(detail.contains("does not exist"));
            }
            other => panic!("expected toolchain failure, got {other:?}"),
        }
        assert!(cargo.calls.borrow().is_empty());
        assert!(!dir.path().join(MAIN_FILE).exists());
    }

    #[test]
    fn exit_codes_mirror_the_verdict() {
        // ExitCode has no accessors, so the mapping is pinned by constant.
        assert_eq!(EXIT_PROOF_INVALID, 42);
        let _ = Verdict::Valid.exit_code();
        let _ = Verdict::Invalid.exit_code();
        let _ = Verdict::ToolchainFailure(String::new()).exit_code();
    }
}
