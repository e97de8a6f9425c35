// incident-backup/src/exec.rs
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use which::which;

use crate::errors::{AppError, Result};

/// One invocation of an external tool (pg_dump, psql, tar).
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            current_dir: None,
        }
    }
}

/// Seam between backup/restore flows and actual process spawning, so flows
/// can be exercised with deterministic fakes instead of real tools.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<()>;
}

/// Runs commands against the real system, resolving programs through PATH.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<()> {
        let program_path = which(&spec.program).map_err(|e| AppError::Spawn {
            program: spec.program.clone(),
            reason: format!(
                "{} executable not found in PATH ({}). Please ensure the required client tools are installed.",
                spec.program, e
            ),
        })?;

        let mut cmd = tokio::process::Command::new(&program_path);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|e| AppError::Spawn {
            program: spec.program.clone(),
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(AppError::Command {
                program: spec.program.clone(),
                status: output.status.to_string(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}
