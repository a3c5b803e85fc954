//! Uniform external command execution
//!
//! Every collaborator (git, nix, cabal, npm, installer scripts) is invoked
//! through here and reduced to a `CmdOutcome`; only exit status and streamed
//! output are ever consumed.

use crate::pipeline::Stage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// Result of an external command
#[derive(Debug, Clone)]
pub struct CmdOutcome {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutcome {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Run a command to completion with captured output
pub fn run_captured(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CmdOutcome> {
    let mut command = std::process::Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    let output = command
        .output()
        .with_context(|| format!("Failed to run {}", program))?;
    Ok(CmdOutcome {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Executor seam for pipeline stages, so tests can script outcomes
#[async_trait]
pub trait CommandRunner {
    async fn run(&self, stage: &Stage) -> Result<CmdOutcome>;
}

/// Real executor: spawns the stage's command, echoes its output line by line
/// while accumulating it for the outcome
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, stage: &Stage) -> Result<CmdOutcome> {
        let mut command = TokioCommand::new(&stage.program);
        command
            .args(&stage.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &stage.cwd {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .with_context(|| format!("Failed to spawn {}", stage.program))?;

        let stdout = child.stdout.take().context("Failed to capture stdout")?;
        let stderr = child.stderr.take().context("Failed to capture stderr")?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let mut captured_out = String::new();
        let mut captured_err = String::new();
        let mut out_done = false;
        let mut err_done = false;

        while !(out_done && err_done) {
            tokio::select! {
                line = stdout_reader.next_line(), if !out_done => {
                    match line {
                        Ok(Some(line)) => {
                            println!("  {}", line);
                            captured_out.push_str(&line);
                            captured_out.push('\n');
                        }
                        Ok(None) => out_done = true,
                        Err(_) => out_done = true,
                    }
                }
                line = stderr_reader.next_line(), if !err_done => {
                    match line {
                        Ok(Some(line)) => {
                            eprintln!("  {}", line);
                            captured_err.push_str(&line);
                            captured_err.push('\n');
                        }
                        Ok(None) => err_done = true,
                        Err(_) => err_done = true,
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for {}", stage.program))?;

        Ok(CmdOutcome {
            status: status.code().unwrap_or(-1),
            stdout: captured_out,
            stderr: captured_err,
        })
    }
}
