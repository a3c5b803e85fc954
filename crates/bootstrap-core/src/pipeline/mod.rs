//! Fail-fast bootstrap pipeline
//!
//! A sequence of external commands executed strictly in order. The first
//! non-zero outcome halts the pipeline; later stages assume earlier artifacts
//! exist, so there is no partial continuation and no retry. Optional steps
//! run through a separate entry point whose failures are reported but never
//! affect the exit status of the required stages.

use crate::runtime::command::CommandRunner;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use thiserror::Error;

/// A named external command with its working directory
#[derive(Debug, Clone)]
pub struct Stage {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Stage {
    pub fn new(name: &str, program: &str, args: &[&str], cwd: Option<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd,
        }
    }

    /// The invocation as the operator would type it
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// A required stage exited non-zero
#[derive(Debug, Error)]
#[error("Stage '{stage}' ({command}) failed with exit code {status}")]
pub struct StageError {
    pub stage: String,
    pub command: String,
    pub status: i32,
    pub stderr: String,
}

/// Run required stages strictly in sequence, fail-fast
pub async fn run_stages<R: CommandRunner>(stages: &[Stage], runner: &R) -> Result<()> {
    for stage in stages {
        println!();
        println!(
            "{} {} {}",
            "Running:".dimmed(),
            stage.name.bold(),
            format!("({})", stage.command_line()).dimmed()
        );
        let outcome = runner.run(stage).await?;
        if !outcome.success() {
            if !outcome.stderr.is_empty() {
                eprint!("{}", outcome.stderr);
            }
            return Err(StageError {
                stage: stage.name.clone(),
                command: stage.command_line(),
                status: outcome.status,
                stderr: outcome.stderr,
            }
            .into());
        }
    }
    Ok(())
}

/// Run an optional step; failure is reported and swallowed.
/// Returns whether the step succeeded.
pub async fn run_optional<R: CommandRunner>(stage: &Stage, runner: &R) -> bool {
    println!();
    println!(
        "{} {} {}",
        "Running:".dimmed(),
        stage.name.bold(),
        format!("({})", stage.command_line()).dimmed()
    );
    match runner.run(stage).await {
        Ok(outcome) if outcome.success() => true,
        Ok(outcome) => {
            eprintln!(
                "{}",
                format!(
                    "{} failed with exit code {} (continuing)",
                    stage.name, outcome.status
                )
                .yellow()
            );
            false
        }
        Err(e) => {
            eprintln!("{}", format!("{} failed: {} (continuing)", stage.name, e).yellow());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;

    fn stages() -> Vec<Stage> {
        vec![
            Stage::new("environment", "nix", &["build"], None),
            Stage::new("index", "cabal", &["update"], None),
            Stage::new("build", "cabal", &["build", "demo"], None),
            Stage::new("frontend", "npm", &["install"], None),
        ]
    }

    #[tokio::test]
    async fn test_all_stages_run_in_order() {
        let runner = ScriptedRunner::new();
        run_stages(&stages(), &runner).await.unwrap();
        assert_eq!(runner.executed(), vec!["environment", "index", "build", "frontend"]);
    }

    #[tokio::test]
    async fn test_fail_fast_halts_remaining_stages() {
        let runner = ScriptedRunner::failing_on("index");
        let err = run_stages(&stages(), &runner).await.unwrap_err();

        // Stage 2 failed: stages 3 and 4 never execute
        assert_eq!(runner.executed(), vec!["environment", "index"]);
        let stage_err = err.downcast_ref::<StageError>().unwrap();
        assert_eq!(stage_err.stage, "index");
        assert_ne!(stage_err.status, 0);
    }

    #[tokio::test]
    async fn test_optional_failure_is_swallowed() {
        let runner = ScriptedRunner::failing_on("gc");
        let stage = Stage::new("gc", "nix", &["store", "gc"], None);
        assert!(!run_optional(&stage, &runner).await);
    }

    #[test]
    fn test_command_line_rendering() {
        let stage = Stage::new("build", "cabal", &["build", "demo"], None);
        assert_eq!(stage.command_line(), "cabal build demo");
    }
}
