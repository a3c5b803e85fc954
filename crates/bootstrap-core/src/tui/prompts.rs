//! Charm-style CLI prompts using cliclack

use crate::git::GitCli;
use crate::product::TemplateConfig;
use crate::runtime::check;
use crate::runtime::command::SystemRunner;
use crate::wizard::{self, Prompter};
use anyhow::Result;

/// Prompter backed by cliclack inline prompts
pub struct CliclackPrompter;

impl Prompter for CliclackPrompter {
    fn input(&mut self, label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            Ok(cliclack::input(label).interact()?)
        } else {
            Ok(cliclack::input(label)
                .placeholder(default)
                .default_input(default)
                .interact()?)
        }
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        Ok(cliclack::confirm(label).initial_value(default).interact()?)
    }
}

/// Run the setup wizard with interactive prompts
pub async fn run<C: TemplateConfig>(config: &C) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: every tool the pipeline shells out to must be present
    check_runtimes()?;

    // Step 2: rename decision, rewrite, pipeline, optional extras
    let vcs = GitCli::new();
    let mut prompter = CliclackPrompter;
    let report = wizard::run_setup(config, &mut prompter, &SystemRunner, &vcs).await?;

    if report.renamed {
        cliclack::log::success(format!("Project personalized as '{}'", report.package))?;
    } else {
        cliclack::log::info("Template name kept; nothing to personalize")?;
    }

    cliclack::outro("Happy building!")?;

    Ok(())
}

fn check_runtimes() -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking runtimes...");

    match check::check_runtimes() {
        Ok(runtimes) => {
            let runtime_info: Vec<String> = runtimes
                .iter()
                .map(|r| {
                    format!("{} ({})", r.name, r.version.as_deref().unwrap_or("unknown"))
                })
                .collect();
            spinner.stop(format!("Detected runtimes: {}", runtime_info.join(", ")));
            Ok(())
        }
        Err(e) => {
            spinner.stop("Missing runtimes");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Please install the missing runtimes and try again.");
        }
    }
}
