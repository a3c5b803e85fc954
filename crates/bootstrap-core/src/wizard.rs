//! One-shot setup wizard
//!
//! Drives `RenameDecision -> [Rewriting -> Committing] -> Building ->
//! AskInstallToolchain -> AskCleanStore -> Done` against injectable seams:
//! a `Prompter` for interactive answers, a `CommandRunner` for the pipeline,
//! and a `Vcs` for the repository. The exit status reflects the required
//! pipeline only; the two trailing installs are isolated extras.

use crate::git::Vcs;
use crate::pipeline::{run_optional, run_stages};
use crate::product::TemplateConfig;
use crate::rewrite::{personalize, RenameValues};
use crate::runtime::command::CommandRunner;
use crate::runtime::installer::Installer;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Interactive value resolution, independent of the terminal. Empty input
/// resolves to the derived default.
pub trait Prompter {
    fn input(&mut self, label: &str, default: &str) -> Result<String>;
    fn confirm(&mut self, label: &str, default: bool) -> Result<bool>;
}

/// What the wizard decided and did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub package: String,
    pub renamed: bool,
}

/// Default project name: the working-directory basename
fn derived_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Resolve the rename decision. When the directory basename already equals
/// the template's default name there is nothing to personalize: no prompts
/// at all, only the build pipeline runs. Entering the template name at the
/// prompt short-circuits the same way.
pub fn resolve_rename<C: TemplateConfig, P: Prompter>(
    config: &C,
    root: &Path,
    vcs: &dyn Vcs,
    prompter: &mut P,
) -> Result<Option<RenameValues>> {
    let derived = derived_name(root);
    if derived == config.name() {
        return Ok(None);
    }

    let package = prompter.input("Project name", &derived)?;
    if package == config.name() {
        return Ok(None);
    }

    let identity = vcs.identity();
    let author = prompter.input("Author name", identity.name.as_deref().unwrap_or(""))?;
    let email = prompter.input("Author email", identity.email.as_deref().unwrap_or(""))?;

    Ok(Some(RenameValues {
        package,
        author,
        email,
    }))
}

/// Run the whole setup flow. Returns the report on pipeline success;
/// optional-step failures are reported inline and never propagate.
pub async fn run_setup<C, P, R, V>(
    config: &C,
    prompter: &mut P,
    runner: &R,
    vcs: &V,
) -> Result<SetupReport>
where
    C: TemplateConfig,
    P: Prompter,
    R: CommandRunner,
    V: Vcs,
{
    let root = vcs.repo_root()?;

    let (package, renamed) = match resolve_rename(config, &root, vcs, prompter)? {
        Some(values) => {
            personalize(config, vcs, &root, &values)?;
            (values.package, true)
        }
        None => (config.name().to_string(), false),
    };

    run_stages(&config.build_stages(&root, &package), runner).await?;

    ask_install_toolchain(config, prompter).await?;

    if prompter.confirm("Run store garbage collection?", true)? {
        run_optional(&config.gc_stage(&root), runner).await;
    }

    Ok(SetupReport { package, renamed })
}

async fn ask_install_toolchain<C: TemplateConfig, P: Prompter>(
    config: &C,
    prompter: &mut P,
) -> Result<()> {
    let installer = Installer::new(config.installer());
    let label = format!("Install {}?", installer.config().display_name);
    if !prompter.confirm(&label, true)? {
        if prompter.confirm("Open the documentation instead?", false)? {
            if let Err(e) = installer.open_docs() {
                eprintln!("{}", format!("Could not open browser: {}", e).yellow());
            }
        } else {
            println!(
                "{}",
                format!("See {} for manual instructions", installer.config().docs_url).dimmed()
            );
        }
        return Ok(());
    }

    if installer.is_installed() {
        let version = installer
            .get_version()
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{}",
            format!(
                "{} already installed ({})",
                installer.config().display_name,
                version
            )
            .dimmed()
        );
        return Ok(());
    }

    // Installer failure must not invalidate the completed build
    if let Err(e) = installer.install().await {
        eprintln!("{}", format!("Installer failed: {} (continuing)", e).yellow());
        eprintln!(
            "{}",
            format!("See {} for manual instructions", installer.config().docs_url).dimmed()
        );
    }
    Ok(())
}
