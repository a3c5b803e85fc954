//! Chrysalis CLI - one-shot template setup and per-session environment composition

use anyhow::Result;
use bootstrap_core::env::{self, ComposeContext};
use bootstrap_core::git::GitCli;
use bootstrap_core::pipeline::Stage;
use bootstrap_core::runtime::installer::InstallerConfig;
use bootstrap_core::vendor::VendoredComponent;
use bootstrap_core::{doctor, TemplateConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Chrysalis template configuration
#[derive(Clone)]
pub struct ChrysalisConfig;

impl TemplateConfig for ChrysalisConfig {
    fn name(&self) -> &'static str {
        "chrysalis"
    }

    fn display_name(&self) -> &'static str {
        "Chrysalis"
    }

    fn author(&self) -> &'static str {
        "Chrysalis Maintainers"
    }

    fn email(&self) -> &'static str {
        "maintainers@chrysalis.dev"
    }

    fn template_readme(&self) -> &'static str {
        "PROJECT_README.md"
    }

    fn archived_readme(&self) -> &'static str {
        "docs/template-guide.md"
    }

    fn commit_message(&self) -> &'static str {
        "Initialize project"
    }

    fn config_file(&self) -> &'static str {
        ".chrysalis.conf"
    }

    fn frontend_dir(&self) -> &'static str {
        "frontend"
    }

    fn docs_url(&self) -> &'static str {
        "https://chrysalis.dev/docs"
    }

    fn vendored(&self) -> Vec<VendoredComponent> {
        vec![
            VendoredComponent {
                name: "toolkit",
                path: "vendor/toolkit",
                branch: "main",
            },
            VendoredComponent {
                name: "params",
                path: "vendor/params",
                branch: "main",
            },
        ]
    }

    fn toolkit_env_file(&self) -> &'static str {
        "vendor/toolkit/toolkit.env"
    }

    fn toolkit_sentinel(&self) -> &'static str {
        "CHRYSALIS_TOOLKIT_LOADED"
    }

    fn bin_link(&self, root: &Path) -> (PathBuf, PathBuf) {
        // Both the node distribution and the toolkit install a `chainctl`;
        // the toolkit's wins via a link on the session PATH
        (
            root.join(".bin/chainctl"),
            root.join("vendor/toolkit/bin/chainctl"),
        )
    }

    fn build_stages(&self, root: &Path, package: &str) -> Vec<Stage> {
        vec![
            Stage::new(
                "Building project environment",
                "nix",
                &["build"],
                Some(root.to_path_buf()),
            ),
            Stage::new(
                "Refreshing package index",
                "cabal",
                &["update"],
                Some(root.to_path_buf()),
            ),
            Stage::new(
                &format!("Building {}", package),
                "cabal",
                &["build", package],
                Some(root.to_path_buf()),
            ),
            Stage::new(
                "Installing front-end dependencies",
                "npm",
                &["install"],
                Some(root.join(self.frontend_dir())),
            ),
        ]
    }

    fn installer(&self) -> InstallerConfig {
        InstallerConfig {
            name: "chainctl",
            display_name: "node + chainctl",
            install_command: "bash scripts/install-node.sh",
            docs_url: "https://chrysalis.dev/docs",
        }
    }

    fn gc_stage(&self, root: &Path) -> Stage {
        Stage::new(
            "Collecting store garbage",
            "nix",
            &["store", "gc"],
            Some(root.to_path_buf()),
        )
    }
}

#[derive(Parser, Debug)]
#[command(name = "chrysalis-tools")]
#[command(about = "Setup wizard and session environment tooling for Chrysalis projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the one-time setup wizard (rename + build pipeline)
    Setup,
    /// Compose the session environment and print shell exports
    Env(EnvArgs),
    /// Check toolchain readiness (direnv, nix configuration)
    Doctor,
}

#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Also print direnv watch_file lines for the composed inputs
    #[arg(long)]
    pub watch: bool,
}

fn run_env(config: &ChrysalisConfig, args: &EnvArgs) -> Result<()> {
    let vcs = GitCli::new();
    let mut ctx = ComposeContext::default();
    let resolved = env::compose(config, &vcs, &mut ctx)?;

    if args.watch {
        for path in resolved.watch_files() {
            println!("watch_file \"{}\"", path.display());
        }
    }
    print!("{}", resolved.render_exports());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = ChrysalisConfig;

    match args.command {
        Some(Command::Env(env_args)) => run_env(&config, &env_args),
        Some(Command::Doctor) => {
            let passed = doctor::run_doctor()?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Setup) | None => {
            // Run the interactive wizard
            let result = bootstrap_core::run(&config).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
