//! Optional toolchain installer
//!
//! Wraps an external install script: checks whether the tool pair is already
//! present, streams the script's output while it runs, and gives up after a
//! timeout so a wedged download cannot hang the wizard forever.

use anyhow::Result;
use colored::Colorize;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for installation (a node build can legitimately take a while)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Configuration for an installable tool pair
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// Name of the binary whose presence marks the install complete
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// Shell command delegating to the external installer script
    pub install_command: &'static str,
    /// URL to the documentation
    pub docs_url: &'static str,
}

/// Manager for checking and installing the toolchain pair
pub struct Installer {
    config: InstallerConfig,
}

impl Installer {
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Check if the tool is installed and available in PATH
    pub fn is_installed(&self) -> bool {
        std::process::Command::new("which")
            .arg(self.config.name)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Get the installed tool version (if available)
    pub fn get_version(&self) -> Option<String> {
        std::process::Command::new(self.config.name)
            .arg("--version")
            .output()
            .ok()
            .and_then(|output| {
                if output.status.success() {
                    String::from_utf8(output.stdout)
                        .ok()
                        .map(|s| s.trim().to_string())
                } else {
                    None
                }
            })
    }

    /// Run the external installer script, streaming its output
    pub async fn install(&self) -> Result<()> {
        let cmd = self.config.install_command;
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let mut child = TokioCommand::new("sh")
            .arg("-c")
            .arg(cmd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().expect("Failed to capture stdout");
        let stderr = child.stderr.take().expect("Failed to capture stderr");

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let output_task = async {
            loop {
                tokio::select! {
                    line = stdout_reader.next_line() => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => break,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                break;
                            }
                        }
                    }
                    line = stderr_reader.next_line() => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => {}
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                            }
                        }
                    }
                }
            }
        };

        match timeout(INSTALL_TIMEOUT, output_task).await {
            Ok(_) => {}
            Err(_) => {
                let _ = child.kill().await;
                println!();
                anyhow::bail!(
                    "Installation timed out after {} seconds.\n\
                     Please try again later or run the installer manually:\n\
                     {}",
                    INSTALL_TIMEOUT.as_secs(),
                    cmd
                );
            }
        }

        match timeout(Duration::from_secs(5), child.wait()).await {
            Ok(Ok(status)) => {
                println!();
                if status.success() {
                    Ok(())
                } else {
                    anyhow::bail!(
                        "Installation failed with exit code: {}\n\
                         Please try running the installer manually: {}",
                        status.code().unwrap_or(-1),
                        cmd
                    );
                }
            }
            Ok(Err(e)) => {
                anyhow::bail!("Failed to wait for installer: {}", e);
            }
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!(
                    "Installation process hung. Please run the installer manually:\n{}",
                    cmd
                );
            }
        }
    }

    /// Open the tool's documentation in the default browser
    pub fn open_docs(&self) -> Result<()> {
        println!(
            "{}",
            format!(
                "Opening {} documentation in your browser...",
                self.config.display_name
            )
            .cyan()
        );
        open::that(self.config.docs_url)?;
        Ok(())
    }
}
