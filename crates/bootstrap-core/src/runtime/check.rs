//! Runtime detection for the tools the wizard and composer shell out to

use anyhow::Result;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

fn probe(name: &'static str, program: &str, args: &[&str]) -> RuntimeInfo {
    let output = Command::new(program).args(args).output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if git is available
pub fn check_git() -> RuntimeInfo {
    probe("git", "git", &["--version"])
}

/// Check if nix is available
pub fn check_nix() -> RuntimeInfo {
    probe("nix", "nix", &["--version"])
}

/// Check if cabal is available
pub fn check_cabal() -> RuntimeInfo {
    probe("cabal", "cabal", &["--version"])
}

/// Check if npm is available
pub fn check_npm() -> RuntimeInfo {
    probe("npm", "npm", &["--version"])
}

/// Check if direnv is available (version gate lives in the doctor)
pub fn check_direnv() -> RuntimeInfo {
    probe("direnv", "direnv", &["--version"])
}

/// Probe every tool the setup pipeline requires; fail listing all missing ones
pub fn check_runtimes() -> Result<Vec<RuntimeInfo>> {
    let probes = [
        (check_git(), "git (install from https://git-scm.com)"),
        (check_nix(), "nix (install from https://nixos.org/download)"),
        (check_cabal(), "cabal (ships with the nix dev shell or ghcup)"),
        (check_npm(), "npm (install from https://nodejs.org)"),
    ];

    let mut results = Vec::new();
    let mut missing = Vec::new();

    for (info, hint) in probes {
        if info.available {
            results.push(info);
        } else {
            missing.push(hint);
        }
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required runtimes:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_unavailable_tool() {
        let info = probe("ghost", "definitely-not-a-real-binary-name", &["--version"]);
        assert!(!info.available);
        assert!(info.version.is_none());
    }

    #[test]
    fn test_probe_available_tool_reports_version() {
        // `sh` is present anywhere these tests run
        let info = probe("sh", "sh", &["-c", "echo 1.0"]);
        assert!(info.available);
        assert_eq!(info.version.as_deref(), Some("1.0"));
    }
}
