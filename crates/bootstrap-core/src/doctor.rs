//! Toolchain readiness checks
//!
//! Verifies the host is ready for direnv-driven sessions and nix builds
//! before the operator sinks time into the wizard: direnv present at a
//! recent-enough version, and the nix configuration carrying the settings
//! the build pipeline depends on.

use crate::runtime::check;
use crate::runtime::command::run_captured;
use anyhow::{Context, Result};
use colored::Colorize;
use semver::Version;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Minimum direnv release with the hooks the session glue relies on
const MIN_DIRENV: (u64, u64) = (2, 30);

const REQUIRED_EXPERIMENTAL_FEATURES: &[&str] = &["nix-command", "flakes"];
const REQUIRED_FLAGS: &[&str] = &["keep-derivations", "keep-outputs"];
const REQUIRED_SUBSTITUTERS: &[&str] = &[
    "https://cache.nixos.org/",
    "https://cache.zw3rk.com",
];
const REQUIRED_TRUSTED_KEYS: &[&str] = &[
    "cache.nixos.org-1:6NCHdD59X431o0gWypbMrAURkbJ16ZPMQFGspcDShjY=",
    "loony-tools:pr9m4BkM/5/eSTZlkQyRt57Jz7OMBxNSUiMC4FkcNfk=",
];

/// One entry of `nix config show --json`
#[derive(Debug, Deserialize)]
struct ConfEntry {
    value: serde_json::Value,
}

type NixConf = BTreeMap<String, ConfEntry>;

fn report(attr: &str, passed: bool) {
    let line = format!("  > {}: {}", attr, if passed { "PASSED" } else { "FAILED" });
    if passed {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
    }
}

/// Run every readiness check, printing a per-attribute report.
/// Returns whether all of them passed.
pub fn run_doctor() -> Result<bool> {
    let nix = check::check_nix();
    if !nix.available {
        anyhow::bail!("nix is not installed on this system");
    }

    let direnv_ok = check_direnv_version();

    println!();
    println!("{}", "  > Checking nix configuration...".yellow());
    let outcome = run_captured("nix", &["config", "show", "--json"], None)?;
    if !outcome.success() {
        anyhow::bail!("nix config show failed: {}", outcome.stderr.trim());
    }
    let conf: NixConf =
        serde_json::from_str(&outcome.stdout).context("Failed to parse nix configuration")?;
    let conf_ok = check_nix_conf(&conf);

    Ok(direnv_ok && conf_ok)
}

fn check_direnv_version() -> bool {
    println!("{}", "  > Checking direnv...".yellow());
    let direnv = check::check_direnv();
    let passed = match direnv.version.as_deref().and_then(parse_version) {
        Some(version) => {
            let ok = (version.major, version.minor) >= MIN_DIRENV;
            if ok {
                println!("{}", format!("    direnv version: {}", version).green());
            } else {
                println!(
                    "{}",
                    format!(
                        "    direnv {} is below the required version ({}.{}+)",
                        version, MIN_DIRENV.0, MIN_DIRENV.1
                    )
                    .red()
                );
            }
            ok
        }
        None => {
            println!(
                "{}",
                "    direnv is not installed (nix profile install nixpkgs#direnv)".red()
            );
            false
        }
    };
    report("direnv", passed);
    passed
}

/// direnv prints a bare version like `2.32.1`, occasionally two components
fn parse_version(raw: &str) -> Option<Version> {
    let cleaned = raw.trim().strip_prefix('v').unwrap_or(raw.trim());
    Version::parse(cleaned)
        .or_else(|_| Version::parse(&format!("{}.0", cleaned)))
        .ok()
}

fn check_nix_conf(conf: &NixConf) -> bool {
    let user = std::env::var("USER").unwrap_or_default();
    // Every attribute gets checked and reported, even after a failure
    let flag_results: Vec<bool> = REQUIRED_FLAGS
        .iter()
        .map(|flag| check_flag_attr(conf, flag))
        .collect();
    [
        check_set_attr(conf, "experimental-features", REQUIRED_EXPERIMENTAL_FEATURES),
        check_set_attr(conf, "substituters", REQUIRED_SUBSTITUTERS),
        check_set_attr(conf, "trusted-public-keys", REQUIRED_TRUSTED_KEYS),
        check_trusted_user(conf, &user),
        flag_results.into_iter().all(|passed| passed),
    ]
    .into_iter()
    .all(|passed| passed)
}

fn string_set(conf: &NixConf, attr: &str) -> Vec<String> {
    conf.get(attr)
        .and_then(|entry| entry.value.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// The attribute must contain every required member
fn check_set_attr(conf: &NixConf, attr: &str, required: &[&str]) -> bool {
    let current = string_set(conf, attr);
    let missing: Vec<&&str> = required
        .iter()
        .filter(|needed| !current.iter().any(|have| have == **needed))
        .collect();
    let passed = missing.is_empty();
    report(attr, passed);
    if !passed {
        println!("{}", format!("    missing in nix.conf {}:", attr).red());
        for value in missing {
            println!("{}", format!("      {}", value).red());
        }
    }
    passed
}

fn check_trusted_user(conf: &NixConf, user: &str) -> bool {
    let users = string_set(conf, "trusted-users");
    let passed = users.iter().any(|u| u == "root") && users.iter().any(|u| u == user);
    report("trusted-users", passed);
    if !passed {
        println!(
            "{}",
            format!("    'trusted-users = root {}' is missing in nix.conf", user).red()
        );
    }
    passed
}

fn check_flag_attr(conf: &NixConf, attr: &str) -> bool {
    let passed = conf
        .get(attr)
        .map(|entry| entry.value.as_bool() == Some(true))
        .unwrap_or(false);
    report(attr, passed);
    if !passed {
        println!("{}", format!("    '{} = true' missing in nix.conf", attr).red());
    }
    passed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(json: &str) -> NixConf {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_version_handles_bare_and_short_forms() {
        assert_eq!(parse_version("2.32.1").unwrap(), Version::new(2, 32, 1));
        assert_eq!(parse_version("2.32").unwrap(), Version::new(2, 32, 0));
        assert_eq!(parse_version("v2.30.0").unwrap(), Version::new(2, 30, 0));
        assert!(parse_version("direnv").is_none());
    }

    #[test]
    fn test_set_attr_detects_missing_members() {
        let partial = conf(r#"{"experimental-features": {"value": ["flakes"]}}"#);
        assert!(!check_set_attr(
            &partial,
            "experimental-features",
            REQUIRED_EXPERIMENTAL_FEATURES
        ));

        let full = conf(
            r#"{"experimental-features": {"value": ["nix-command", "flakes", "ca-derivations"]}}"#,
        );
        assert!(check_set_attr(
            &full,
            "experimental-features",
            REQUIRED_EXPERIMENTAL_FEATURES
        ));
    }

    #[test]
    fn test_flag_attr_requires_true() {
        let flags =
            conf(r#"{"keep-outputs": {"value": false}, "keep-derivations": {"value": true}}"#);
        assert!(check_flag_attr(&flags, "keep-derivations"));
        assert!(!check_flag_attr(&flags, "keep-outputs"));
        assert!(!check_flag_attr(&flags, "absent-flag"));
    }

    #[test]
    fn test_trusted_user_needs_root_and_current_user() {
        let both = conf(r#"{"trusted-users": {"value": ["root", "alice"]}}"#);
        assert!(check_trusted_user(&both, "alice"));
        let root_only = conf(r#"{"trusted-users": {"value": ["root"]}}"#);
        assert!(!check_trusted_user(&root_only, "alice"));
    }
}
