//! Platform-conditional bindings
//!
//! Detection queries the operating system family string; no external utility
//! is assumed present.

/// Bindings derived from an OS family string (`std::env::consts::OS` values)
pub fn platform_bindings(os: &str) -> Vec<(&'static str, &'static str)> {
    match os {
        // The conservative GC inside nix-built tooling misbehaves on macOS
        "macos" => vec![("GC_DONT_GC", "1")],
        _ => Vec::new(),
    }
}

/// Bindings for the platform this process runs on
pub fn current() -> Vec<(&'static str, &'static str)> {
    platform_bindings(std::env::consts::OS)
}
