//! External command execution, runtime probes, and the optional installer

pub mod check;
pub mod command;
pub mod installer;

pub use check::{check_runtimes, RuntimeInfo};
pub use command::{CmdOutcome, CommandRunner, SystemRunner};
pub use installer::{Installer, InstallerConfig};
