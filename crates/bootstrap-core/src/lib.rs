//! Bootstrap Core - Shared library for template project tooling
//!
//! This library provides the core functionality for bootstrapping projects
//! cloned from a template repository: layered environment composition for
//! every shell session, and a one-shot setup wizard that personalizes the
//! template (global rename) and drives the initial build pipeline.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Config store, vendored-component init,
//!   artifact management, rewrite engine, command execution
//! - **Layer 2: Workflow Orchestration** - `TemplateConfig` trait, the
//!   environment composer, and the wizard state machine with injectable seams
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts
//!   (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use bootstrap_core::{env, git::GitCli, TemplateConfig};
//!
//! // Define your template config
//! #[derive(Clone)]
//! struct MyTemplate;
//! impl TemplateConfig for MyTemplate {
//!     fn name(&self) -> &'static str { "mytemplate" }
//!     // ... implement other methods
//! }
//!
//! // Compose the session environment
//! let mut ctx = env::ComposeContext::default();
//! let resolved = env::compose(&MyTemplate, &GitCli::new(), &mut ctx)?;
//! print!("{}", resolved.render_exports());
//! ```

pub mod artifacts;
pub mod config;
pub mod doctor;
pub mod env;
pub mod git;
pub mod pipeline;
pub mod product;
pub mod rewrite;
pub mod runtime;
pub mod vendor;
pub mod wizard;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use env::{compose, ComposeContext, ResolvedEnv};
pub use pipeline::{run_stages, Stage};
pub use product::TemplateConfig;
pub use rewrite::{RenamePlan, RenameValues};
pub use runtime::{check_runtimes, CmdOutcome, CommandRunner, RuntimeInfo, SystemRunner};
pub use vendor::VendoredComponent;

#[cfg(feature = "tui")]
pub use tui::run;
