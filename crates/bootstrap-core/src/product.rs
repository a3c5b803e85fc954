//! Template configuration trait for CLI binaries
//!
//! This trait defines the interface that each template product must implement
//! to configure the bootstrap behavior for their specific repository layout.

use crate::pipeline::Stage;
use crate::runtime::installer::InstallerConfig;
use crate::vendor::VendoredComponent;
use std::path::{Path, PathBuf};

/// Configuration trait for different template products
///
/// Each product implements this trait to define:
/// - Template identity (package name, author strings the wizard rewrites)
/// - Repository layout (manifest, docs, config file, vendored components)
/// - The build pipeline and optional installer
pub trait TemplateConfig: Clone + Send + Sync + 'static {
    /// Template's default package name (used for CLI command, rewrite short-circuit)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Author string baked into the template files
    fn author(&self) -> &'static str;

    /// Email string baked into the template files
    fn email(&self) -> &'static str;

    /// Package manifest file name for a given package name
    fn manifest_name(&self, package: &str) -> String {
        format!("{}.cabal", package)
    }

    /// Doc promoted to README.md by the wizard
    fn template_readme(&self) -> &'static str;

    /// Archive path the stock README is demoted to
    fn archived_readme(&self) -> &'static str;

    /// Fixed message for the personalization commit
    fn commit_message(&self) -> &'static str;

    /// User-editable config override file, relative to the repo root
    fn config_file(&self) -> &'static str;

    /// Front-end sub-project directory, relative to the repo root
    fn frontend_dir(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Vendored sub-projects populated on first composition
    fn vendored(&self) -> Vec<VendoredComponent>;

    /// Nested sub-environment file exported by the toolkit component
    fn toolkit_env_file(&self) -> &'static str;

    /// Sentinel variable the toolkit layer sets and parents check
    fn toolkit_sentinel(&self) -> &'static str;

    /// Symlink resolving the toolchain binary name collision: (link, target)
    fn bin_link(&self, root: &Path) -> (PathBuf, PathBuf);

    /// Required build pipeline, in execution order
    fn build_stages(&self, root: &Path, package: &str) -> Vec<Stage>;

    /// Optional toolchain/CLI installer offered after the pipeline
    fn installer(&self) -> InstallerConfig;

    /// Optional store garbage-collection stage offered after the pipeline
    fn gc_stage(&self, root: &Path) -> Stage;
}
