//! Layered environment composition
//!
//! Resolves the effective session environment by applying ordered override
//! sources, later wins: repo defaults, the user-editable override store, the
//! vendored toolkit's nested environment (applied at most once per process),
//! and derived/platform values. Also responsible for first-run side effects:
//! vendored-component population and generated-artifact creation, both
//! idempotent so the composer is safe to run on every session start.

use crate::artifacts;
use crate::config::local;
use crate::config::store::{ConfigStore, RECOGNIZED_KEYS};
use crate::env::platform;
use crate::git::Vcs;
use crate::product::TemplateConfig;
use crate::vendor;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Per-process composition state. Carries the exactly-once flag for the
/// nested toolkit layer; callers hold one context for the process lifetime
/// and pass it to every composition.
#[derive(Debug, Default)]
pub struct ComposeContext {
    pub toolkit_loaded: bool,
}

/// Fully resolved environment: every recognized key bound, plus the files
/// whose edits should trigger re-evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEnv {
    vars: BTreeMap<String, String>,
    watch_files: Vec<PathBuf>,
}

impl ResolvedEnv {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    pub fn watch_files(&self) -> &[PathBuf] {
        &self.watch_files
    }

    /// Export every binding into the process environment
    pub fn apply(&self) {
        for (key, value) in &self.vars {
            std::env::set_var(key, value);
        }
    }

    /// Render `export KEY="VALUE"` lines for `eval` in a shell hook
    pub fn render_exports(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.vars {
            out.push_str(&format!("export {}=\"{}\"\n", key, shell_escape(value)));
        }
        out
    }
}

fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Compose against the repository the process runs in
pub fn compose<C: TemplateConfig>(
    config: &C,
    vcs: &dyn Vcs,
    ctx: &mut ComposeContext,
) -> Result<ResolvedEnv> {
    let root = vcs.repo_root()?;
    compose_at(config, vcs, &root, ctx)
}

/// Compose against a known repository root
pub fn compose_at<C: TemplateConfig>(
    config: &C,
    vcs: &dyn Vcs,
    root: &Path,
    ctx: &mut ComposeContext,
) -> Result<ResolvedEnv> {
    // First-run side effects, idempotent on every later session.
    // A vendored fetch failure is fatal to the whole composition.
    vendor::ensure_populated(&config.vendored(), vcs, root)?;

    let local_env = root.join(config.frontend_dir()).join(local::LOCAL_ENV_FILE);
    artifacts::ensure_file(&local_env, &local::default_local_env())?;

    let (link, target) = config.bin_link(root);
    artifacts::ensure_symlink(&link, &target)?;

    let mut vars: BTreeMap<String, String> = BTreeMap::new();
    let mut watch_files = Vec::new();

    // Layer 1: repo defaults
    for (key, default) in RECOGNIZED_KEYS {
        vars.insert(key.to_string(), default.to_string());
    }

    // Layer 2: override store, created with documented defaults when missing
    let store_path = root.join(config.config_file());
    let store = ConfigStore::ensure(&store_path)?;
    for (key, value) in store.effective() {
        vars.insert(key, value);
    }
    watch_files.push(store_path);

    // Layer 3: nested toolkit environment, at most once per process. The
    // sentinel covers re-entry from a parent session; the context flag covers
    // repeat composition within this process.
    let sentinel = config.toolkit_sentinel();
    let already_loaded = ctx.toolkit_loaded || std::env::var_os(sentinel).is_some();
    if !already_loaded {
        let toolkit_path = root.join(config.toolkit_env_file());
        if toolkit_path.exists() {
            let toolkit = ConfigStore::load(&toolkit_path).with_context(|| {
                format!("Failed to load toolkit environment: {}", toolkit_path.display())
            })?;
            for (key, value) in toolkit.raw() {
                vars.insert(key.clone(), value.clone());
            }
            watch_files.push(toolkit_path);
        }
        vars.insert(sentinel.to_string(), "1".to_string());
        ctx.toolkit_loaded = true;
    }

    // Layer 4: derived values
    vars.insert("PROJECT_ROOT".to_string(), root.display().to_string());
    if let Some(bin_dir) = link.parent() {
        vars.insert("PROJECT_BIN".to_string(), bin_dir.display().to_string());
    }
    for (key, value) in platform::current() {
        vars.insert(key.to_string(), value.to_string());
    }

    Ok(ResolvedEnv { vars, watch_files })
}
