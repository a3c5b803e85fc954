//! Rewrite engine: apply a rename plan across the tracked file set
//!
//! Ordering is load-bearing: all content substitutions land before any file
//! moves (the package-name substitution drives the manifest rename), the doc
//! relocations come after that, and the commit is last. Any failure aborts
//! before the commit; already-written contents are left for the operator to
//! inspect, uncommitted.

use crate::git::Vcs;
use crate::product::TemplateConfig;
use crate::rewrite::plan::{RenamePlan, RenameValues};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Rewrite every tracked file per the plan, rename the manifest, relocate the
/// docs, and record a single commit with the template's fixed message.
pub fn personalize<C: TemplateConfig>(
    config: &C,
    vcs: &dyn Vcs,
    root: &Path,
    values: &RenameValues,
) -> Result<()> {
    let plan = RenamePlan::for_template(config, values);
    plan.validate()
        .context("Refusing to rewrite: invalid rename plan")?;

    let tracked = vcs.tracked_files()?;

    // (a) content substitutions across the whole file set
    for path in &tracked {
        rewrite_file(&plan, path)
            .with_context(|| format!("Failed to rewrite {}", path.display()))?;
    }

    // (b) package manifest rename, driven by the package-name substitution
    let old_manifest = root.join(config.manifest_name(config.name()));
    let new_manifest = root.join(config.manifest_name(&values.package));
    fs::rename(&old_manifest, &new_manifest).with_context(|| {
        format!(
            "Failed to rename manifest {} -> {}",
            old_manifest.display(),
            new_manifest.display()
        )
    })?;

    // (c) doc relocations: archive the stock README, then promote the
    // template's getting-started doc in its place
    let readme = root.join("README.md");
    let archive = root.join(config.archived_readme());
    if let Some(parent) = archive.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::rename(&readme, &archive)
        .with_context(|| format!("Failed to archive {}", readme.display()))?;
    let promoted = root.join(config.template_readme());
    fs::rename(&promoted, &readme)
        .with_context(|| format!("Failed to promote {}", promoted.display()))?;

    // (d) one commit for the whole personalization
    vcs.commit_all(config.commit_message())?;

    Ok(())
}

/// Apply the plan to one file; non-UTF-8 (binary) files are left untouched,
/// and unchanged files are not rewritten on disk.
fn rewrite_file(plan: &RenamePlan, path: &Path) -> Result<()> {
    let bytes = fs::read(path)?;
    let Ok(text) = String::from_utf8(bytes) else {
        return Ok(());
    };
    let rewritten = plan.apply(&text);
    if rewritten != text {
        fs::write(path, rewritten)?;
    }
    Ok(())
}
