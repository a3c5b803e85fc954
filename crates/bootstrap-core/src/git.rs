//! Version-control collaborator
//!
//! git is queried for the repository root, the tracked file set, and identity
//! config, and invoked for staging/committing and submodule population. Only
//! exit status and output are consumed.

use crate::runtime::command::{run_captured, CmdOutcome};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Identity from version-control config; either field may be unset
#[derive(Debug, Clone, Default)]
pub struct VcsIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Seam over the version-control system, so engines can be exercised with
/// stub repositories in tests
pub trait Vcs {
    fn repo_root(&self) -> Result<PathBuf>;
    /// Absolute paths of every tracked file
    fn tracked_files(&self) -> Result<Vec<PathBuf>>;
    fn identity(&self) -> VcsIdentity;
    /// Stage everything and record a single commit
    fn commit_all(&self, message: &str) -> Result<()>;
    fn init_submodules(&self) -> Result<()>;
    fn checkout_branch(&self, dir: &Path, branch: &str) -> Result<()>;
}

/// git CLI implementation
pub struct GitCli {
    workdir: Option<PathBuf>,
}

impl GitCli {
    pub fn new() -> Self {
        Self { workdir: None }
    }

    /// Operate on a repository other than the current directory
    pub fn at(workdir: PathBuf) -> Self {
        Self {
            workdir: Some(workdir),
        }
    }

    fn git(&self, args: &[&str]) -> Result<CmdOutcome> {
        run_captured("git", args, self.workdir.as_deref())
    }

    fn git_ok(&self, args: &[&str]) -> Result<CmdOutcome> {
        let outcome = self.git(args)?;
        if !outcome.success() {
            anyhow::bail!("git {} failed: {}", args.join(" "), outcome.stderr.trim());
        }
        Ok(outcome)
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for GitCli {
    fn repo_root(&self) -> Result<PathBuf> {
        let outcome = self.git_ok(&["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(outcome.stdout.trim()))
    }

    fn tracked_files(&self) -> Result<Vec<PathBuf>> {
        let root = self.repo_root()?;
        let root_arg = root.to_string_lossy();
        let outcome = self.git_ok(&["-C", root_arg.as_ref(), "ls-files"])?;
        Ok(outcome
            .stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| root.join(line))
            .collect())
    }

    fn identity(&self) -> VcsIdentity {
        let field = |key: &str| {
            self.git(&["config", key]).ok().and_then(|outcome| {
                let value = outcome.stdout.trim().to_string();
                (outcome.success() && !value.is_empty()).then_some(value)
            })
        };
        VcsIdentity {
            name: field("user.name"),
            email: field("user.email"),
        }
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.git_ok(&["add", "-A"])?;
        self.git_ok(&["commit", "-m", message])?;
        Ok(())
    }

    fn init_submodules(&self) -> Result<()> {
        self.git_ok(&["submodule", "update", "--init", "--recursive"])?;
        Ok(())
    }

    fn checkout_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        let dir_arg = dir.to_string_lossy();
        self.git_ok(&["-C", dir_arg.as_ref(), "checkout", branch])?;
        Ok(())
    }
}
