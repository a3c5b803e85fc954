//! Shared test doubles for the injectable seams

use crate::git::{Vcs, VcsIdentity};
use crate::pipeline::Stage;
use crate::product::TemplateConfig;
use crate::runtime::command::{CmdOutcome, CommandRunner};
use crate::runtime::installer::InstallerConfig;
use crate::vendor::VendoredComponent;
use crate::wizard::Prompter;
use anyhow::Result;
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Stub repository rooted at a temp directory. Tracked files default to every
/// file on disk under the root.
pub struct StubVcs {
    root: PathBuf,
    fail_submodules: bool,
    tracked: Option<Vec<PathBuf>>,
    identity: VcsIdentity,
    submodule_inits: Cell<usize>,
    checkouts: RefCell<Vec<String>>,
    commits: RefCell<Vec<String>>,
}

impl StubVcs {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            fail_submodules: false,
            tracked: None,
            identity: VcsIdentity::default(),
            submodule_inits: Cell::new(0),
            checkouts: RefCell::new(Vec::new()),
            commits: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_submodules(mut self) -> Self {
        self.fail_submodules = true;
        self
    }

    pub fn with_identity(mut self, name: &str, email: &str) -> Self {
        self.identity = VcsIdentity {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
        };
        self
    }

    pub fn with_tracked(mut self, tracked: Vec<PathBuf>) -> Self {
        self.tracked = Some(tracked);
        self
    }

    pub fn submodule_inits(&self) -> usize {
        self.submodule_inits.get()
    }

    pub fn checkouts(&self) -> Vec<String> {
        self.checkouts.borrow().clone()
    }

    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }
}

impl Vcs for StubVcs {
    fn repo_root(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    fn tracked_files(&self) -> Result<Vec<PathBuf>> {
        if let Some(tracked) = &self.tracked {
            return Ok(tracked.clone());
        }
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&self.root)
            .into_iter()
            .flatten()
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();
        files.sort();
        Ok(files)
    }

    fn identity(&self) -> VcsIdentity {
        self.identity.clone()
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.commits.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn init_submodules(&self) -> Result<()> {
        if self.fail_submodules {
            anyhow::bail!("fatal: unable to access remote");
        }
        self.submodule_inits.set(self.submodule_inits.get() + 1);
        Ok(())
    }

    fn checkout_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        let rel = dir.strip_prefix(&self.root).unwrap_or(dir);
        self.checkouts
            .borrow_mut()
            .push(format!("{}:{}", rel.display(), branch));
        Ok(())
    }
}

/// Prompter fed with canned answers; empty input resolves to the default
#[derive(Default)]
pub struct ScriptedPrompter {
    pub inputs: VecDeque<String>,
    pub confirms: VecDeque<bool>,
    pub seen: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(mut self, inputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_confirms(mut self, confirms: &[bool]) -> Self {
        self.confirms = confirms.iter().copied().collect();
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, label: &str, default: &str) -> Result<String> {
        self.seen.push(label.to_string());
        let raw = self.inputs.pop_front().unwrap_or_default();
        Ok(if raw.is_empty() {
            default.to_string()
        } else {
            raw
        })
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        self.seen.push(label.to_string());
        Ok(self.confirms.pop_front().unwrap_or(default))
    }
}

/// Runner that records stage names and scripts one failure
pub struct ScriptedRunner {
    fail_on: Option<String>,
    log: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            fail_on: None,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(stage_name: &str) -> Self {
        Self {
            fail_on: Some(stage_name.to_string()),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, stage: &Stage) -> Result<CmdOutcome> {
        self.log.lock().unwrap().push(stage.name.clone());
        if self.fail_on.as_deref() == Some(stage.name.as_str()) {
            return Ok(CmdOutcome {
                status: 1,
                stdout: String::new(),
                stderr: "scripted failure".to_string(),
            });
        }
        Ok(CmdOutcome {
            status: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// Minimal template product used across the engine tests
#[derive(Clone)]
pub struct TestTemplate;

impl TemplateConfig for TestTemplate {
    fn name(&self) -> &'static str {
        "starter"
    }

    fn display_name(&self) -> &'static str {
        "Starter"
    }

    fn author(&self) -> &'static str {
        "Template Author"
    }

    fn email(&self) -> &'static str {
        "template@example.com"
    }

    fn template_readme(&self) -> &'static str {
        "PROJECT_README.md"
    }

    fn archived_readme(&self) -> &'static str {
        "docs/template-guide.md"
    }

    fn commit_message(&self) -> &'static str {
        "Initialize project"
    }

    fn config_file(&self) -> &'static str {
        "app.conf"
    }

    fn frontend_dir(&self) -> &'static str {
        "frontend"
    }

    fn docs_url(&self) -> &'static str {
        "https://example.com/docs"
    }

    fn vendored(&self) -> Vec<VendoredComponent> {
        vec![VendoredComponent {
            name: "toolkit",
            path: "vendor/toolkit",
            branch: "main",
        }]
    }

    fn toolkit_env_file(&self) -> &'static str {
        "vendor/toolkit/toolkit.env"
    }

    fn toolkit_sentinel(&self) -> &'static str {
        "TOOLKIT_LOADED"
    }

    fn bin_link(&self, root: &Path) -> (PathBuf, PathBuf) {
        (
            root.join(".bin/tool"),
            root.join("vendor/toolkit/bin/tool"),
        )
    }

    fn build_stages(&self, root: &Path, package: &str) -> Vec<Stage> {
        vec![
            Stage::new("environment", "nix", &["build"], Some(root.to_path_buf())),
            Stage::new("index", "cabal", &["update"], Some(root.to_path_buf())),
            Stage::new("build", "cabal", &["build", package], Some(root.to_path_buf())),
            Stage::new(
                "frontend",
                "npm",
                &["install"],
                Some(root.join(self.frontend_dir())),
            ),
        ]
    }

    fn installer(&self) -> InstallerConfig {
        InstallerConfig {
            name: "tool",
            display_name: "tool pair",
            install_command: "true",
            docs_url: "https://example.com/docs",
        }
    }

    fn gc_stage(&self, root: &Path) -> Stage {
        Stage::new("gc", "nix", &["store", "gc"], Some(root.to_path_buf()))
    }
}
