//! Shared helpers for the integration tests.
//!
//! - `GitFixture`: a throwaway upstream repository with commits and tags
//! - `touch_at`: pin a directory's mtime so release ordering is deterministic
//! - `run_ok`: run a setup command and fail the test loudly if it fails

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Run a setup command, panicking with its stderr on failure
pub fn run_ok(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to spawn setup command");
    assert!(
        output.status.success(),
        "setup command {:?} failed:\n{}",
        cmd,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Set the mtime of `path` to `epoch` seconds
pub fn touch_at(path: &Path, epoch: i64) {
    run_ok(
        Command::new("touch")
            .arg("-d")
            .arg(format!("@{}", epoch))
            .arg(path),
    );
}

/// Upstream git repository in a temp directory
pub struct GitFixture {
    dir: TempDir,
}

impl GitFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let fixture = Self { dir };
        run_ok(
            fixture
                .git()
                .args(["-c", "init.defaultBranch=main", "init", "-q"]),
        );
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Repository URL as passed to `git clone` / `git ls-remote`
    pub fn url(&self) -> String {
        self.path().display().to_string()
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(self.path())
            .args(["-c", "user.name=Capstan Tests"])
            .args(["-c", "user.email=tests@capstan.invalid"])
            .args(["-c", "commit.gpgsign=false"])
            .args(["-c", "tag.gpgsign=false"]);
        cmd
    }

    /// Write `files` and commit them, returning the new commit id
    pub fn commit(&self, message: &str, files: &[(&str, &str)]) -> String {
        for (relative, content) in files {
            let path = self.path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        run_ok(self.git().args(["add", "-A"]));
        run_ok(self.git().args(["commit", "-q", "-m", message]));
        self.head()
    }

    pub fn head(&self) -> String {
        run_ok(self.git().args(["rev-parse", "HEAD"]))
    }

    pub fn lightweight_tag(&self, name: &str) {
        run_ok(self.git().args(["tag", name]));
    }

    pub fn annotated_tag(&self, name: &str) {
        run_ok(self.git().args(["tag", "-a", name, "-m", name]));
    }

    /// Object id of the tag itself (differs from the commit for annotated tags)
    pub fn tag_object(&self, name: &str) -> String {
        run_ok(self.git().args(["rev-parse", &format!("refs/tags/{}", name)]))
    }
}

/// Deploy root and scratch space for one test
pub struct DeployRoot {
    dir: TempDir,
    root: PathBuf,
}

impl DeployRoot {
    pub fn new() -> Self {
        Self::nested("app")
    }

    /// Deploy root at `<tmp>/<relative>`, e.g. one containing glob metacharacters
    pub fn nested(relative: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path().join(relative);
        Self { dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scratch(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn release(&self, id: &str) -> PathBuf {
        self.root.join("releases").join(id)
    }

    pub fn current(&self) -> PathBuf {
        self.root.join("current")
    }

    pub fn current_target(&self) -> PathBuf {
        fs::read_link(self.current()).expect("current is not a symlink")
    }

    pub fn release_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = match fs::read_dir(self.root.join("releases")) {
            Ok(entries) => entries
                .flatten()
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        ids.sort();
        ids
    }
}
