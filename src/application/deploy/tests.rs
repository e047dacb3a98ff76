//! Deployment Engine Tests

use super::*;
use crate::domain::entities::{DesiredState, Release, SourceSpec};
use crate::domain::ports::{RecipeBindings, RecipeExecutor};
use crate::domain::value_objects::{Callback, DeployLayout, RestartCommand};
use crate::error::{CapstanError, CapstanResult};
use crate::infrastructure::{ProcessRunner, RecordingRunner};
use std::cell::RefCell;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

#[derive(Default)]
struct RecordingRecipes {
    runs: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl RecipeExecutor for RecordingRecipes {
    fn execute(&self, recipe: &Path, bindings: &RecipeBindings) -> CapstanResult<()> {
        self.runs
            .borrow_mut()
            .push((recipe.to_path_buf(), bindings.release_path.clone()));
        Ok(())
    }
}

type TestEngine = DeploymentEngine<RecordingRunner<ProcessRunner>, RecordingRecipes>;

struct Fixture {
    _dir: TempDir,
    root: PathBuf,
    source: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let root = dir.path().join("app");
        let source = dir.path().join("build");
        fs::create_dir_all(source.join("log")).unwrap();
        fs::write(source.join("index.html"), "hello").unwrap();
        fs::write(source.join("log/build.log"), "noise").unwrap();
        Self {
            _dir: dir,
            root,
            source,
        }
    }

    fn desired(&self, revision: &str) -> DesiredState {
        let mut desired = DesiredState::new(
            "app",
            DeployLayout::new(&self.root),
            SourceSpec::Directory(self.source.clone()),
        );
        desired.revision = revision.to_string();
        desired
    }

    fn engine(&self, desired: DesiredState) -> TestEngine {
        DeploymentEngine::new(
            desired,
            RecordingRunner::new(ProcessRunner::new()),
            RecordingRecipes::default(),
        )
    }

    fn release(&self, id: &str) -> PathBuf {
        self.root.join("releases").join(id)
    }

    /// Existing release directory with a fixed mtime
    fn seed_release(&self, id: &str, epoch: i64) -> PathBuf {
        let path = self.release(id);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("index.html"), id).unwrap();
        touch(&path, epoch);
        path
    }

    fn point_current_at(&self, release: &Path) {
        symlink(release, self.current()).unwrap();
    }

    fn current(&self) -> PathBuf {
        self.root.join("current")
    }

    fn current_target(&self) -> PathBuf {
        fs::read_link(self.current()).unwrap()
    }
}

fn touch(path: &Path, epoch: i64) {
    let status = Command::new("touch")
        .arg("-d")
        .arg(format!("@{}", epoch))
        .arg(path)
        .status()
        .unwrap();
    assert!(status.success());
}

fn ids(releases: &[Release]) -> Vec<String> {
    releases.iter().map(Release::id).collect()
}

#[test]
fn fresh_deploy_copies_links_and_promotes() {
    let fx = Fixture::new();
    let mut engine = fx.engine(fx.desired("r1"));

    let outcome = engine.apply().unwrap();

    let release = fx.release("r1");
    assert!(matches!(outcome, DeployOutcome::Deployed { previous: None, .. }));
    assert_eq!(outcome.release().path(), release);
    assert_eq!(fs::read_to_string(release.join("index.html")).unwrap(), "hello");
    assert_eq!(fx.current_target(), release);
    assert_eq!(fs::read_link(release.join("log")).unwrap(), fx.root.join("shared/log"));
    assert!(fx.root.join("shared").is_dir());
    assert_eq!(ids(&engine.releases().unwrap()), vec!["r1"]);
}

#[test]
fn same_revision_twice_is_a_no_op() {
    let fx = Fixture::new();
    fx.engine(fx.desired("r1")).apply().unwrap();

    let mut second = fx.engine(fx.desired("r1"));
    let outcome = second.apply().unwrap();

    assert!(matches!(outcome, DeployOutcome::AlreadyCurrent { .. }));
    let programs: Vec<String> = second
        .runner()
        .calls()
        .iter()
        .map(|inv| inv.program().to_string())
        .collect();
    assert!(programs.iter().all(|p| p == "stat"), "unexpected commands: {programs:?}");
}

#[test]
fn rollback_removes_releases_outside_window() {
    let fx = Fixture::new();
    let a = fx.seed_release("A", 1_000);
    let b = fx.seed_release("B", 2_000);
    let c = fx.seed_release("C", 3_000);
    fx.point_current_at(&c);

    let mut desired = fx.desired("A");
    desired.keep_releases = 1;
    let mut engine = fx.engine(desired);
    let outcome = engine.apply().unwrap();

    assert!(matches!(outcome, DeployOutcome::RolledBack { .. }));
    assert_eq!(ids(outcome.removed()), vec!["B"]);
    assert_eq!(fx.current_target(), a);
    assert!(!b.exists());
    assert!(c.exists());
    assert_eq!(ids(&engine.releases().unwrap()), vec!["A", "C"]);
}

#[test]
fn rollback_runs_restart_from_current() {
    let fx = Fixture::new();
    fx.seed_release("A", 1_000);
    let b = fx.seed_release("B", 2_000);
    fx.point_current_at(&b);

    let mut desired = fx.desired("A");
    desired.restart_command = RestartCommand::Shell("touch restarted".into());
    fx.engine(desired).apply().unwrap();

    assert!(fx.release("A").join("restarted").exists());
}

#[test]
fn fresh_deploy_trims_to_retention_window() {
    let fx = Fixture::new();
    for (i, id) in ["r1", "r2", "r3", "r4", "r5"].iter().enumerate() {
        fx.seed_release(id, 1_000 * (i as i64 + 1));
    }
    fx.point_current_at(&fx.release("r5"));

    let mut desired = fx.desired("r6");
    desired.keep_releases = 2;
    let mut engine = fx.engine(desired);
    let outcome = engine.apply().unwrap();

    assert_eq!(ids(outcome.removed()), vec!["r1", "r2", "r3"]);
    assert_eq!(ids(&engine.releases().unwrap()), vec!["r4", "r5", "r6"]);
    for gone in ["r1", "r2", "r3"] {
        assert!(!fx.release(gone).exists());
    }
    assert_eq!(fx.current_target(), fx.release("r6"));
}

#[test]
fn failed_deploy_with_rollback_on_error_restores_previous() {
    let fx = Fixture::new();
    let previous = fx.seed_release("good", 1_000);
    fx.point_current_at(&previous);

    let mut desired = fx.desired("bad");
    desired.rollback_on_error = true;
    desired.callbacks.before_symlink = Callback::Command("echo nope".into());
    let mut engine = fx.engine(desired);

    let err = engine.apply().unwrap_err();

    assert!(err.is_unsupported());
    assert!(!fx.release("bad").exists());
    assert_eq!(fx.current_target(), previous);
    assert_eq!(engine.release(), Some(&Release::new(previous)));
    assert_eq!(ids(&engine.releases().unwrap()), vec!["good"]);
}

#[test]
fn failed_deploy_without_rollback_on_error_leaves_partial_release() {
    let fx = Fixture::new();
    let previous = fx.seed_release("good", 1_000);
    fx.point_current_at(&previous);

    let mut desired = fx.desired("bad");
    desired.callbacks.before_migrate = Callback::Command("echo nope".into());
    let err = fx.engine(desired).apply().unwrap_err();

    assert!(err.is_unsupported());
    assert!(fx.release("bad").exists());
    assert_eq!(fx.current_target(), previous);
}

#[test]
fn failed_first_deploy_with_rollback_on_error_removes_release() {
    let fx = Fixture::new();
    fs::write(fx.source.join("gems.yml"), "gems: []").unwrap();

    let mut desired = fx.desired("r1");
    desired.rollback_on_error = true;
    let err = fx.engine(desired).apply().unwrap_err();

    assert!(matches!(err, CapstanError::UnsupportedFeature { .. }));
    assert!(!fx.release("r1").exists());
    assert!(!fx.current().exists());
}

#[test]
fn migrate_is_unsupported_after_pre_migrate_links() {
    let fx = Fixture::new();
    let mut desired = fx.desired("r1");
    desired.migrate = true;
    desired
        .symlink_before_migrate
        .insert("config/database.yml".into(), "database.yml".into());

    let err = fx.engine(desired).apply().unwrap_err();

    assert!(err.is_unsupported());
    assert!(fs::symlink_metadata(fx.release("r1").join("database.yml")).is_ok());
    assert!(!fx.current().exists());
}

#[test]
fn callbacks_run_in_order_with_release_bound() {
    let fx = Fixture::new();
    let mut desired = fx.desired("r1");
    desired.callbacks.before_migrate = Callback::Recipe("before_migrate.sh".into());
    desired.callbacks.before_symlink = Callback::Recipe("before_symlink.sh".into());
    desired.callbacks.before_restart = Callback::Recipe("before_restart.sh".into());
    desired.callbacks.after_restart = Callback::Recipe("after_restart.sh".into());
    desired.restart_command = RestartCommand::Recipe("restart.sh".into());
    let mut engine = fx.engine(desired);

    engine.apply().unwrap();

    let runs = engine.recipes().runs.borrow().clone();
    let recipes: Vec<String> = runs
        .iter()
        .map(|(recipe, _)| recipe.display().to_string())
        .collect();
    assert_eq!(
        recipes,
        vec![
            "before_migrate.sh",
            "before_symlink.sh",
            "before_restart.sh",
            "restart.sh",
            "after_restart.sh",
        ]
    );
    assert!(runs.iter().all(|(_, release)| *release == fx.release("r1")));
}

#[test]
fn restart_command_runs_in_current_path() {
    let fx = Fixture::new();
    let mut desired = fx.desired("r1");
    desired.restart_command = RestartCommand::Argv(vec!["touch".into(), "restart.txt".into()]);

    fx.engine(desired).apply().unwrap();

    assert!(fx.current().join("restart.txt").exists());
}

#[test]
fn unsupported_action_fails_before_touching_disk() {
    let fx = Fixture::new();
    let mut desired = fx.desired("r1");
    desired.action = crate::domain::entities::Action::Rollback;
    let mut engine = fx.engine(desired);

    let err = engine.apply().unwrap_err();

    assert!(err.is_unsupported());
    assert!(engine.runner().calls().is_empty());
    assert!(!fx.root.exists());
}

#[test]
fn revision_must_be_a_directory_name() {
    let fx = Fixture::new();
    for revision in ["../escape", ".", "..", ".r1", "  ", "a/b"] {
        let err = fx.engine(fx.desired(revision)).apply().unwrap_err();
        assert!(
            matches!(err, CapstanError::InvalidConfig { .. }),
            "{revision:?} gave {err}"
        );
    }
    assert!(!fx.root.exists());
}

#[test]
fn hidden_revision_leaves_live_release_alone() {
    let fx = Fixture::new();
    fx.engine(fx.desired("r1")).apply().unwrap();

    let err = fx.engine(fx.desired(".r1")).apply().unwrap_err();

    assert!(matches!(err, CapstanError::InvalidConfig { .. }));
    assert_eq!(fx.current_target(), fx.release("r1"));
    assert!(fx.release("r1").join("index.html").exists());
    assert!(!fx.release(".r1").exists());
}

#[test]
fn current_as_plain_directory_is_rejected() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.current()).unwrap();

    let err = fx.engine(fx.desired("r1")).apply().unwrap_err();

    match err {
        CapstanError::InvalidConfig { message } => {
            assert!(message.contains("not a symlink"), "{message}")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!fx.release("r1").exists());
    assert!(fx.current().is_dir());
}
