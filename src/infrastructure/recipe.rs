//! Script recipe executor
//!
//! Runs a recipe file with `sh` from inside the release directory. Bindings are
//! exported as `RELEASE_PATH`, `DEPLOY_TO` and `SHARED_PATH`.

use std::path::Path;

use tracing::debug;

use crate::domain::ports::{CommandRunner, Invocation, RecipeBindings, RecipeExecutor};
use crate::error::CapstanResult;

pub struct ScriptRecipeExecutor<R: CommandRunner> {
    runner: R,
    shell: String,
}

impl<R: CommandRunner> ScriptRecipeExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            shell: "sh".to_string(),
        }
    }

    /// Interpreter used to run recipes (defaults to `sh`)
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl<R: CommandRunner> RecipeExecutor for ScriptRecipeExecutor<R> {
    fn execute(&self, recipe: &Path, bindings: &RecipeBindings) -> CapstanResult<()> {
        debug!(recipe = %recipe.display(), release = %bindings.release_path.display(), "running recipe");
        let invocation = Invocation::new(self.shell.as_str())
            .path_arg(recipe)
            .current_dir(&bindings.release_path)
            .env("RELEASE_PATH", bindings.release_path.as_os_str())
            .env("DEPLOY_TO", bindings.deploy_to.as_os_str())
            .env("SHARED_PATH", bindings.shared_path.as_os_str());
        self.runner.run(&invocation)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ProcessRunner;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn recipe_sees_bindings_and_runs_in_release() {
        let dir = tempdir().unwrap();
        let release = dir.path().join("releases/r1");
        fs::create_dir_all(&release).unwrap();
        let recipe = dir.path().join("hook.sh");
        fs::write(&recipe, "echo \"$RELEASE_PATH\" > marker\n").unwrap();

        let executor = ScriptRecipeExecutor::new(ProcessRunner::new());
        executor
            .execute(
                &recipe,
                &RecipeBindings {
                    release_path: release.clone(),
                    deploy_to: dir.path().to_path_buf(),
                    shared_path: dir.path().join("shared"),
                },
            )
            .unwrap();

        let marker = fs::read_to_string(release.join("marker")).unwrap();
        assert_eq!(marker.trim(), release.to_string_lossy());
    }

    #[test]
    fn failing_recipe_propagates() {
        let dir = tempdir().unwrap();
        let recipe = dir.path().join("fail.sh");
        fs::write(&recipe, "exit 7\n").unwrap();

        let executor = ScriptRecipeExecutor::new(ProcessRunner::new());
        let result = executor.execute(
            &recipe,
            &RecipeBindings {
                release_path: dir.path().to_path_buf(),
                deploy_to: dir.path().to_path_buf(),
                shared_path: dir.path().to_path_buf(),
            },
        );
        assert!(result.is_err());
    }
}
