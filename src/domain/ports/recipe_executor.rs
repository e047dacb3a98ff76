//! RecipeExecutor port
//!
//! Runs embedded callback recipes (lifecycle hooks, embedded restart) with the
//! release being deployed bound as context. Failures propagate as ordinary
//! pipeline failures.

use std::path::{Path, PathBuf};

use crate::error::CapstanResult;

/// Variables made visible to a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeBindings {
    pub release_path: PathBuf,
    pub deploy_to: PathBuf,
    pub shared_path: PathBuf,
}

pub trait RecipeExecutor {
    fn execute(&self, recipe: &Path, bindings: &RecipeBindings) -> CapstanResult<()>;
}

impl<T: RecipeExecutor + ?Sized> RecipeExecutor for &T {
    fn execute(&self, recipe: &Path, bindings: &RecipeBindings) -> CapstanResult<()> {
        (**self).execute(recipe, bindings)
    }
}
