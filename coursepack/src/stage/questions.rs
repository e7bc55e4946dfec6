//! Questions file staging.

use std::path::{Path, PathBuf};

use tracing::info;

use super::fs::{copy_file, path_exists};
use crate::error::{StageError, StageResult};
use crate::module::Module;
use crate::naming::{NO_QUESTIONS_FILE, QUESTIONS_FILE};

impl Module {
    /// Copy `questions.txt`, or failing that `no-questions.txt`, into the
    /// build directory unchanged.
    ///
    /// Unlike demos there is no generated placeholder: a module must say
    /// explicitly that it has no questions.
    ///
    /// # Errors
    ///
    /// [`StageError::QuestionsNotFound`] when neither file exists.
    pub async fn stage_questions_file(&self, build_dir: impl AsRef<Path>) -> StageResult<PathBuf> {
        let build_dir = build_dir.as_ref();

        for name in [QUESTIONS_FILE, NO_QUESTIONS_FILE] {
            let source = self.full_path.join(name);
            if path_exists(&source).await {
                let target = build_dir.join(name);
                copy_file(&source, &target).await?;
                info!(path = %target.display(), "Staged questions file");
                return Ok(target);
            }
        }

        Err(StageError::QuestionsNotFound(self.full_path.clone()))
    }
}
