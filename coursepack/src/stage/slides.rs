//! Slide deck staging.

use std::path::{Path, PathBuf};

use tracing::info;

use super::fs::copy_file;
use crate::error::StageResult;
use crate::module::Module;
use crate::naming::SLIDES_FILE;

impl Module {
    /// Copy `slides.pptx` into the build directory.
    ///
    /// The source is not checked beforehand; a missing deck fails with
    /// [`crate::StageError::CopyFailed`].
    pub async fn stage_slides_file(&self, build_dir: impl AsRef<Path>) -> StageResult<PathBuf> {
        let source = self.full_path.join(SLIDES_FILE);
        let target = build_dir.as_ref().join(SLIDES_FILE);

        copy_file(&source, &target).await?;

        info!(path = %target.display(), "Staged slides");
        Ok(target)
    }
}
