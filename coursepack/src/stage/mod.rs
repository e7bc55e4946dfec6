//! Staging operations.
//!
//! Each operation reads a loaded [`Module`] and its source folder and writes
//! one kind of artifact into a build directory:
//!
//! | Operation | Output |
//! |-----------|--------|
//! | [`Module::create_meta_file`] | `{course_id}-m{index}.meta` |
//! | [`Module::stage_demo_file`] | `demos.zip` or `no-demos.txt` |
//! | [`Module::stage_questions_file`] | `questions.txt` or `no-questions.txt` |
//! | [`Module::stage_slides_file`] | `slides.pptx` |
//! | [`Module::stage_clips`] | `{course_id}-m{index}-{NN}.{ext}` |
//!
//! Output names never collide, so the operations may run concurrently
//! against the same build directory. [`Module::stage_all`] does exactly that.

mod clips;
mod demos;
mod fs;
mod meta;
mod questions;
mod slides;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::StageOptions;
use crate::error::{StageError, StageResult};
use crate::module::Module;

pub use meta::MODULE_NAMESPACE;

/// Paths of everything staged for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedModule {
    pub meta_file: PathBuf,
    /// `demos.zip` or `no-demos.txt`.
    pub demo_file: PathBuf,
    /// `questions.txt` or `no-questions.txt`.
    pub questions_file: PathBuf,
    pub slides_file: PathBuf,
    /// Staged clips in clip order.
    pub clips: Vec<PathBuf>,
}

impl StagedModule {
    /// Number of files written into the build directory.
    pub fn file_count(&self) -> usize {
        4 + self.clips.len()
    }
}

impl Module {
    /// Run every staging operation concurrently against one build directory.
    ///
    /// The build directory is created first if missing. The first failure
    /// fails the whole call; artifacts already written are left in place.
    pub async fn stage_all(
        &self,
        build_dir: impl AsRef<Path>,
        clip_source: impl AsRef<Path>,
        options: &StageOptions,
    ) -> StageResult<StagedModule> {
        let build_dir = build_dir.as_ref();
        let clip_source = clip_source.as_ref();

        tokio::fs::create_dir_all(build_dir)
            .await
            .map_err(|e| StageError::CreateDirectoryFailed {
                path: build_dir.to_path_buf(),
                source: e,
            })?;

        let (meta_file, demo_file, questions_file, slides_file, clips) = tokio::try_join!(
            self.create_meta_file(build_dir, options),
            self.stage_demo_file(build_dir),
            self.stage_questions_file(build_dir),
            self.stage_slides_file(build_dir),
            self.stage_clips_with(build_dir, clip_source, options),
        )?;

        let staged = StagedModule {
            meta_file,
            demo_file,
            questions_file,
            slides_file,
            clips,
        };

        info!(
            module = %self.id,
            build_dir = %build_dir.display(),
            files = staged.file_count(),
            "Module staged"
        );
        Ok(staged)
    }
}
