//! Video clip staging.

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::{debug, info};

use super::fs::copy_file;
use crate::config::StageOptions;
use crate::error::{StageError, StageResult};
use crate::module::Module;
use crate::naming::{self, DEFAULT_CLIP_EXTENSION};

impl Module {
    /// Copy every clip from `clip_source` into the build directory under its
    /// submission name, using the default `mp4` extension.
    ///
    /// See [`Module::stage_clips_with`].
    pub async fn stage_clips(
        &self,
        build_dir: impl AsRef<Path>,
        clip_source: impl AsRef<Path>,
    ) -> StageResult<Vec<PathBuf>> {
        self.stage_clips_inner(
            build_dir.as_ref(),
            clip_source.as_ref(),
            DEFAULT_CLIP_EXTENSION,
        )
        .await
    }

    /// Copy every clip using the extension from `options`.
    ///
    /// The clip at 0-based position `i` is read from
    /// `{clip_source}/{id}-{pad2(i+1)}.{ext}` and written to
    /// `{build_dir}/{course_id}-m{index}-{pad2(i+1)}.{ext}`.
    ///
    /// Copies run concurrently. The returned destinations follow clip order.
    /// The first failed copy fails the whole call and the remaining copies
    /// are dropped.
    pub async fn stage_clips_with(
        &self,
        build_dir: impl AsRef<Path>,
        clip_source: impl AsRef<Path>,
        options: &StageOptions,
    ) -> StageResult<Vec<PathBuf>> {
        self.stage_clips_inner(
            build_dir.as_ref(),
            clip_source.as_ref(),
            &options.clip_extension,
        )
        .await
    }

    async fn stage_clips_inner(
        &self,
        build_dir: &Path,
        clip_source: &Path,
        extension: &str,
    ) -> StageResult<Vec<PathBuf>> {
        let copies = (1..=self.clips().len()).map(|position| {
            let from = clip_source.join(naming::source_clip_filename(&self.id, position, extension));
            let to = build_dir.join(naming::staged_clip_filename(
                &self.course_id,
                self.index,
                position,
                extension,
            ));
            async move {
                copy_file(&from, &to).await?;
                debug!(from = %from.display(), to = %to.display(), "Copied clip");
                Ok::<_, StageError>(to)
            }
        });

        let staged = try_join_all(copies).await?;

        info!(module = %self.id, clips = staged.len(), "Staged clips");
        Ok(staged)
    }
}
