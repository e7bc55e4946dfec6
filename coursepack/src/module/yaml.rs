//! Loader for the authoring descriptor (`module.yaml`).

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{ensure_exists, strip_first_newline, Module, SourceLocation};
use crate::error::{StageError, StageResult};

#[derive(Debug, Deserialize)]
struct SourceDescriptor {
    module: ModuleSection,
}

#[derive(Debug, Deserialize)]
struct ModuleSection {
    title: String,
    description: String,
    #[serde(default)]
    clips: Option<Vec<String>>,
}

impl Module {
    /// Load a module from its YAML source descriptor.
    ///
    /// # Arguments
    ///
    /// * `course_id` - Course the module belongs to
    /// * `path` - Path to the descriptor, inside the module folder
    ///
    /// # Errors
    ///
    /// [`StageError::PathNotFound`] if the file does not exist,
    /// [`StageError::YamlParse`] if it is not a valid descriptor, and
    /// [`StageError::InvalidModuleId`] if the folder name carries no index.
    pub async fn load_from_yaml(course_id: &str, path: impl AsRef<Path>) -> StageResult<Module> {
        let path = path.as_ref();
        ensure_exists(path).await?;

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StageError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let descriptor: SourceDescriptor =
            serde_yaml::from_str(&text).map_err(|e| StageError::YamlParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        let location = SourceLocation::from_file(path)?;
        let section = descriptor.module;

        debug!(
            path = %path.display(),
            clips = section.clips.as_ref().map_or(0, Vec::len),
            "Loaded module descriptor"
        );

        Ok(Module {
            course_id: course_id.to_string(),
            id: location.id,
            index: location.index,
            title: strip_first_newline(&section.title),
            description: strip_first_newline(&section.description),
            clips: section.clips,
            full_path: location.full_path,
        })
    }
}
