//! Course module entity, loaders, and validation.
//!
//! A [`Module`] is one lesson unit of a course. It is built by one of two
//! loaders and is read-only afterwards; the staging operations (see the
//! crate root) only read its fields.
//!
//! # Loaders
//!
//! - [`Module::load_from_yaml`] reads the authoring descriptor `module.yaml`
//! - [`Module::load_from_meta`] reads a previously generated `.meta` file
//!
//! Both derive identity from the source file's location:
//!
//! ```text
//! /courses/foo/m1-fooFunModule/module.yaml
//!              └──────┬──────┘
//!                id = "m1-fooFunModule", index = 1
//!                full_path = /courses/foo/m1-fooFunModule
//! ```

mod meta;
mod yaml;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ValidationLimits;
use crate::error::{StageError, StageResult};
use crate::naming;

/// One lesson unit within a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Identifier of the parent course, supplied by the caller.
    pub course_id: String,

    /// Folder-derived slug (e.g., "m1-fooFunModule").
    pub id: String,

    /// 1-based position of the module within the course.
    pub index: u32,

    /// Display title.
    pub title: String,

    /// Customer-facing description.
    pub description: String,

    /// Clip titles in presentation order.
    ///
    /// `None` when the source did not list clips at all, which validation
    /// reports. Position in this list defines each clip's filename suffix.
    pub clips: Option<Vec<String>>,

    /// Directory containing the file the module was loaded from.
    pub full_path: PathBuf,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            course_id: String::new(),
            id: String::new(),
            index: 0,
            title: String::new(),
            description: String::new(),
            clips: Some(Vec::new()),
            full_path: PathBuf::new(),
        }
    }
}

impl Module {
    /// Clip titles, empty when none were listed.
    pub fn clips(&self) -> &[String] {
        self.clips.as_deref().unwrap_or_default()
    }

    /// Filename of this module's metadata file.
    pub fn meta_filename(&self) -> String {
        naming::meta_filename(&self.course_id, self.index)
    }

    /// Validate against the default platform limits.
    ///
    /// Returns one human-readable message per problem; an empty list means the
    /// module is valid.
    pub fn validate(&self) -> Vec<String> {
        self.validate_with(&ValidationLimits::default())
    }

    /// Validate against explicit limits.
    pub fn validate_with(&self, limits: &ValidationLimits) -> Vec<String> {
        let mut results = Vec::new();

        let title_len = self.title.chars().count();
        if title_len == 0 {
            results.push("Module title missing.".to_string());
        } else if title_len > limits.module_title_max {
            results.push(format!(
                "Module title length ({}) invalid. Must be at most {}.",
                title_len, limits.module_title_max
            ));
        }

        match &self.clips {
            None => results.push("Module clips missing.".to_string()),
            Some(clips) => {
                for (index, clip) in clips.iter().enumerate() {
                    let clip_len = clip.chars().count();
                    if clip_len > limits.clip_title_max {
                        results.push(format!(
                            "Clip #{} title length ({}) invalid. Must be at most {}.",
                            index, clip_len, limits.clip_title_max
                        ));
                    }
                }
            }
        }

        results
    }
}

/// Derive the module index from its id.
///
/// The index is the number in the leading `m<number>` token of the id.
///
/// # Examples
///
/// ```
/// use coursepack::module::parse_module_index;
///
/// assert_eq!(parse_module_index("m1-fooFunModule").unwrap(), 1);
/// assert_eq!(parse_module_index("m12-advanced").unwrap(), 12);
/// assert!(parse_module_index("intro").is_err());
/// ```
pub fn parse_module_index(id: &str) -> StageResult<u32> {
    id.split('-')
        .next()
        .and_then(|token| token.strip_prefix('m'))
        .and_then(|number| number.parse::<u32>().ok())
        .ok_or_else(|| StageError::InvalidModuleId(id.to_string()))
}

/// Remove the first newline only.
///
/// Descriptions commonly come from folded YAML scalars that end in a single
/// newline; any further newlines are kept.
pub(crate) fn strip_first_newline(text: &str) -> String {
    text.replacen('\n', "", 1)
}

/// Identity derived from a source file's location.
#[derive(Debug)]
pub(crate) struct SourceLocation {
    pub full_path: PathBuf,
    pub id: String,
    pub index: u32,
}

impl SourceLocation {
    /// Derive folder, id, and index from a source file path.
    pub(crate) fn from_file(path: &Path) -> StageResult<Self> {
        let absolute = absolutize(path)?;
        let full_path = absolute
            .parent()
            .ok_or_else(|| {
                StageError::InvalidPath(format!("{} has no parent directory", path.display()))
            })?
            .to_path_buf();
        let id = full_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                StageError::InvalidPath(format!(
                    "cannot derive module id from {}",
                    full_path.display()
                ))
            })?
            .to_string();
        let index = parse_module_index(&id)?;

        debug!(id = %id, index, folder = %full_path.display(), "Derived module identity");

        Ok(Self {
            full_path,
            id,
            index,
        })
    }
}

/// Fail with [`StageError::PathNotFound`] unless the path exists.
pub(crate) async fn ensure_exists(path: &Path) -> StageResult<()> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => Ok(()),
        _ => Err(StageError::PathNotFound(path.to_path_buf())),
    }
}

fn absolutize(path: &Path) -> StageResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|e| StageError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE_79: &str =
        "abcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyz0";
    const TITLE_53: &str = "abcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyz0";

    #[test]
    fn test_default_module() {
        let module = Module::default();
        assert!(module.title.is_empty());
        assert_eq!(module.index, 0);
        assert_eq!(module.clips, Some(Vec::new()));
        assert!(module.clips().is_empty());
    }

    #[test]
    fn test_validate_title_too_long() {
        assert_eq!(TITLE_79.len(), 79);
        let module = Module {
            title: TITLE_79.to_string(),
            ..Default::default()
        };

        let results = module.validate();
        assert_eq!(results.len(), 1);
        assert!(results[0].contains("79"));
        assert!(results[0].contains("65"));
    }

    #[test]
    fn test_validate_title_within_limit() {
        assert_eq!(TITLE_53.len(), 53);
        let module = Module {
            title: TITLE_53.to_string(),
            ..Default::default()
        };
        assert!(module.validate().is_empty());
    }

    #[test]
    fn test_validate_title_missing() {
        let results = Module::default().validate();
        assert_eq!(results, vec!["Module title missing.".to_string()]);
    }

    #[test]
    fn test_validate_title_counts_characters() {
        // 65 two-byte characters is within limits
        let module = Module {
            title: "é".repeat(65),
            ..Default::default()
        };
        assert!(module.validate().is_empty());
    }

    #[test]
    fn test_validate_clips_missing() {
        let module = Module {
            title: "Intro".to_string(),
            clips: None,
            ..Default::default()
        };
        assert_eq!(module.validate(), vec!["Module clips missing.".to_string()]);
    }

    #[test]
    fn test_validate_reports_each_long_clip() {
        let module = Module {
            title: TITLE_79.to_string(),
            clips: Some(vec![
                "ok".to_string(),
                TITLE_79.to_string(),
                "fine".to_string(),
                "x".repeat(66),
            ]),
            ..Default::default()
        };

        let results = module.validate();
        assert_eq!(results.len(), 3);
        assert!(results[1].starts_with("Clip #1"));
        assert!(results[1].contains("79"));
        assert!(results[2].starts_with("Clip #3"));
        assert!(results[2].contains("66"));
    }

    #[test]
    fn test_validate_with_custom_limits() {
        let module = Module {
            title: "A fairly short title".to_string(),
            ..Default::default()
        };
        let limits = ValidationLimits {
            module_title_max: 10,
            clip_title_max: 10,
        };
        assert_eq!(module.validate_with(&limits).len(), 1);
    }

    #[test]
    fn test_parse_module_index() {
        assert_eq!(parse_module_index("m1-fooFunModule").unwrap(), 1);
        assert_eq!(parse_module_index("m1-fooFunModule-psexpected").unwrap(), 1);
        assert_eq!(parse_module_index("m10").unwrap(), 10);
    }

    #[test]
    fn test_parse_module_index_rejects_malformed() {
        assert!(parse_module_index("").is_err());
        assert!(parse_module_index("module1-intro").is_err());
        assert!(parse_module_index("mx-intro").is_err());
        assert!(matches!(
            parse_module_index("1-intro"),
            Err(StageError::InvalidModuleId(_))
        ));
    }

    #[test]
    fn test_strip_first_newline_only() {
        assert_eq!(strip_first_newline("Brief.\n"), "Brief.");
        assert_eq!(strip_first_newline("a\nb\nc\n"), "ab\nc\n");
        assert_eq!(strip_first_newline("none"), "none");
    }

    #[test]
    fn test_source_location_from_file() {
        let location =
            SourceLocation::from_file(Path::new("/courses/foo/m3-fooFunModule/module.yaml"))
                .unwrap();
        assert_eq!(location.id, "m3-fooFunModule");
        assert_eq!(location.index, 3);
        assert_eq!(
            location.full_path,
            PathBuf::from("/courses/foo/m3-fooFunModule")
        );
    }

    #[test]
    fn test_source_location_relative_path_is_absolutized() {
        let location = SourceLocation::from_file(Path::new("m2-bar/module.yaml")).unwrap();
        assert!(location.full_path.is_absolute());
        assert_eq!(location.id, "m2-bar");
    }

    #[test]
    fn test_meta_filename() {
        let module = Module {
            course_id: "foo-fundamentals".to_string(),
            index: 2,
            ..Default::default()
        };
        assert_eq!(module.meta_filename(), "foo-fundamentals-m2.meta");
    }
}
