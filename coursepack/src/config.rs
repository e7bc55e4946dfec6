//! Staging options and the user configuration file.
//!
//! Two layers:
//!
//! - [`StageOptions`] is what the library consumes. It carries the values the
//!   staging operations would otherwise hardcode (metadata author, clip
//!   extension, validation limits).
//! - [`ConfigFile`] is the INI file at `~/.coursepack/config.ini` that the CLI
//!   reads defaults from. [`ConfigFile::stage_options`] bridges the two.
//!
//! # File Format
//!
//! ```text
//! [course]
//! id = foo-fundamentals
//!
//! [stage]
//! author = andrew-connell
//! clip_extension = mp4
//!
//! [paths]
//! build_dir = /home/me/build
//! clip_dir = /home/me/recordings
//!
//! [validation]
//! module_title_max = 65
//! clip_title_max = 65
//!
//! [logging]
//! file = /home/me/.coursepack/coursepack.log
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::naming::DEFAULT_CLIP_EXTENSION;

/// Author written into metadata files when none is configured.
pub const DEFAULT_AUTHOR: &str = "andrew-connell";

/// Maximum module title length accepted by the platform.
pub const DEFAULT_MODULE_TITLE_MAX: usize = 65;

/// Maximum clip title length accepted by the platform.
pub const DEFAULT_CLIP_TITLE_MAX: usize = 65;

/// Directory under the home directory holding the config file.
const CONFIG_DIR_NAME: &str = ".coursepack";

/// Config filename.
const CONFIG_FILE_NAME: &str = "config.ini";

/// Length limits applied by [`crate::Module::validate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Maximum module title length, in characters.
    pub module_title_max: usize,

    /// Maximum clip title length, in characters.
    pub clip_title_max: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            module_title_max: DEFAULT_MODULE_TITLE_MAX,
            clip_title_max: DEFAULT_CLIP_TITLE_MAX,
        }
    }
}

/// Options consumed by the staging operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOptions {
    /// Author written into the metadata file.
    pub author: String,

    /// Extension of recorded and staged clips, without the dot.
    pub clip_extension: String,

    /// Validation length limits.
    pub limits: ValidationLimits,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            clip_extension: DEFAULT_CLIP_EXTENSION.to_string(),
            limits: ValidationLimits::default(),
        }
    }
}

impl StageOptions {
    /// Create options with the given metadata author.
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Default::default()
        }
    }

    /// Set the metadata author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the clip extension (leading dots are ignored).
    pub fn with_clip_extension(mut self, extension: impl Into<String>) -> Self {
        self.clip_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Set the validation limits.
    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Errors reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// Config file could not be read or written.
    #[error("config I/O error at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Config file is not valid INI.
    #[error("failed to parse config {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// Unknown `section.key` name.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Value rejected for a key.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// `[course]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseSettings {
    /// Course identifier used in every staged filename.
    pub id: Option<String>,
}

/// `[stage]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSettings {
    pub author: String,
    pub clip_extension: String,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            clip_extension: DEFAULT_CLIP_EXTENSION.to_string(),
        }
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSettings {
    /// Build directory receiving staged artifacts.
    pub build_dir: Option<PathBuf>,

    /// Folder holding recorded clips.
    pub clip_dir: Option<PathBuf>,
}

/// `[validation]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSettings {
    pub module_title_max: usize,
    pub clip_title_max: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            module_title_max: DEFAULT_MODULE_TITLE_MAX,
            clip_title_max: DEFAULT_CLIP_TITLE_MAX,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Optional log file; console logging is always on.
    pub file: Option<PathBuf>,
}

/// Parsed user configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub course: CourseSettings,
    pub stage: StageSettings,
    pub paths: PathSettings,
    pub validation: ValidationSettings,
    pub logging: LoggingSettings,
}

/// Location of the user config file (`~/.coursepack/config.ini`).
///
/// Falls back to the current directory when no home directory is known.
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

impl ConfigFile {
    /// Load the user config file, or defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        if dirs::home_dir().is_none() {
            return Err(ConfigError::NoHomeDirectory);
        }
        Self::load_from(&config_file_path())
    }

    /// Load a config file from an explicit path, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(parse) => ConfigError::Parse {
                path: path.to_path_buf(),
                reason: parse.to_string(),
            },
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Save to the user config file, creating its directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to an explicit path, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }

        ini.write_to_file(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Staging options derived from the `[stage]` and `[validation]` sections.
    pub fn stage_options(&self) -> StageOptions {
        StageOptions::new(self.stage.author.clone())
            .with_clip_extension(self.stage.clip_extension.clone())
            .with_limits(ValidationLimits {
                module_title_max: self.validation.module_title_max,
                clip_title_max: self.validation.clip_title_max,
            })
    }
}

/// Addressable configuration keys, in `section.key` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    CourseId,
    StageAuthor,
    StageClipExtension,
    PathsBuildDir,
    PathsClipDir,
    ValidationModuleTitleMax,
    ValidationClipTitleMax,
    LoggingFile,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::CourseId,
            ConfigKey::StageAuthor,
            ConfigKey::StageClipExtension,
            ConfigKey::PathsBuildDir,
            ConfigKey::PathsClipDir,
            ConfigKey::ValidationModuleTitleMax,
            ConfigKey::ValidationClipTitleMax,
            ConfigKey::LoggingFile,
        ]
    }

    /// INI section holding this key.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::CourseId => "course",
            ConfigKey::StageAuthor | ConfigKey::StageClipExtension => "stage",
            ConfigKey::PathsBuildDir | ConfigKey::PathsClipDir => "paths",
            ConfigKey::ValidationModuleTitleMax | ConfigKey::ValidationClipTitleMax => {
                "validation"
            }
            ConfigKey::LoggingFile => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::CourseId => "id",
            ConfigKey::StageAuthor => "author",
            ConfigKey::StageClipExtension => "clip_extension",
            ConfigKey::PathsBuildDir => "build_dir",
            ConfigKey::PathsClipDir => "clip_dir",
            ConfigKey::ValidationModuleTitleMax => "module_title_max",
            ConfigKey::ValidationClipTitleMax => "clip_title_max",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string (empty when unset).
    pub fn get(&self, config: &ConfigFile) -> String {
        fn path_str(path: &Option<PathBuf>) -> String {
            path.as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default()
        }

        match self {
            ConfigKey::CourseId => config.course.id.clone().unwrap_or_default(),
            ConfigKey::StageAuthor => config.stage.author.clone(),
            ConfigKey::StageClipExtension => config.stage.clip_extension.clone(),
            ConfigKey::PathsBuildDir => path_str(&config.paths.build_dir),
            ConfigKey::PathsClipDir => path_str(&config.paths.clip_dir),
            ConfigKey::ValidationModuleTitleMax => config.validation.module_title_max.to_string(),
            ConfigKey::ValidationClipTitleMax => config.validation.clip_title_max.to_string(),
            ConfigKey::LoggingFile => path_str(&config.logging.file),
        }
    }

    /// Set a value from its string form.
    ///
    /// Empty values clear optional keys.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional_path = || (!value.is_empty()).then(|| PathBuf::from(value));

        match self {
            ConfigKey::CourseId => {
                config.course.id = (!value.is_empty()).then(|| value.to_string());
            }
            ConfigKey::StageAuthor => {
                if value.is_empty() {
                    return Err(self.invalid("author must not be empty"));
                }
                config.stage.author = value.to_string();
            }
            ConfigKey::StageClipExtension => {
                let extension = value.trim_start_matches('.');
                if extension.is_empty() || extension.contains(['/', '\\', '.']) {
                    return Err(self.invalid("expected a bare extension such as 'mp4'"));
                }
                config.stage.clip_extension = extension.to_string();
            }
            ConfigKey::PathsBuildDir => config.paths.build_dir = optional_path(),
            ConfigKey::PathsClipDir => config.paths.clip_dir = optional_path(),
            ConfigKey::ValidationModuleTitleMax => {
                config.validation.module_title_max = self.parse_limit(value)?;
            }
            ConfigKey::ValidationClipTitleMax => {
                config.validation.clip_title_max = self.parse_limit(value)?;
            }
            ConfigKey::LoggingFile => config.logging.file = optional_path(),
        }
        Ok(())
    }

    fn parse_limit(&self, value: &str) -> Result<usize, ConfigError> {
        match value.parse::<usize>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => Err(self.invalid("expected a positive whole number")),
        }
    }

    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
