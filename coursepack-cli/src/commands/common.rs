//! Helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use console::style;
use coursepack::config::ConfigFile;
use coursepack::{Module, StageResult, ValidationLimits};

use crate::error::CliError;

/// Kind of module source file, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Authoring descriptor (`.yaml` / `.yml`).
    Yaml,
    /// Generated metadata file (`.meta`).
    Meta,
}

impl SourceKind {
    /// Detect the source kind from a file path.
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => Ok(SourceKind::Yaml),
            "meta" => Ok(SourceKind::Meta),
            _ => Err(CliError::Config(format!(
                "Unsupported source '{}'. Expected a .yaml, .yml or .meta file.",
                path.display()
            ))),
        }
    }
}

/// Load a module with the loader matching the source's extension.
pub async fn load_module(course_id: &str, source: &Path) -> Result<Module, CliError> {
    let loaded: StageResult<Module> = match SourceKind::from_path(source)? {
        SourceKind::Yaml => Module::load_from_yaml(course_id, source).await,
        SourceKind::Meta => Module::load_from_meta(course_id, source).await,
    };
    Ok(loaded?)
}

/// Load the config file at `path`, or defaults when it does not exist.
///
/// A file that exists but does not parse is an error.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load_from(path)?)
}

/// Validate a module, print the findings, and decide whether to continue.
///
/// Findings fail with [`CliError::Validation`] unless `allow_findings` is set.
pub fn check_validation(
    module: &Module,
    limits: &ValidationLimits,
    allow_findings: bool,
) -> Result<(), CliError> {
    let findings = module.validate_with(limits);
    let count = report_findings(module, &findings);

    if count == 0 {
        Ok(())
    } else if allow_findings {
        println!("{}", style("Continuing despite validation findings.").yellow());
        Ok(())
    } else {
        Err(CliError::Validation(count))
    }
}

/// Resolve the course id: CLI takes precedence, then config.
pub fn resolve_course_id(cli: Option<String>, config: &ConfigFile) -> Result<String, CliError> {
    cli.or_else(|| config.course.id.clone()).ok_or_else(|| {
        CliError::Config(
            "Course id not set. Use --course-id or 'coursepack config set course.id <ID>'."
                .to_string(),
        )
    })
}

/// Resolve a required directory: CLI takes precedence, then config.
pub fn resolve_dir(
    cli: Option<PathBuf>,
    configured: Option<&PathBuf>,
    flag: &str,
    key: &str,
) -> Result<PathBuf, CliError> {
    cli.or_else(|| configured.cloned()).ok_or_else(|| {
        CliError::Config(format!(
            "No directory given. Use --{} or 'coursepack config set {} <DIR>'.",
            flag, key
        ))
    })
}

/// Print validation findings; returns their count.
fn report_findings(module: &Module, findings: &[String]) -> usize {
    if findings.is_empty() {
        println!("{} {} is valid", style("✓").green(), module.id);
    } else {
        println!(
            "{} {} has {} problem(s):",
            style("✗").red(),
            module.id,
            findings.len()
        );
        for finding in findings {
            println!("  - {}", finding);
        }
    }
    findings.len()
}
