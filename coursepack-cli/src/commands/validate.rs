//! Validate command - load a module and report metadata problems.

use std::path::PathBuf;

use coursepack::config::ConfigFile;

use super::common::{check_validation, load_module, resolve_course_id};
use crate::error::CliError;

/// Arguments for the validate command.
pub struct ValidateArgs {
    pub source: PathBuf,
    pub course_id: Option<String>,
}

/// Run the validate command.
///
/// Fails with [`CliError::Validation`] when any finding is reported.
pub async fn run(args: ValidateArgs, config: &ConfigFile) -> Result<(), CliError> {
    let course_id = resolve_course_id(args.course_id, config)?;
    let module = load_module(&course_id, &args.source).await?;

    check_validation(&module, &config.stage_options().limits, false)
}
