//! Stage command - write every submission artifact of a module.

use std::path::PathBuf;

use console::style;
use coursepack::config::ConfigFile;
use coursepack::StagedModule;
use tracing::info;

use super::common::{check_validation, load_module, resolve_course_id, resolve_dir};
use crate::error::CliError;

/// Arguments for the stage command.
pub struct StageArgs {
    pub source: PathBuf,
    pub course_id: Option<String>,
    pub build_dir: Option<PathBuf>,
    pub clip_dir: Option<PathBuf>,
    pub author: Option<String>,
    pub skip_validation: bool,
}

/// Run the stage command.
pub async fn run(args: StageArgs, config: &ConfigFile) -> Result<(), CliError> {
    // CLI takes precedence, then config
    let course_id = resolve_course_id(args.course_id, config)?;
    let build_dir = resolve_dir(
        args.build_dir,
        config.paths.build_dir.as_ref(),
        "build-dir",
        "paths.build_dir",
    )?;
    let clip_dir = resolve_dir(
        args.clip_dir,
        config.paths.clip_dir.as_ref(),
        "clip-dir",
        "paths.clip_dir",
    )?;

    let mut options = config.stage_options();
    if let Some(author) = args.author {
        options = options.with_author(author);
    }

    let module = load_module(&course_id, &args.source).await?;

    check_validation(&module, &options.limits, args.skip_validation)?;

    info!(module = %module.id, build_dir = %build_dir.display(), "Staging module");
    let staged = module.stage_all(&build_dir, &clip_dir, &options).await?;

    print_staged(&staged);
    Ok(())
}

fn print_staged(staged: &StagedModule) {
    println!(
        "{} Staged {} file(s):",
        style("✓").green(),
        staged.file_count()
    );
    for path in [
        &staged.meta_file,
        &staged.demo_file,
        &staged.questions_file,
        &staged.slides_file,
    ]
    .into_iter()
    .chain(staged.clips.iter())
    {
        println!("  {}", path.display());
    }
}
