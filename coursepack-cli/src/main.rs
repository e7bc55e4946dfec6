//! Coursepack CLI - stage course modules from the command line.
//!
//! Wraps the coursepack library: validate module metadata, stage a module's
//! submission artifacts into a build directory, and manage the user config
//! file at `~/.coursepack/config.ini`.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use coursepack::config::{config_file_path, ConfigFile};
use coursepack::logging::{init_logging, LoggingGuard};

use commands::common::load_config;
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "coursepack")]
#[command(version, about = "Stage course modules for video-training submission", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a module and report validation findings
    Validate {
        /// Module descriptor (module.yaml) or generated .meta file
        source: PathBuf,

        /// Course identifier (default: [course] id from config)
        #[arg(long)]
        course_id: Option<String>,
    },

    /// Stage every submission artifact of a module into a build directory
    Stage {
        /// Module descriptor (module.yaml) or generated .meta file
        source: PathBuf,

        /// Course identifier (default: [course] id from config)
        #[arg(long)]
        course_id: Option<String>,

        /// Build directory receiving the artifacts (default: [paths] build_dir)
        #[arg(long)]
        build_dir: Option<PathBuf>,

        /// Folder holding the recorded clips (default: [paths] clip_dir)
        #[arg(long)]
        clip_dir: Option<PathBuf>,

        /// Author written into the metadata file (default: [stage] author)
        #[arg(long)]
        author: Option<String>,

        /// Stage even when validation reports findings
        #[arg(long)]
        skip_validation: bool,
    },

    /// Create the configuration file if it does not exist
    Init,

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Validate { source, course_id } => {
            let (config, _logging) = setup_module_command(cli.verbose)?;
            commands::validate::run(commands::validate::ValidateArgs { source, course_id }, &config)
                .await
        }
        Commands::Stage {
            source,
            course_id,
            build_dir,
            clip_dir,
            author,
            skip_validation,
        } => {
            let (config, _logging) = setup_module_command(cli.verbose)?;
            commands::stage::run(
                commands::stage::StageArgs {
                    source,
                    course_id,
                    build_dir,
                    clip_dir,
                    author,
                    skip_validation,
                },
                &config,
            )
            .await
        }
        Commands::Init => {
            let _logging = init_logging(None, cli.verbose)?;
            commands::init::run()
        }
        Commands::Config { command } => {
            let _logging = init_logging(None, cli.verbose)?;
            commands::config::run(command)
        }
    }
}

/// Load the config file and start logging for commands that work on a module.
///
/// An unreadable config file fails the command rather than falling back to
/// defaults.
fn setup_module_command(verbose: bool) -> Result<(ConfigFile, LoggingGuard), CliError> {
    let config = load_config(&config_file_path())?;
    let guard = init_logging(config.logging.file.as_deref(), verbose)?;

    tracing::debug!(version = coursepack::VERSION, "coursepack starting");
    Ok((config, guard))
}
