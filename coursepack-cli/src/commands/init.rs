//! Init command - create the configuration file.

use coursepack::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
///
/// An existing file is left untouched.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() {
        println!("Configuration file already exists: {}", path.display());
        return Ok(());
    }

    ConfigFile::default().save()?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Set your course id with 'coursepack config set course.id <ID>'.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
