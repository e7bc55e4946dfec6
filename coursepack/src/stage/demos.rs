//! Demo bundle staging.
//!
//! A module may ship the starting and finished state of its demos in
//! `ExBefore/` and `ExAfter/`. They are submitted as one `demos.zip` whose
//! top-level folders are `before/` and `after/`. Modules without demos submit
//! an empty `no-demos.txt` instead.

use std::fs::File;
use std::io::{self, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::result::ZipError;
use zip::{CompressionMethod, ZipWriter};

use super::fs::{copy_dir_recursive, path_exists, walk_error};
use crate::error::{StageError, StageResult};
use crate::module::Module;
use crate::naming::{
    ARCHIVE_AFTER_PREFIX, ARCHIVE_BEFORE_PREFIX, DEMOS_ARCHIVE, DEMO_AFTER_DIR, DEMO_BEFORE_DIR,
    NO_DEMOS_FILE,
};

/// Prefix of the temporary directory demos are gathered in.
const STAGING_PREFIX: &str = "demo-staging-";

/// A demo folder to bundle and the archive folder it lands in.
#[derive(Debug, Clone)]
struct DemoSource {
    folder: PathBuf,
    prefix: &'static str,
}

impl Module {
    /// Stage `demos.zip`, or `no-demos.txt` when the module has no demos.
    ///
    /// Returns the path of the file written into the build directory.
    pub async fn stage_demo_file(&self, build_dir: impl AsRef<Path>) -> StageResult<PathBuf> {
        let build_dir = build_dir.as_ref();

        let mut sources = Vec::new();
        for (dir, prefix) in [
            (DEMO_BEFORE_DIR, ARCHIVE_BEFORE_PREFIX),
            (DEMO_AFTER_DIR, ARCHIVE_AFTER_PREFIX),
        ] {
            let folder = self.full_path.join(dir);
            if path_exists(&folder).await {
                sources.push(DemoSource { folder, prefix });
            }
        }

        if sources.is_empty() {
            let path = build_dir.join(NO_DEMOS_FILE);
            tokio::fs::write(&path, b"")
                .await
                .map_err(|e| StageError::WriteFailed {
                    path: path.clone(),
                    source: e,
                })?;
            warn!(module = %self.id, path = %path.display(), "No demos found, wrote placeholder");
            return Ok(path);
        }

        let archive_path = build_dir.join(DEMOS_ARCHIVE);
        let temp_root = std::env::temp_dir();
        let entries = {
            let archive_path = archive_path.clone();
            tokio::task::spawn_blocking(move || {
                build_demo_archive(&sources, &archive_path, &temp_root)
            })
            .await??
        };

        info!(path = %archive_path.display(), entries, "Created demo archive");
        Ok(archive_path)
    }
}

/// Gather the demo folders in a scoped temporary directory and zip them.
///
/// The temporary directory is removed when this returns, on success and on
/// failure. Returns the number of archive entries written.
fn build_demo_archive(
    sources: &[DemoSource],
    archive_path: &Path,
    temp_root: &Path,
) -> StageResult<usize> {
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(temp_root)
        .map_err(|e| StageError::CreateDirectoryFailed {
            path: temp_root.to_path_buf(),
            source: e,
        })?;

    for source in sources {
        let copied = copy_dir_recursive(&source.folder, &staging.path().join(source.prefix))?;
        debug!(folder = %source.folder.display(), files = copied, "Copied demo folder");
    }

    let file = File::create(archive_path).map_err(|e| StageError::WriteFailed {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let mut entries = 0;
    for source in sources {
        entries += add_directory(
            &mut zip,
            &staging.path().join(source.prefix),
            source.prefix,
            archive_path,
        )?;
    }

    let mut writer = zip
        .finish()
        .map_err(|e| archive_error(archive_path, e))?;
    writer.flush().map_err(|e| StageError::WriteFailed {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    Ok(entries)
}

/// Add every file and folder below `dir` to the archive under `prefix/`.
fn add_directory<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    dir: &Path,
    prefix: &str,
    archive_path: &Path,
) -> StageResult<usize> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.add_directory(prefix, options)
        .map_err(|e| archive_error(archive_path, e))?;
    let mut entries = 1;

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| StageError::InvalidPath(entry.path().display().to_string()))?;
        let name = archive_entry_name(prefix, relative);

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)
                .map_err(|e| archive_error(archive_path, e))?;
        } else {
            zip.start_file(name, options)
                .map_err(|e| archive_error(archive_path, e))?;
            let read_failed = |e| StageError::ReadFailed {
                path: entry.path().to_path_buf(),
                source: e,
            };
            let mut file = File::open(entry.path()).map_err(read_failed)?;
            io::copy(&mut file, zip).map_err(read_failed)?;
        }
        entries += 1;
    }

    Ok(entries)
}

fn archive_error(archive_path: &Path, e: ZipError) -> StageError {
    StageError::ArchiveFailed {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Archive entry names always use `/`, whatever the host separator.
fn archive_entry_name(prefix: &str, relative: &Path) -> String {
    let mut name = prefix.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}
