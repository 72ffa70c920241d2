// file: src/archive/builder.rs
// description: Deterministic zip creation from a directory tree
// reference: https://docs.rs/zip, https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use crate::utils::files::set_published_permissions;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub struct ArchiveBuilder {
    options: SimpleFileOptions,
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub output: PathBuf,
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
    pub bytes_archived: u64,
}

impl ArchiveBuilder {
    /// Deflate with a fixed timestamp and mode so identical trees give identical archives.
    pub fn new() -> Self {
        Self {
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(DateTime::default())
                .unix_permissions(0o644),
        }
    }

    /// Writes every regular file under `source_dir` into a new archive at `output`.
    ///
    /// The archive is assembled in a temporary file beside `output` and renamed over it
    /// on success.
    pub fn build(&self, source_dir: &Path, output: &Path) -> Result<BuildReport> {
        let metadata =
            fs::metadata(source_dir).map_err(|e| PipelineError::file_op(source_dir, e))?;
        if !metadata.is_dir() {
            return Err(PipelineError::file_op(
                source_dir,
                io::Error::new(io::ErrorKind::InvalidInput, "source is not a directory"),
            ));
        }

        let parent = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let staging = tempfile::Builder::new()
            .prefix(".build-")
            .suffix(".zip.part")
            .tempfile_in(parent)
            .map_err(|e| PipelineError::file_op(parent, e))?;

        let mut writer = ZipWriter::new(staging);
        let mut report = BuildReport::default();

        for entry in WalkDir::new(source_dir)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| PipelineError::file_op(source_dir, io::Error::from(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(source_dir).unwrap_or(path);
            let name = Validator::entry_name(relative);

            writer
                .start_file(name.as_str(), self.options)
                .map_err(|e| write_error(output, e))?;
            let mut input = File::open(path).map_err(|e| PipelineError::file_op(path, e))?;
            let copied =
                io::copy(&mut input, &mut writer).map_err(|e| PipelineError::file_op(output, e))?;

            debug!("Archived {} ({} bytes)", name, copied);
            report.bytes_archived += copied;
            report.entries.push(name);
        }

        let staging = writer.finish().map_err(|e| write_error(output, e))?;
        set_published_permissions(staging.as_file())
            .map_err(|e| PipelineError::file_op(output, e))?;
        staging
            .persist(output)
            .map_err(|e| PipelineError::file_op(output, e.error))?;

        report.output = output.to_path_buf();
        info!(
            "Created archive {} with {} entries",
            output.display(),
            report.entries.len()
        );
        Ok(report)
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn write_error(path: &Path, err: zip::result::ZipError) -> PipelineError {
    match err {
        zip::result::ZipError::Io(source) => PipelineError::file_op(path, source),
        source => PipelineError::ArchiveFormat {
            path: path.to_path_buf(),
            source,
        },
    }
}
