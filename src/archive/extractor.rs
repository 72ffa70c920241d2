// file: src/archive/extractor.rs
// description: Selective zip extraction filtered by suffix with top-level folder stripping
// reference: https://docs.rs/zip

use crate::archive::filter::SuffixFilter;
use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipArchive;

pub struct SelectiveExtractor {
    filter: SuffixFilter,
    strip_top_level: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub target_dir: PathBuf,
    /// Relative output paths, in archive order.
    pub extracted: Vec<String>,
    pub skipped: usize,
    pub bytes_written: u64,
}

/// Drops the first `/`-delimited segment of an entry name.
///
/// Names without a separator, or whose remainder is empty, are returned unchanged.
pub fn strip_top_level(name: &str) -> &str {
    match name.split_once('/') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => name,
    }
}

impl SelectiveExtractor {
    pub fn new(filter: SuffixFilter) -> Self {
        Self {
            filter,
            strip_top_level: true,
        }
    }

    /// Keep entry names as they appear in the archive.
    pub fn preserve_paths(mut self) -> Self {
        self.strip_top_level = false;
        self
    }

    /// Extracts matching entries into `target_dir`.
    ///
    /// Entries are written to a staging directory next to `target_dir` which replaces it
    /// only once every entry has been written, so a failed run leaves the previous tree
    /// untouched.
    pub fn extract(&self, archive_path: &Path, target_dir: &Path) -> Result<ExtractionReport> {
        let mut archive = open_archive(archive_path)?;

        let parent = match target_dir.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| PipelineError::file_op(&parent, e))?;

        let staging = tempfile::Builder::new()
            .prefix(".extract-")
            .tempdir_in(&parent)
            .map_err(|e| PipelineError::file_op(&parent, e))?;

        let mut report = self.extract_entries(&mut archive, archive_path, staging.path())?;

        if target_dir.exists() {
            debug!("Replacing existing directory {}", target_dir.display());
            fs::remove_dir_all(target_dir).map_err(|e| PipelineError::file_op(target_dir, e))?;
        }
        fs::rename(staging.path(), target_dir).map_err(|e| PipelineError::file_op(target_dir, e))?;

        report.target_dir = target_dir.to_path_buf();
        info!(
            "Extracted {} files matching '{}' to {} ({} skipped)",
            report.extracted.len(),
            self.filter.suffix(),
            target_dir.display(),
            report.skipped
        );
        Ok(report)
    }

    /// Extracts matching entries straight into an existing directory, without staging.
    pub fn extract_into(&self, archive_path: &Path, dir: &Path) -> Result<ExtractionReport> {
        let mut archive = open_archive(archive_path)?;
        let mut report = self.extract_entries(&mut archive, archive_path, dir)?;
        report.target_dir = dir.to_path_buf();
        Ok(report)
    }

    fn extract_entries(
        &self,
        archive: &mut ZipArchive<File>,
        archive_path: &Path,
        dir: &Path,
    ) -> Result<ExtractionReport> {
        let mut report = ExtractionReport::default();

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| archive_error(archive_path, e))?;

            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            if !self.filter.matches(&name) {
                report.skipped += 1;
                continue;
            }

            let relative = if self.strip_top_level {
                strip_top_level(&name)
            } else {
                name.as_str()
            };

            let Some(relative_path) = Validator::safe_relative_path(relative) else {
                warn!("Skipping entry with unsafe path: {}", name);
                report.skipped += 1;
                continue;
            };

            let output_path = dir.join(&relative_path);
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(|e| PipelineError::file_op(parent, e))?;
            }

            let mut outfile =
                File::create(&output_path).map_err(|e| PipelineError::file_op(&output_path, e))?;
            let written = io::copy(&mut entry, &mut outfile)
                .map_err(|e| PipelineError::file_op(&output_path, e))?;

            debug!("Extracted {} -> {}", name, relative);
            report.bytes_written += written;
            report.extracted.push(relative.to_string());
        }

        Ok(report)
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| PipelineError::file_op(path, e))?;
    ZipArchive::new(file).map_err(|e| archive_error(path, e))
}

fn archive_error(path: &Path, err: zip::result::ZipError) -> PipelineError {
    match err {
        zip::result::ZipError::Io(source) => PipelineError::file_op(path, source),
        source => PipelineError::ArchiveFormat {
            path: path.to_path_buf(),
            source,
        },
    }
}
