// file: src/archive/cleaner.rs
// description: Rebuilds an archive keeping only entries that match a suffix filter
// reference: https://docs.rs/tempfile

use crate::archive::builder::{ArchiveBuilder, BuildReport};
use crate::archive::extractor::SelectiveExtractor;
use crate::archive::filter::SuffixFilter;
use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// `cleaned_<stem>.zip` beside the input archive.
pub fn default_cleaned_path(archive_path: &Path) -> PathBuf {
    let stem = archive_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "archive".to_string());

    archive_path.with_file_name(format!("cleaned_{}.zip", stem))
}

/// Copies the entries of `archive_path` that match `filter` into a new archive.
///
/// Entry names are kept as-is, including any top-level folder. The scratch directory is
/// removed on every exit path.
pub fn clean_archive(
    archive_path: &Path,
    output: Option<&Path>,
    filter: &SuffixFilter,
) -> Result<BuildReport> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_cleaned_path(archive_path));

    let scratch = tempfile::tempdir().map_err(|e| PipelineError::file_op(std::env::temp_dir(), e))?;

    let extraction = SelectiveExtractor::new(filter.clone())
        .preserve_paths()
        .extract_into(archive_path, scratch.path())?;

    let report = ArchiveBuilder::new().build(scratch.path(), &output)?;

    info!(
        "Cleaned zip with {} '{}' files created at {} ({} entries dropped)",
        report.entries.len(),
        filter.suffix(),
        output.display(),
        extraction.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            writer.start_file(name.to_string(), options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_default_cleaned_path() {
        assert_eq!(
            default_cleaned_path(Path::new("/tmp/work/widgets-HEAD.zip")),
            PathBuf::from("/tmp/work/cleaned_widgets-HEAD.zip")
        );
    }

    #[test]
    fn test_clean_archive_keeps_matching_entries() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("widgets-HEAD.zip");
        write_zip(
            &input,
            &[
                ("widgets-main/README.md", "# readme"),
                ("widgets-main/src/app.py", "app"),
                ("widgets-main/tests/Test_App.PY", "test"),
            ],
        );

        let report = clean_archive(&input, None, &SuffixFilter::new(".py")).unwrap();

        assert_eq!(report.output, temp.path().join("cleaned_widgets-HEAD.zip"));
        assert_eq!(
            report.entries,
            vec!["widgets-main/src/app.py", "widgets-main/tests/Test_App.PY"]
        );
    }

    #[test]
    fn test_clean_archive_explicit_output() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.zip");
        write_zip(&input, &[("docs/guide.md", "guide"), ("main.py", "main")]);

        let output = temp.path().join("docs_only.zip");
        let report = clean_archive(&input, Some(&output), &SuffixFilter::new(".md")).unwrap();

        assert_eq!(report.entries, vec!["docs/guide.md"]);
        assert!(output.is_file());
    }
}
