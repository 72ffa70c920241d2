// file: src/pipeline/orchestrator.rs
// description: coordinates archive download, selective extraction, and repackaging
// reference: sequential fetch -> extract -> build workflow

use crate::archive::{ArchiveBuilder, BuildReport, ExtractionReport, SelectiveExtractor, SuffixFilter};
use crate::config::Config;
use crate::error::{PipelineError, PipelineStage, Result};
use crate::models::{Artifact, RemoteArchiveRef};
use crate::pipeline::progress::PipelineStats;
use crate::remote::{ArchiveFetcher, FetchedArchive};
use crate::utils::OperationTimer;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

/// Locations of every stage output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub archive_path: PathBuf,
    pub extract_dir: PathBuf,
    pub output_archive: PathBuf,
}

impl PipelinePaths {
    /// `<repo>-HEAD.zip`, `<extract_dir_name>/` and `cleaned_<repo>.zip` under `working_dir`.
    pub fn conventional(
        working_dir: &Path,
        remote: &RemoteArchiveRef,
        extract_dir_name: &str,
    ) -> Self {
        Self {
            archive_path: working_dir.join(remote.default_archive_name()),
            extract_dir: working_dir.join(extract_dir_name),
            output_archive: working_dir.join(remote.cleaned_archive_name()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub remote: RemoteArchiveRef,
    pub downloaded: Artifact,
    pub fetched_at: DateTime<Utc>,
    pub extraction: ExtractionReport,
    pub build: BuildReport,
    pub cleaned: Artifact,
    pub stats: PipelineStats,
}

pub struct PipelineOrchestrator {
    config: Config,
    fetcher: ArchiveFetcher,
    stage: PipelineStage,
}

impl PipelineOrchestrator {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = ArchiveFetcher::new(config.remote.clone())?;

        Ok(Self {
            config,
            fetcher,
            stage: PipelineStage::Fetching,
        })
    }

    /// Current state; `Done` or `Failed` once a run has returned.
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Runs the pipeline with the conventional layout under `working_dir`.
    pub async fn fetch_clean_zip(
        &mut self,
        remote: &RemoteArchiveRef,
        working_dir: &Path,
    ) -> Result<PipelineReport> {
        tokio::fs::create_dir_all(working_dir)
            .await
            .map_err(|e| PipelineError::file_op(working_dir, e))?;

        let paths =
            PipelinePaths::conventional(working_dir, remote, &self.config.pipeline.extract_dir_name);
        let filter = SuffixFilter::new(&self.config.pipeline.suffix);

        self.run(remote, &paths, &filter).await
    }

    pub async fn run(
        &mut self,
        remote: &RemoteArchiveRef,
        paths: &PipelinePaths,
        filter: &SuffixFilter,
    ) -> Result<PipelineReport> {
        let start = Instant::now();
        info!("Starting archive pipeline for {}", remote);

        match self.run_stages(remote, paths, filter).await {
            Ok(mut report) => {
                self.stage = PipelineStage::Done;
                report.stats.duration = start.elapsed();
                self.log_final_stats(&report);
                Ok(report)
            }
            Err(e) => {
                let failed_in = self.stage;
                self.stage = PipelineStage::Failed;
                error!("Pipeline failed during {} stage: {}", failed_in, e);
                Err(e.in_stage(failed_in))
            }
        }
    }

    async fn run_stages(
        &mut self,
        remote: &RemoteArchiveRef,
        paths: &PipelinePaths,
        filter: &SuffixFilter,
    ) -> Result<PipelineReport> {
        self.stage = PipelineStage::Fetching;
        let timer = OperationTimer::new("fetch");
        let fetched = self.fetcher.fetch(remote, Some(&paths.archive_path)).await?;
        let fetch_duration = timer.finish();

        self.stage = PipelineStage::Extracting;
        let timer = OperationTimer::new("extract");
        let extraction = self.extract(&fetched, &paths.extract_dir, filter).await?;
        timer.finish_with_count(extraction.extracted.len());

        self.stage = PipelineStage::Building;
        let timer = OperationTimer::new("build");
        let build = self.build(&paths.extract_dir, &paths.output_archive).await?;
        timer.finish_with_count(build.entries.len());

        let downloaded = self.hash(&fetched.path).await?;
        let cleaned = self.hash(&build.output).await?;

        let stats = PipelineStats {
            bytes_downloaded: fetched.bytes,
            files_extracted: extraction.extracted.len(),
            entries_skipped: extraction.skipped,
            entries_archived: build.entries.len(),
            bytes_archived: build.bytes_archived,
            fetch_duration,
            ..PipelineStats::new()
        };

        Ok(PipelineReport {
            remote: remote.clone(),
            downloaded,
            fetched_at: fetched.fetched_at,
            extraction,
            build,
            cleaned,
            stats,
        })
    }

    async fn extract(
        &self,
        fetched: &FetchedArchive,
        extract_dir: &Path,
        filter: &SuffixFilter,
    ) -> Result<ExtractionReport> {
        let archive_path = fetched.path.clone();
        let extract_dir = extract_dir.to_path_buf();
        let filter = filter.clone();

        tokio::task::spawn_blocking(move || {
            SelectiveExtractor::new(filter).extract(&archive_path, &extract_dir)
        })
        .await
        .map_err(|e| {
            PipelineError::Io(std::io::Error::other(format!(
                "Extraction task failed: {}",
                e
            )))
        })?
    }

    async fn build(&self, source_dir: &Path, output: &Path) -> Result<BuildReport> {
        let source_dir = source_dir.to_path_buf();
        let output = output.to_path_buf();

        tokio::task::spawn_blocking(move || ArchiveBuilder::new().build(&source_dir, &output))
            .await
            .map_err(|e| {
                PipelineError::Io(std::io::Error::other(format!("Build task failed: {}", e)))
            })?
    }

    async fn hash(&self, path: &Path) -> Result<Artifact> {
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || Artifact::from_path(&path))
            .await
            .map_err(|e| {
                PipelineError::Io(std::io::Error::other(format!("Hash task failed: {}", e)))
            })?
    }

    fn log_final_stats(&self, report: &PipelineReport) {
        let stats = &report.stats;
        info!("=== Pipeline Execution Summary ===");
        info!("Repository: {}", report.remote);
        info!("Duration: {:.2} seconds", stats.duration.as_secs_f64());
        info!(
            "Downloaded: {} bytes at {} (sha256 {})",
            stats.bytes_downloaded,
            report.fetched_at.to_rfc3339(),
            report.downloaded.sha256
        );
        info!("Download rate: {:.2} KB/sec", stats.download_rate() / 1024.0);
        info!("Files extracted: {}", stats.files_extracted);
        info!("Entries skipped: {}", stats.entries_skipped);
        info!("Keep rate: {:.2}%", stats.keep_rate());
        info!("Entries archived: {}", stats.entries_archived);
        info!("Cleaned archive: {}", report.cleaned.path.display());
        info!("=================================");
    }
}
