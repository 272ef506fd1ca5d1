use std::path::{Path, PathBuf};

use crate::acquisition::domain::video_source::VideoSource;

use super::trim_result_store::{TrimResultStore, TrimResultStoreError};
use super::trim_video_use_case::{TrimOutcome, TrimVideoUseCase};
use super::video_outcome::{BatchReport, VideoOutcome};

#[derive(Clone, Debug, PartialEq)]
pub struct BatchOptions {
    pub download_dir: PathBuf,
    /// Leave the untrimmed download on disk after a successful trim.
    pub keep_originals: bool,
}

/// Download, trim and record a list of URLs, one after another.
///
/// Per-video failures are logged and reported; the batch moves on. The one
/// hard failure is being unable to persist results, which aborts the run
/// before any further original is deleted.
pub struct ProcessBatchUseCase {
    source: Box<dyn VideoSource>,
    trimmer: TrimVideoUseCase,
    store: TrimResultStore,
    options: BatchOptions,
}

impl ProcessBatchUseCase {
    pub fn new(
        source: Box<dyn VideoSource>,
        trimmer: TrimVideoUseCase,
        store: TrimResultStore,
        options: BatchOptions,
    ) -> Self {
        Self {
            source,
            trimmer,
            store,
            options,
        }
    }

    pub fn execute(&mut self, urls: &[String]) -> Result<BatchReport, TrimResultStoreError> {
        log::info!("Found {} videos to process", urls.len());
        let mut report = BatchReport::default();

        for (i, url) in urls.iter().enumerate() {
            log::info!("Processing video {} of {}: {url}", i + 1, urls.len());
            let outcome = self.process_one(url)?;
            report.push(url.clone(), outcome);
        }

        report.log_summary();
        Ok(report)
    }

    pub fn store(&self) -> &TrimResultStore {
        &self.store
    }

    fn process_one(&mut self, url: &str) -> Result<VideoOutcome, TrimResultStoreError> {
        let video = match self.source.fetch(url, &self.options.download_dir) {
            Ok(path) => path,
            Err(e) => {
                log::error!("Download of {url} failed: {e}");
                return Ok(VideoOutcome::DownloadFailed(e.to_string()));
            }
        };

        let outcome = match self.trimmer.execute(&video) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Failed to trim {}: {e}", video.display());
                return Ok(VideoOutcome::ExtractionFailed(e.to_string()));
            }
        };

        if let TrimOutcome::Trimmed { ranges, .. } = &outcome {
            self.store.record(video_name(&video), ranges.clone());
            self.store.flush()?;
            if !self.options.keep_originals {
                remove_original(&video);
            }
        }
        Ok(outcome.into())
    }
}

fn video_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn remove_original(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::info!("Removed original {}", path.display()),
        Err(e) => log::warn!("Could not remove {}: {e}", path.display()),
    }
}
