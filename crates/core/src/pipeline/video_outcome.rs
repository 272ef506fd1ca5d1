use std::path::PathBuf;

use crate::shared::time_range::TimeRange;

use super::trim_video_use_case::TrimOutcome;

/// What happened to one URL of a batch.
#[derive(Clone, Debug, PartialEq)]
pub enum VideoOutcome {
    Trimmed {
        output: PathBuf,
        ranges: Vec<TimeRange>,
    },
    NoMatches,
    Unreadable(String),
    DownloadFailed(String),
    ExtractionFailed(String),
}

impl From<TrimOutcome> for VideoOutcome {
    fn from(outcome: TrimOutcome) -> Self {
        match outcome {
            TrimOutcome::Trimmed { output, ranges } => VideoOutcome::Trimmed { output, ranges },
            TrimOutcome::NoMatches => VideoOutcome::NoMatches,
            TrimOutcome::Unreadable(reason) => VideoOutcome::Unreadable(reason),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchEntry {
    pub url: String,
    pub outcome: VideoOutcome,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn push(&mut self, url: impl Into<String>, outcome: VideoOutcome) {
        self.entries.push(BatchEntry {
            url: url.into(),
            outcome,
        });
    }

    pub fn trimmed(&self) -> usize {
        self.count(|o| matches!(o, VideoOutcome::Trimmed { .. }))
    }

    pub fn no_matches(&self) -> usize {
        self.count(|o| matches!(o, VideoOutcome::NoMatches))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                VideoOutcome::Unreadable(_)
                    | VideoOutcome::DownloadFailed(_)
                    | VideoOutcome::ExtractionFailed(_)
            )
        })
    }

    fn count(&self, pred: impl Fn(&VideoOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }

    pub fn log_summary(&self) {
        log::info!(
            "Processed {} videos: {} trimmed, {} without matches, {} failed",
            self.entries.len(),
            self.trimmed(),
            self.no_matches(),
            self.failed()
        );
        for entry in &self.entries {
            match &entry.outcome {
                VideoOutcome::Unreadable(reason) => {
                    log::warn!("  {}: unreadable ({reason})", entry.url)
                }
                VideoOutcome::DownloadFailed(reason) => {
                    log::warn!("  {}: download failed ({reason})", entry.url)
                }
                VideoOutcome::ExtractionFailed(reason) => {
                    log::warn!("  {}: extraction failed ({reason})", entry.url)
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_kind() {
        let mut report = BatchReport::default();
        report.push(
            "u1",
            VideoOutcome::Trimmed {
                output: PathBuf::from("a_trimmed.mp4"),
                ranges: vec![],
            },
        );
        report.push("u2", VideoOutcome::NoMatches);
        report.push("u3", VideoOutcome::DownloadFailed("404".into()));
        report.push("u4", VideoOutcome::Unreadable("bad header".into()));
        report.push("u5", VideoOutcome::ExtractionFailed("exit 1".into()));

        assert_eq!(report.trimmed(), 1);
        assert_eq!(report.no_matches(), 1);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.entries[2].url, "u3");
    }

    #[test]
    fn test_from_trim_outcome() {
        assert_eq!(
            VideoOutcome::from(TrimOutcome::Unreadable("x".into())),
            VideoOutcome::Unreadable("x".into())
        );
        assert_eq!(VideoOutcome::from(TrimOutcome::NoMatches), VideoOutcome::NoMatches);
    }
}
