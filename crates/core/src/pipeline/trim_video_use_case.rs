use std::path::{Path, PathBuf};

use crate::shared::constants::{TRIMMED_EXTENSION, TRIMMED_SUFFIX};
use crate::shared::time_range::TimeRange;
use crate::video::domain::segment_encoder::ExtractionError;

use super::range_builder::RangeBuilder;
use super::segment_extractor::SegmentExtractor;
use super::timestamp_sampler::{SampleStatus, TimestampSampler};

#[derive(Clone, Debug, PartialEq)]
pub enum TrimOutcome {
    Trimmed {
        output: PathBuf,
        ranges: Vec<TimeRange>,
    },
    /// Scanned fine, but no range survived the gap and duration rules.
    NoMatches,
    Unreadable(String),
}

/// Scans one local video and writes `<stem>_trimmed.mp4` next to it,
/// containing only the stretches where the reference face appears.
pub struct TrimVideoUseCase {
    sampler: TimestampSampler,
    range_builder: RangeBuilder,
    extractor: SegmentExtractor,
}

impl TrimVideoUseCase {
    pub fn new(
        sampler: TimestampSampler,
        range_builder: RangeBuilder,
        extractor: SegmentExtractor,
    ) -> Self {
        Self {
            sampler,
            range_builder,
            extractor,
        }
    }

    pub fn execute(&mut self, video_path: &Path) -> Result<TrimOutcome, ExtractionError> {
        let report = self.sampler.sample(video_path);
        if let SampleStatus::Unreadable(reason) = &report.status {
            return Ok(TrimOutcome::Unreadable(reason.clone()));
        }
        log::info!(
            "Found {} timestamps with the reference face",
            report.timestamps.len()
        );

        let ranges = self.range_builder.build(&report.timestamps);
        if ranges.is_empty() {
            log::info!("No matching segments in {}", video_path.display());
            return Ok(TrimOutcome::NoMatches);
        }

        log::info!("Converted to {} ranges", ranges.len());
        for (i, r) in ranges.iter().enumerate() {
            log::info!(
                "Range {}: {:.2}s to {:.2}s ({:.2}s)",
                i + 1,
                r.start(),
                r.end(),
                r.duration()
            );
        }

        let output = trimmed_output_path(video_path);
        let has_audio = report.metadata.is_some_and(|m| m.has_audio);
        self.extractor
            .extract(video_path, &output, &ranges, has_audio)?;
        log::info!("Created trimmed version: {}", output.display());

        Ok(TrimOutcome::Trimmed { output, ranges })
    }
}

/// `dir/Some Talk.webm` becomes `dir/Some Talk_trimmed.mp4`.
pub fn trimmed_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    input.with_file_name(format!("{stem}{TRIMMED_SUFFIX}.{TRIMMED_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::segment_extractor::EncodeSettings;
    use crate::pipeline::test_support::{matcher, touch, LabeledReader, RecordingEncoder, HIT, MISS};
    use crate::pipeline::timestamp_sampler::SamplerConfig;
    use rstest::rstest;

    fn use_case(reader: LabeledReader, encoder: RecordingEncoder) -> TrimVideoUseCase {
        TrimVideoUseCase::new(
            TimestampSampler::new(Box::new(reader), matcher(), SamplerConfig::default()),
            RangeBuilder::default(),
            SegmentExtractor::new(Box::new(encoder), EncodeSettings::default()),
        )
    }

    #[rstest]
    #[case("/v/Some Talk.webm", "/v/Some Talk_trimmed.mp4")]
    #[case("/v/clip.mp4", "/v/clip_trimmed.mp4")]
    #[case("/v/archive.2020.mkv", "/v/archive.2020_trimmed.mp4")]
    #[case("noext", "noext_trimmed.mp4")]
    fn test_trimmed_output_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(trimmed_output_path(Path::new(input)), PathBuf::from(expected));
    }

    #[test]
    fn test_trims_matching_ranges() {
        let dir = tempfile::tempdir().unwrap();
        let video = touch(dir.path(), "talk.mp4");
        let encoder = RecordingEncoder::default();
        let requests = encoder.requests.clone();
        let reader = LabeledReader::per_second(2, &[MISS, HIT, HIT, HIT, MISS]);

        let outcome = use_case(reader, encoder).execute(&video).unwrap();

        let expected_output = dir.path().join("talk_trimmed.mp4");
        match outcome {
            TrimOutcome::Trimmed { output, ranges } => {
                assert_eq!(output, expected_output);
                assert_eq!(ranges, vec![TimeRange::new(1.0, 3.0).unwrap()]);
            }
            other => panic!("expected Trimmed, got {other:?}"),
        }
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].input, video);
        assert!(requests[0].include_audio);
        assert!(expected_output.exists());
    }

    #[test]
    fn test_silent_video_extracts_without_audio() {
        let dir = tempfile::tempdir().unwrap();
        let video = touch(dir.path(), "silent.mp4");
        let encoder = RecordingEncoder::default();
        let requests = encoder.requests.clone();
        let mut reader = LabeledReader::per_second(1, &[HIT, HIT, HIT]);
        reader.has_audio = false;

        use_case(reader, encoder).execute(&video).unwrap();
        assert!(!requests.lock().unwrap()[0].include_audio);
    }

    #[test]
    fn test_no_ranges_skips_encoder() {
        let encoder = RecordingEncoder::default();
        let requests = encoder.requests.clone();
        // a single hit never forms a range
        let reader = LabeledReader::per_second(1, &[MISS, HIT, MISS]);

        let outcome = use_case(reader, encoder)
            .execute(Path::new("talk.mp4"))
            .unwrap();
        assert_eq!(outcome, TrimOutcome::NoMatches);
        assert!(requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_video_reported() {
        let mut reader = LabeledReader::per_second(1, &[HIT, HIT]);
        reader.fail_open = true;
        let outcome = use_case(reader, RecordingEncoder::default())
            .execute(Path::new("talk.mp4"))
            .unwrap();
        assert!(matches!(outcome, TrimOutcome::Unreadable(_)));
    }

    #[test]
    fn test_extraction_failure_is_error() {
        let encoder = RecordingEncoder {
            fail: true,
            ..RecordingEncoder::default()
        };
        let reader = LabeledReader::per_second(1, &[HIT, HIT, HIT]);
        let result = use_case(reader, encoder).execute(Path::new("talk.mp4"));
        assert!(matches!(result, Err(ExtractionError::Failed { .. })));
    }
}
