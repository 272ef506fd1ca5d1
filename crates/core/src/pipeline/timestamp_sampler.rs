use std::path::Path;

use crate::detection::domain::face_matcher::FaceMatcher;
use crate::shared::constants::{
    DEFAULT_DOWNSCALE, DEFAULT_SAMPLE_INTERVAL_SECS, PROGRESS_EVERY_SAMPLES,
};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplerConfig {
    /// Seconds between sampled frames.
    pub interval_secs: f64,
    /// Linear scale applied to each sampled frame before matching.
    pub downscale: f64,
    pub progress_every: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            downscale: DEFAULT_DOWNSCALE,
            progress_every: PROGRESS_EVERY_SAMPLES,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SampleStatus {
    /// The scan ran; frames the detector choked on were skipped.
    Scanned {
        frames_sampled: usize,
        failed_frames: usize,
    },
    /// The video could not be opened or has no usable frame rate.
    Unreadable(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SampleReport {
    /// Seconds at which the reference face was seen, ascending.
    pub timestamps: Vec<f64>,
    pub status: SampleStatus,
    pub metadata: Option<VideoMetadata>,
}

impl SampleReport {
    fn unreadable(reason: String) -> Self {
        Self {
            timestamps: Vec::new(),
            status: SampleStatus::Unreadable(reason),
            metadata: None,
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self.status, SampleStatus::Unreadable(_))
    }
}

/// Walks a video at a fixed interval and records when the reference face is on screen.
pub struct TimestampSampler {
    reader: Box<dyn VideoReader>,
    matcher: FaceMatcher,
    config: SamplerConfig,
}

impl TimestampSampler {
    pub fn new(reader: Box<dyn VideoReader>, matcher: FaceMatcher, config: SamplerConfig) -> Self {
        Self {
            reader,
            matcher,
            config,
        }
    }

    /// Never fails: an unopenable video comes back as [`SampleStatus::Unreadable`]
    /// with no timestamps.
    pub fn sample(&mut self, video_path: &Path) -> SampleReport {
        let metadata = match self.reader.open(video_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Could not open {}: {e}", video_path.display());
                return SampleReport::unreadable(e.to_string());
            }
        };
        let Some(stride) = metadata.sample_stride(self.config.interval_secs) else {
            self.reader.close();
            log::warn!(
                "Could not open {}: invalid frame rate {}",
                video_path.display(),
                metadata.fps
            );
            return SampleReport::unreadable(format!("invalid frame rate {}", metadata.fps));
        };

        log::info!(
            "Scanning {} ({}x{}, {:.2} fps, every {} frames)",
            video_path.display(),
            metadata.width,
            metadata.height,
            metadata.fps,
            stride
        );

        let mut timestamps = Vec::new();
        let mut frames_sampled = 0usize;
        let mut failed_frames = 0usize;
        let progress_every = self.config.progress_every.max(1);
        {
            let frames = self.reader.sampled_frames(stride);
            for item in frames {
                let frame = match item {
                    Ok(frame) => frame,
                    Err(e) => {
                        log::warn!(
                            "Stopping scan of {} after {frames_sampled} samples: {e}",
                            video_path.display()
                        );
                        break;
                    }
                };
                frames_sampled += 1;

                let scaled;
                let candidate: &Frame = if self.config.downscale == 1.0 {
                    &frame
                } else {
                    scaled = frame.scaled(self.config.downscale);
                    &scaled
                };
                match self.matcher.matches(candidate) {
                    Ok(true) => timestamps.push(metadata.timestamp_of(frame.index())),
                    Ok(false) => {}
                    Err(e) => {
                        failed_frames += 1;
                        log::warn!("Face model failed on frame {}: {e}", frame.index());
                    }
                }

                if frames_sampled % progress_every == 0 {
                    log_progress(&metadata, frame.index(), timestamps.len());
                }
            }
        }
        self.reader.close();

        log::info!(
            "Finished {}: {} matches in {} sampled frames",
            video_path.display(),
            timestamps.len(),
            frames_sampled
        );
        SampleReport {
            timestamps,
            status: SampleStatus::Scanned {
                frames_sampled,
                failed_frames,
            },
            metadata: Some(metadata),
        }
    }
}

fn log_progress(metadata: &VideoMetadata, frame_index: usize, matches: usize) {
    if metadata.total_frames > 0 {
        let pct = (frame_index + 1) as f64 / metadata.total_frames as f64 * 100.0;
        log::info!(
            "Progress: {:.1}% ({}/{} frames), {} matches",
            pct.min(100.0),
            frame_index + 1,
            metadata.total_frames,
            matches
        );
    } else {
        log::info!("Progress: frame {}, {} matches", frame_index + 1, matches);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::range_builder::RangeBuilder;
    use crate::pipeline::test_support::{matcher, LabeledReader, BROKEN, CROWD, HIT, MISS};

    fn sampler(reader: LabeledReader) -> TimestampSampler {
        TimestampSampler::new(Box::new(reader), matcher(), SamplerConfig::default())
    }

    #[test]
    fn test_records_hits_at_sampled_seconds() {
        let reader = LabeledReader::per_second(4, &[MISS, HIT, HIT, MISS, HIT]);
        let report = sampler(reader).sample(Path::new("clip.mp4"));

        assert_eq!(report.timestamps, vec![1.0, 2.0, 4.0]);
        assert_eq!(
            report.status,
            SampleStatus::Scanned {
                frames_sampled: 5,
                failed_frames: 0
            }
        );
        assert!(report.metadata.unwrap().has_audio);
    }

    #[test]
    fn test_only_frames_on_the_stride_are_checked() {
        // 10 fps, hit only on frame 5 (between samples 0 and 10)
        let mut labels = vec![MISS; 20];
        labels[5] = HIT;
        let report = sampler(LabeledReader::new(10.0, labels)).sample(Path::new("clip.mp4"));
        assert!(report.timestamps.is_empty());
    }

    #[test]
    fn test_fractional_fps_stride_is_rounded() {
        // 29.97 fps -> stride 30
        let mut labels = vec![MISS; 91];
        labels[30] = HIT;
        labels[60] = HIT;
        labels[90] = HIT;
        let report = sampler(LabeledReader::new(29.97, labels)).sample(Path::new("clip.mp4"));

        assert_eq!(report.timestamps.len(), 3);
        approx::assert_relative_eq!(report.timestamps[0], 30.0 / 29.97);
        approx::assert_relative_eq!(report.timestamps[2], 90.0 / 29.97);
    }

    #[test]
    fn test_crowded_frames_are_not_hits() {
        let reader = LabeledReader::per_second(1, &[CROWD, HIT, CROWD]);
        let report = sampler(reader).sample(Path::new("clip.mp4"));
        assert_eq!(report.timestamps, vec![1.0]);
    }

    #[test]
    fn test_detector_failures_are_skipped_and_counted() {
        let reader = LabeledReader::per_second(1, &[HIT, BROKEN, HIT, BROKEN]);
        let report = sampler(reader).sample(Path::new("clip.mp4"));

        assert_eq!(report.timestamps, vec![0.0, 2.0]);
        assert_eq!(
            report.status,
            SampleStatus::Scanned {
                frames_sampled: 4,
                failed_frames: 2
            }
        );
    }

    #[test]
    fn test_read_error_ends_scan_keeping_earlier_hits() {
        let mut reader = LabeledReader::per_second(1, &[HIT, HIT, HIT, HIT, HIT]);
        reader.fail_at = Some(2);
        let closed = reader.closed.clone();
        let report = sampler(reader).sample(Path::new("clip.mp4"));

        assert_eq!(report.timestamps, vec![0.0, 1.0]);
        assert!(!report.is_unreadable());
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_unopenable_video_is_unreadable_not_error() {
        let mut reader = LabeledReader::per_second(1, &[HIT]);
        reader.fail_open = true;
        let report = sampler(reader).sample(Path::new("broken.mp4"));

        assert!(report.timestamps.is_empty());
        assert!(report.is_unreadable());
        assert!(report.metadata.is_none());
    }

    #[test]
    fn test_zero_fps_is_unreadable() {
        let reader = LabeledReader::new(0.0, vec![HIT; 5]);
        let report = sampler(reader).sample(Path::new("still.mp4"));

        assert!(report.timestamps.is_empty());
        assert!(matches!(report.status, SampleStatus::Unreadable(ref r) if r.contains("frame rate")));
    }

    #[test]
    fn test_without_downscale_matches_too() {
        let reader = LabeledReader::per_second(2, &[HIT, HIT]);
        let config = SamplerConfig {
            downscale: 1.0,
            ..SamplerConfig::default()
        };
        let report =
            TimestampSampler::new(Box::new(reader), matcher(), config).sample(Path::new("a.mp4"));
        assert_eq!(report.timestamps, vec![0.0, 1.0]);
    }

    #[test]
    fn test_timestamps_strictly_increasing() {
        let labels: Vec<u8> = (0..60).map(|s| if s % 3 == 0 { MISS } else { HIT }).collect();
        let report = sampler(LabeledReader::per_second(5, &labels)).sample(Path::new("a.mp4"));
        assert!(report.timestamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_labeled_video_end_to_end_ranges() {
        // Seconds 0-3 on screen, 10-12 and 14-15 (gap of 2 s merges), a lone
        // hit at 30, then 40-41.
        let mut seconds = vec![MISS; 45];
        for s in [0, 1, 2, 3, 10, 11, 12, 14, 15, 30, 40, 41] {
            seconds[s] = HIT;
        }
        seconds[20] = CROWD;
        seconds[21] = BROKEN;
        let report = sampler(LabeledReader::per_second(3, &seconds)).sample(Path::new("a.mp4"));

        let ranges: Vec<(f64, f64)> = RangeBuilder::default()
            .build(&report.timestamps)
            .iter()
            .map(|r| (r.start(), r.end()))
            .collect();
        assert_eq!(ranges, vec![(0.0, 3.0), (10.0, 15.0), (40.0, 41.0)]);
    }
}
