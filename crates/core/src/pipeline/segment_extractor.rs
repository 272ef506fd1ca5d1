use std::path::Path;

use crate::shared::constants::{
    DEFAULT_AUDIO_CODEC, DEFAULT_TARGET_HEIGHT, DEFAULT_VIDEO_BITRATE, DEFAULT_VIDEO_CODEC,
};
use crate::shared::time_range::TimeRange;
use crate::video::domain::segment_encoder::{EncodeRequest, ExtractionError, Segment, SegmentEncoder};

#[derive(Clone, Debug, PartialEq)]
pub struct EncodeSettings {
    pub target_height: u32,
    pub video_codec: String,
    pub video_bitrate: String,
    pub audio_codec: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            target_height: DEFAULT_TARGET_HEIGHT,
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            video_bitrate: DEFAULT_VIDEO_BITRATE.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
        }
    }
}

/// Stitches the given time ranges of one video into a single re-encoded file.
pub struct SegmentExtractor {
    encoder: Box<dyn SegmentEncoder>,
    settings: EncodeSettings,
}

impl SegmentExtractor {
    pub fn new(encoder: Box<dyn SegmentEncoder>, settings: EncodeSettings) -> Self {
        Self { encoder, settings }
    }

    /// Ranges are played back in the given order. `source_has_audio` decides
    /// whether audio streams are concatenated alongside the video.
    pub fn extract(
        &self,
        input: &Path,
        output: &Path,
        ranges: &[TimeRange],
        source_has_audio: bool,
    ) -> Result<(), ExtractionError> {
        if ranges.is_empty() {
            return Err(ExtractionError::NoRanges);
        }

        let request = EncodeRequest {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            segments: ranges
                .iter()
                .map(|r| Segment {
                    offset: r.start(),
                    duration: r.duration(),
                })
                .collect(),
            target_height: self.settings.target_height,
            video_codec: self.settings.video_codec.clone(),
            video_bitrate: self.settings.video_bitrate.clone(),
            audio_codec: self.settings.audio_codec.clone(),
            include_audio: source_has_audio,
        };

        log::info!(
            "Extracting {} segments from {} into {}",
            request.segments.len(),
            input.display(),
            output.display()
        );
        self.encoder.encode(&request)
    }
}
