use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Container-reported frame count; 0 when the container doesn't say.
    pub total_frames: usize,
    pub has_audio: bool,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Number of frames between samples taken every `interval_secs` seconds.
    ///
    /// `None` when the frame rate is unknown, since timestamps can't be derived.
    pub fn sample_stride(&self, interval_secs: f64) -> Option<usize> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return None;
        }
        Some(((self.fps * interval_secs).round() as usize).max(1))
    }

    /// Seconds offset of `frame_index` from the start of the stream.
    pub fn timestamp_of(&self, frame_index: usize) -> f64 {
        frame_index as f64 / self.fps
    }
}
