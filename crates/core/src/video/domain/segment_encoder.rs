use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("no time ranges to extract")]
    NoRanges,
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("encoder reported success but {0} was not written")]
    MissingOutput(PathBuf),
}

/// One contiguous piece of the source, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub offset: f64,
    pub duration: f64,
}

/// Everything an encoder needs to stitch segments of one input into one output.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Played back in order, back to back.
    pub segments: Vec<Segment>,
    /// Output height in pixels; width follows the source aspect ratio.
    pub target_height: u32,
    pub video_codec: String,
    pub video_bitrate: String,
    pub audio_codec: String,
    /// Whether the input carries an audio stream to concatenate alongside video.
    pub include_audio: bool,
}

/// Cuts, concatenates and re-encodes segments into a single file.
pub trait SegmentEncoder: Send {
    fn encode(&self, request: &EncodeRequest) -> Result<(), ExtractionError>;
}
