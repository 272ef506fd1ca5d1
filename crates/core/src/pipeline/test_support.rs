//! Stub collaborators shared by the pipeline tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::detection::domain::embedding::{Embedding, ReferenceEmbedding};
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_matcher::{FaceMatcher, MatchConfig};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::segment_encoder::{EncodeRequest, ExtractionError, SegmentEncoder};
use crate::video::domain::video_reader::{FrameResult, VideoReader};

/// Frame fill values understood by [`PixelDetector`].
pub const HIT: u8 = 255;
pub const MISS: u8 = 0;
pub const CROWD: u8 = 128;
pub const BROKEN: u8 = 77;

const SIDE: u32 = 20;

/// Serves uniformly filled frames, one per label, at a fixed frame rate.
pub struct LabeledReader {
    pub fps: f64,
    pub labels: Vec<u8>,
    pub has_audio: bool,
    pub fail_open: bool,
    /// Yields a read error instead of this frame index.
    pub fail_at: Option<usize>,
    pub closed: Arc<Mutex<bool>>,
}

impl LabeledReader {
    pub fn new(fps: f64, labels: Vec<u8>) -> Self {
        Self {
            fps,
            labels,
            has_audio: true,
            fail_open: false,
            fail_at: None,
            closed: Arc::new(Mutex::new(false)),
        }
    }

    /// One label per second of video at `fps`, repeated for every frame in that second.
    pub fn per_second(fps: usize, seconds: &[u8]) -> Self {
        let labels = seconds
            .iter()
            .flat_map(|label| std::iter::repeat(*label).take(fps))
            .collect();
        Self::new(fps as f64, labels)
    }
}

impl VideoReader for LabeledReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        if self.fail_open {
            return Err("moov atom not found".into());
        }
        *self.closed.lock().unwrap() = false;
        Ok(VideoMetadata {
            width: SIDE,
            height: SIDE,
            fps: self.fps,
            total_frames: self.labels.len(),
            has_audio: self.has_audio,
            source_path: Some(path.to_path_buf()),
        })
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = FrameResult> + '_> {
        let fail_at = self.fail_at;
        Box::new(
            self.labels
                .iter()
                .enumerate()
                .map(move |(i, label)| -> FrameResult {
                    if Some(i) == fail_at {
                        return Err(format!("corrupt packet at frame {i}").into());
                    }
                    Ok(Frame::new(
                        vec![*label; (SIDE * SIDE * 3) as usize],
                        SIDE,
                        SIDE,
                        3,
                        i,
                    ))
                }),
        )
    }

    fn close(&mut self) {
        *self.closed.lock().unwrap() = true;
    }
}

/// Reads the frame's fill value: `HIT` is one frame-filling face of the
/// reference person, `CROWD` is two faces, `BROKEN` makes the model fail.
pub struct PixelDetector;

impl FaceDetector for PixelDetector {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        let (w, h) = (frame.width() as f64, frame.height() as f64);
        match frame.data().first().copied() {
            Some(HIT) => Ok(vec![BoundingBox::new(0.0, 0.0, w, h, 0.9)]),
            Some(CROWD) => Ok(vec![
                BoundingBox::new(0.0, 0.0, w / 2.0, h, 0.9),
                BoundingBox::new(w / 2.0, 0.0, w, h, 0.9),
            ]),
            Some(BROKEN) => Err("inference failed".into()),
            _ => Ok(vec![]),
        }
    }

    fn embed(
        &mut self,
        _frame: &Frame,
        _face: &BoundingBox,
    ) -> Result<Embedding, Box<dyn std::error::Error>> {
        Ok(Embedding::new(vec![1.0, 0.0]))
    }
}

pub fn matcher() -> FaceMatcher {
    FaceMatcher::new(
        Box::new(PixelDetector),
        ReferenceEmbedding::new(Embedding::new(vec![1.0, 0.0])),
        MatchConfig::default(),
    )
}

/// Records every request; writes the output file unless told to fail.
#[derive(Clone, Default)]
pub struct RecordingEncoder {
    pub requests: Arc<Mutex<Vec<EncodeRequest>>>,
    pub fail: bool,
}

impl SegmentEncoder for RecordingEncoder {
    fn encode(&self, request: &EncodeRequest) -> Result<(), ExtractionError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(ExtractionError::Failed {
                program: "ffmpeg".into(),
                status: "exit status: 1".into(),
                stderr: "Invalid data found when processing input".into(),
            });
        }
        std::fs::write(&request.output, b"trimmed").map_err(|source| ExtractionError::Spawn {
            program: "ffmpeg".into(),
            source,
        })
    }
}

pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"video").unwrap();
    path
}
