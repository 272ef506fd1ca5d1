use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::detection::domain::embedding::{cosine_distance, DistanceFn, ReferenceEmbedding};
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{DEFAULT_MATCH_TOLERANCE, DEFAULT_MIN_FACE_AREA_RATIO};
use crate::shared::frame::Frame;
use crate::video::domain::video_reader::VideoReader;

#[derive(Error, Debug)]
pub enum ReferenceLoadError {
    #[error("cannot read reference image {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("no face found in reference image {path}")]
    NoFace { path: PathBuf },
    #[error("face model failed on reference image {path}: {message}")]
    Detector { path: PathBuf, message: String },
}

#[derive(Clone, Copy, Debug)]
pub struct MatchConfig {
    /// Largest embedding distance still treated as the reference identity.
    pub tolerance: f64,
    /// Smallest face box area, as a fraction of the frame area, that counts.
    pub min_face_area_ratio: f64,
    pub distance: DistanceFn,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_MATCH_TOLERANCE,
            min_face_area_ratio: DEFAULT_MIN_FACE_AREA_RATIO,
            distance: cosine_distance,
        }
    }
}

/// Why a frame did or did not count as an appearance of the reference face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatchOutcome {
    NoFace,
    /// More than one face: the subject has to be alone in the shot.
    Ambiguous { faces: usize },
    Mismatch { distance: f64 },
    /// Right person, but too small in the frame (e.g. on a screen in the background).
    TooSmall { distance: f64, area_ratio: f64 },
    Hit { distance: f64, area_ratio: f64 },
}

impl MatchOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, MatchOutcome::Hit { .. })
    }
}

/// Decides whether a frame shows the reference person, alone and prominent.
///
/// A frame is a hit only if the detector finds exactly one face, that face's
/// embedding lies within `tolerance` of the reference, and its box covers at
/// least `min_face_area_ratio` of the frame.
pub struct FaceMatcher {
    detector: Box<dyn FaceDetector>,
    reference: ReferenceEmbedding,
    config: MatchConfig,
}

impl FaceMatcher {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        reference: ReferenceEmbedding,
        config: MatchConfig,
    ) -> Self {
        Self {
            detector,
            reference,
            config,
        }
    }

    /// Computes the reference embedding from a still image.
    ///
    /// When the image holds several faces, the largest one is used.
    pub fn load_reference(
        reader: &mut dyn VideoReader,
        detector: &mut dyn FaceDetector,
        path: &Path,
    ) -> Result<ReferenceEmbedding, ReferenceLoadError> {
        let read_err = |message: String| ReferenceLoadError::Read {
            path: path.to_path_buf(),
            message,
        };
        let detector_err = |message: String| ReferenceLoadError::Detector {
            path: path.to_path_buf(),
            message,
        };

        reader.open(path).map_err(|e| read_err(e.to_string()))?;
        let frame = reader.frames().next();
        reader.close();
        let frame = frame
            .ok_or_else(|| read_err("image contains no frames".to_string()))?
            .map_err(|e| read_err(e.to_string()))?;

        let faces = detector
            .locate(&frame)
            .map_err(|e| detector_err(e.to_string()))?;
        if faces.len() > 1 {
            log::warn!(
                "Reference image {} contains {} faces; using the largest",
                path.display(),
                faces.len()
            );
        }
        let face = faces
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .ok_or_else(|| ReferenceLoadError::NoFace {
                path: path.to_path_buf(),
            })?;

        let embedding = detector
            .embed(&frame, face)
            .map_err(|e| detector_err(e.to_string()))?;
        log::info!(
            "Loaded reference face from {} ({}-d embedding)",
            path.display(),
            embedding.len()
        );
        Ok(ReferenceEmbedding::new(embedding))
    }

    pub fn reference(&self) -> &ReferenceEmbedding {
        &self.reference
    }

    pub fn evaluate(&mut self, frame: &Frame) -> Result<MatchOutcome, Box<dyn std::error::Error>> {
        let faces = self.detector.locate(frame)?;
        let face = match faces.as_slice() {
            [] => return Ok(MatchOutcome::NoFace),
            [face] => face,
            many => {
                log::debug!(
                    "Skipping frame {} - found {} faces",
                    frame.index(),
                    many.len()
                );
                return Ok(MatchOutcome::Ambiguous { faces: many.len() });
            }
        };

        let embedding = self.detector.embed(frame, face)?;
        let distance = (self.config.distance)(self.reference.embedding(), &embedding);
        if distance > self.config.tolerance {
            return Ok(MatchOutcome::Mismatch { distance });
        }

        let area_ratio = face.area_ratio(frame.width(), frame.height());
        if area_ratio < self.config.min_face_area_ratio {
            return Ok(MatchOutcome::TooSmall {
                distance,
                area_ratio,
            });
        }
        Ok(MatchOutcome::Hit {
            distance,
            area_ratio,
        })
    }

    pub fn matches(&mut self, frame: &Frame) -> Result<bool, Box<dyn std::error::Error>> {
        Ok(self.evaluate(frame)?.is_hit())
    }
}
