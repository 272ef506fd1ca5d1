use std::path::Path;

use crate::detection::domain::embedding::Embedding;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

use super::arcface_embedder::ArcFaceEmbedder;
use super::yolo_face_locator::YoloFaceLocator;

/// [`FaceDetector`] backed by two ONNX models: YOLO for boxes, ArcFace for identity.
pub struct OnnxFaceDetector {
    locator: YoloFaceLocator,
    embedder: ArcFaceEmbedder,
}

impl OnnxFaceDetector {
    pub fn new(locator: YoloFaceLocator, embedder: ArcFaceEmbedder) -> Self {
        Self { locator, embedder }
    }

    pub fn from_models(
        detector_model: &Path,
        embedding_model: &Path,
        confidence: f64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::new(
            YoloFaceLocator::new(detector_model, confidence)?,
            ArcFaceEmbedder::new(embedding_model)?,
        ))
    }
}

impl FaceDetector for OnnxFaceDetector {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        self.locator.locate(frame)
    }

    fn embed(
        &mut self,
        frame: &Frame,
        face: &BoundingBox,
    ) -> Result<Embedding, Box<dyn std::error::Error>> {
        self.embedder.embed(frame, face)
    }
}
