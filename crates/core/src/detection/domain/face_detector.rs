use crate::detection::domain::embedding::Embedding;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Domain interface over a face detection + recognition model.
///
/// Implementations typically hold inference sessions that need exclusive
/// access, hence `&mut self`.
pub trait FaceDetector: Send {
    /// Finds every face in the frame.
    fn locate(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>>;

    /// Computes the identity embedding of the face inside `face`.
    fn embed(
        &mut self,
        frame: &Frame,
        face: &BoundingBox,
    ) -> Result<Embedding, Box<dyn std::error::Error>>;
}
