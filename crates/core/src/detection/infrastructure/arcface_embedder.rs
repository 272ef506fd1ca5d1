use std::path::Path;

use crate::detection::domain::embedding::Embedding;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

use super::onnx_session;

const INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

/// Extra context around the detector box, as a fraction of its longer side.
const CROP_MARGIN: f64 = 0.2;

/// Turns a face crop into a unit-length ArcFace identity vector.
pub struct ArcFaceEmbedder {
    session: ort::session::Session,
}

impl ArcFaceEmbedder {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: onnx_session::load_session(model_path)?,
        })
    }

    pub fn embed(
        &mut self,
        frame: &Frame,
        face: &BoundingBox,
    ) -> Result<Embedding, Box<dyn std::error::Error>> {
        let crop = face_crop(frame, face).ok_or("face box lies outside the frame")?;
        let input_value = ort::value::Tensor::from_array(preprocess(&crop))?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("ArcFace model produced no outputs".into());
        }
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let values = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?
            .to_vec();
        Ok(Embedding::normalized(values))
    }
}

/// Square crop centred on the face, padded by [`CROP_MARGIN`] and clamped to the frame.
fn face_crop(frame: &Frame, face: &BoundingBox) -> Option<Frame> {
    let side = face.width().max(face.height()) * (1.0 + CROP_MARGIN);
    let cx = (face.x1 + face.x2) / 2.0;
    let cy = (face.y1 + face.y2) / 2.0;
    let half = side / 2.0;
    frame.crop(
        (cx - half).floor() as i64,
        (cy - half).floor() as i64,
        (cx + half).ceil() as i64,
        (cy + half).ceil() as i64,
    )
}

/// Resize to 112x112, scale to `[-1, 1]`, NCHW layout.
fn preprocess(crop: &Frame) -> ndarray::Array4<f32> {
    let src_w = crop.width() as usize;
    let src_h = crop.height() as usize;
    let src = crop.as_ndarray();

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));
    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / INPUT_SIZE as f64) as usize).min(src_h - 1);
        for x in 0..INPUT_SIZE {
            let src_x =
                (((x as f64 + 0.5) * src_w as f64 / INPUT_SIZE as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (src[[src_y, src_x, c]] as f32 - NORM_MEAN) / NORM_STD;
            }
        }
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(width: u32, height: u32, value: u8) -> Frame {
        Frame::new(
            vec![value; (width * height * 3) as usize],
            width,
            height,
            3,
            7,
        )
    }

    #[test]
    fn test_face_crop_is_square_with_margin() {
        // 40x20 box centred at (50, 50): side = 40 * 1.2 = 48
        let face = BoundingBox::new(30.0, 40.0, 70.0, 60.0, 0.9);
        let crop = face_crop(&frame(200, 200, 0), &face).unwrap();
        assert_eq!((crop.width(), crop.height()), (48, 48));
        assert_eq!(crop.index(), 7);
    }

    #[test]
    fn test_face_crop_clamped_at_edge() {
        let face = BoundingBox::new(0.0, 0.0, 20.0, 20.0, 0.9);
        let crop = face_crop(&frame(100, 100, 0), &face).unwrap();
        // side 24 centred at (10, 10) -> [-2, 22) clamped to [0, 22)
        assert_eq!((crop.width(), crop.height()), (22, 22));
    }

    #[test]
    fn test_face_crop_outside_frame_is_none() {
        let face = BoundingBox::new(500.0, 500.0, 520.0, 520.0, 0.9);
        assert!(face_crop(&frame(100, 100, 0), &face).is_none());
    }

    #[test]
    fn test_preprocess_shape_and_range() {
        let tensor = preprocess(&frame(30, 50, 255));
        assert_eq!(tensor.shape(), &[1, 3, INPUT_SIZE, INPUT_SIZE]);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_relative_eq!(tensor[[0, 2, 111, 111]], 1.0);

        let dark = preprocess(&frame(10, 10, 0));
        assert_relative_eq!(dark[[0, 1, 56, 56]], -1.0);
    }
}
