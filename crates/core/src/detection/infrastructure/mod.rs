pub mod arcface_embedder;
pub mod onnx_face_detector;
pub mod onnx_session;
pub mod yolo_face_locator;
