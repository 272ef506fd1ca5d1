pub mod embedding;
pub mod face_detector;
pub mod face_matcher;
