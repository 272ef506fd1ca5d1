pub mod segment_encoder;
pub mod video_reader;
