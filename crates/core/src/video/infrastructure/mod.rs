pub mod ffmpeg_reader;
pub mod ffmpeg_segment_encoder;
pub mod image_file_reader;
