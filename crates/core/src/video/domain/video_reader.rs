use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

pub type FrameResult = Result<Frame, Box<dyn std::error::Error>>;

/// Reads frames from a video or still-image source.
///
/// Implementations handle codec and container details; callers only see
/// `Frame` and `VideoMetadata`.
pub trait VideoReader: Send {
    /// Opens a video or image file and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(&mut self) -> Box<dyn Iterator<Item = FrameResult> + '_>;

    /// Returns only frames whose index is a multiple of `stride`, with their
    /// original indices.
    ///
    /// The default decodes everything and filters; readers that can skip the
    /// pixel conversion of unwanted frames should override it.
    fn sampled_frames(&mut self, stride: usize) -> Box<dyn Iterator<Item = FrameResult> + '_> {
        let stride = stride.max(1);
        Box::new(self.frames().filter(move |item| match item {
            Ok(frame) => frame.index() % stride == 0,
            Err(_) => true,
        }))
    }

    /// Releases any resources held by the reader.
    fn close(&mut self);
}
