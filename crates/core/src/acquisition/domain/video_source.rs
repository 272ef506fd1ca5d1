use std::path::{Path, PathBuf};

/// Fetches a remote video into a local directory.
pub trait VideoSource: Send {
    /// Downloads `url` into `output_dir` and returns the path of the written file.
    fn fetch(&self, url: &str, output_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>>;
}
