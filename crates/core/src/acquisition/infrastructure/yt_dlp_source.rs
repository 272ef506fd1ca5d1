use std::path::{Path, PathBuf};
use std::process::Command;

use crate::acquisition::domain::video_source::VideoSource;

/// Downloads videos by shelling out to `yt-dlp` (no shell; argv only).
///
/// Files land at `<output_dir>/<title>.<ext>`; the final path is taken from
/// yt-dlp's own `after_move:filepath` print so merges and remuxes are followed.
pub struct YtDlpSource {
    program: String,
}

impl YtDlpSource {
    pub fn new() -> Self {
        Self::with_program("yt-dlp")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSource for YtDlpSource {
    fn fetch(&self, url: &str, output_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(output_dir)?;
        log::info!("Downloading {url}");

        let output = Command::new(&self.program)
            .args(build_args(url, output_dir))
            .output()
            .map_err(|e| format!("failed to launch {}: {e}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = parse_printed_path(&stdout)
            .ok_or_else(|| format!("{} did not report a file for {url}", self.program))?;
        if !path.exists() {
            return Err(format!("downloaded file {} is missing", path.display()).into());
        }
        log::info!("Saved {}", path.display());
        Ok(path)
    }
}

fn build_args(url: &str, output_dir: &Path) -> Vec<String> {
    let template = output_dir.join("%(title)s.%(ext)s");
    vec![
        "-f".into(),
        "best".into(),
        "--no-progress".into(),
        "--no-simulate".into(),
        "--print".into(),
        "after_move:filepath".into(),
        "-o".into(),
        template.to_string_lossy().into_owned(),
        "--".into(),
        url.into(),
    ]
}

/// The last non-empty stdout line is the file yt-dlp ended up writing.
fn parse_printed_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(PathBuf::from)
}
