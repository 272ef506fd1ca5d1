use std::process::Command;

use crate::video::domain::segment_encoder::{EncodeRequest, ExtractionError, SegmentEncoder};

/// Cuts and concatenates segments by driving the `ffmpeg` executable.
///
/// Each segment becomes its own seeked input (`-ss`/`-t` before `-i`), and a
/// single `concat` filter joins them before scaling to the target height.
pub struct FfmpegSegmentEncoder {
    program: String,
}

impl FfmpegSegmentEncoder {
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Uses a specific ffmpeg binary instead of the one on `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfmpegSegmentEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentEncoder for FfmpegSegmentEncoder {
    fn encode(&self, request: &EncodeRequest) -> Result<(), ExtractionError> {
        if request.segments.is_empty() {
            return Err(ExtractionError::NoRanges);
        }

        let args = build_args(request);
        log::debug!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ExtractionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractionError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if !request.output.exists() {
            return Err(ExtractionError::MissingOutput(request.output.clone()));
        }
        Ok(())
    }
}

/// Builds the full ffmpeg argument vector for a request. Never goes through a shell.
pub fn build_args(request: &EncodeRequest) -> Vec<String> {
    let input = request.input.to_string_lossy().to_string();
    let n = request.segments.len();

    let mut args: Vec<String> = vec!["-y".into(), "-loglevel".into(), "error".into()];
    for segment in &request.segments {
        args.push("-ss".into());
        args.push(format!("{:.3}", segment.offset));
        args.push("-t".into());
        args.push(format!("{:.3}", segment.duration));
        args.push("-i".into());
        args.push(input.clone());
    }

    let mut pads = String::new();
    for i in 0..n {
        pads.push_str(&format!("[{i}:v]"));
        if request.include_audio {
            pads.push_str(&format!("[{i}:a]"));
        }
    }
    let filter = if request.include_audio {
        format!(
            "{pads}concat=n={n}:v=1:a=1[outv][outa];[outv]scale=-2:{}[vout]",
            request.target_height
        )
    } else {
        format!(
            "{pads}concat=n={n}:v=1:a=0[outv];[outv]scale=-2:{}[vout]",
            request.target_height
        )
    };
    args.push("-filter_complex".into());
    args.push(filter);

    args.push("-map".into());
    args.push("[vout]".into());
    if request.include_audio {
        args.push("-map".into());
        args.push("[outa]".into());
    }

    args.push("-c:v".into());
    args.push(request.video_codec.clone());
    args.push("-b:v".into());
    args.push(request.video_bitrate.clone());
    if request.include_audio {
        args.push("-c:a".into());
        args.push(request.audio_codec.clone());
    }

    args.push(request.output.to_string_lossy().to_string());
    args
}
