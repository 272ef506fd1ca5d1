pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Maximum embedding distance for a face to count as the reference identity.
pub const DEFAULT_MATCH_TOLERANCE: f64 = 0.65;

/// Minimum share of the frame area a matched face must cover (2%).
pub const DEFAULT_MIN_FACE_AREA_RATIO: f64 = 0.02;

/// Seconds between sampled frames.
pub const DEFAULT_SAMPLE_INTERVAL_SECS: f64 = 1.0;

/// Linear scale applied to sampled frames before detection (~56% of the area).
pub const DEFAULT_DOWNSCALE: f64 = 0.75;

/// Log scan progress every N sampled frames.
pub const PROGRESS_EVERY_SAMPLES: usize = 5;

/// Detections further apart than this (seconds) start a new range.
pub const DEFAULT_GAP_THRESHOLD_SECS: f64 = 4.0;

/// Ranges shorter than this (seconds) are dropped.
pub const DEFAULT_MIN_RANGE_SECS: f64 = 1.0;

pub const DEFAULT_TARGET_HEIGHT: u32 = 720;
pub const DEFAULT_VIDEO_BITRATE: &str = "2M";
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

#[cfg(target_os = "macos")]
pub const DEFAULT_VIDEO_CODEC: &str = "h264_videotoolbox";
#[cfg(target_os = "windows")]
pub const DEFAULT_VIDEO_CODEC: &str = "h264_mf";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

pub const TRIMMED_SUFFIX: &str = "_trimmed";
pub const TRIMMED_EXTENSION: &str = "mp4";

/// Text after the first occurrence of this separator on a URL list line is ignored.
pub const DEFAULT_URL_SEPARATOR: &str = " - ";

pub const CATALOG_PAGE_SIZE: u32 = 50;
pub const WATCH_URL_PREFIX: &str = "https://youtube.com/watch?v=";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
