use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cameo_core::acquisition::domain::url_list::{format_url_list, read_url_list};
use cameo_core::acquisition::infrastructure::youtube_catalog::YouTubeCatalog;
use cameo_core::acquisition::infrastructure::yt_dlp_source::YtDlpSource;
use cameo_core::detection::domain::embedding::{cosine_distance, euclidean_distance, DistanceFn};
use cameo_core::detection::domain::face_matcher::{FaceMatcher, MatchConfig};
use cameo_core::detection::infrastructure::onnx_face_detector::OnnxFaceDetector;
use cameo_core::detection::infrastructure::yolo_face_locator::DEFAULT_CONFIDENCE;
use cameo_core::pipeline::discover_videos_use_case::DiscoverVideosUseCase;
use cameo_core::pipeline::process_batch_use_case::{BatchOptions, ProcessBatchUseCase};
use cameo_core::pipeline::range_builder::RangeBuilder;
use cameo_core::pipeline::segment_extractor::{EncodeSettings, SegmentExtractor};
use cameo_core::pipeline::timestamp_sampler::{SamplerConfig, TimestampSampler};
use cameo_core::pipeline::trim_result_store::TrimResultStore;
use cameo_core::pipeline::trim_video_use_case::{TrimOutcome, TrimVideoUseCase};
use cameo_core::shared::constants::{
    DEFAULT_AUDIO_CODEC, DEFAULT_DOWNSCALE, DEFAULT_GAP_THRESHOLD_SECS, DEFAULT_MATCH_TOLERANCE,
    DEFAULT_MIN_FACE_AREA_RATIO, DEFAULT_MIN_RANGE_SECS, DEFAULT_SAMPLE_INTERVAL_SECS,
    DEFAULT_TARGET_HEIGHT, DEFAULT_URL_SEPARATOR, DEFAULT_VIDEO_BITRATE, DEFAULT_VIDEO_CODEC,
    IMAGE_EXTENSIONS, PROGRESS_EVERY_SAMPLES,
};
use cameo_core::shared::model_resolver::{self, ModelSpec, FACE_DETECTOR_MODEL, FACE_EMBEDDING_MODEL};
use cameo_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use cameo_core::video::infrastructure::ffmpeg_segment_encoder::FfmpegSegmentEncoder;
use cameo_core::video::infrastructure::image_file_reader::ImageFileReader;

/// Find a person's appearances in videos and cut everything else.
#[derive(Parser)]
#[command(name = "cameo", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search a channel and write a URL list bounded by total duration.
    Discover(DiscoverArgs),
    /// Download every URL in a list, trim it, and record the kept ranges.
    Process(ProcessArgs),
    /// Trim a single local video.
    Trim(TrimArgs),
}

#[derive(Args)]
struct DiscoverArgs {
    /// Channel to search.
    #[arg(long)]
    channel_id: String,

    /// Search query, e.g. the person's name.
    #[arg(long)]
    query: String,

    /// Stop once the accepted videos would exceed this many minutes.
    #[arg(long, default_value = "1000")]
    target_minutes: u64,

    /// File holding the catalog API key.
    #[arg(long, default_value = "api-key.txt")]
    api_key_file: PathBuf,

    /// Where to write the URL list.
    #[arg(long, default_value = "video_urls.txt")]
    output: PathBuf,

    /// Separator between URL and title on each line.
    #[arg(long, default_value = DEFAULT_URL_SEPARATOR)]
    separator: String,
}

#[derive(Args)]
struct ProcessArgs {
    /// URL list, one per line; text after the separator is ignored.
    #[arg(long, default_value = "video_urls.txt")]
    urls: PathBuf,

    #[arg(long, default_value = DEFAULT_URL_SEPARATOR)]
    separator: String,

    /// Directory for downloads and trimmed outputs.
    #[arg(long, default_value = "downloads")]
    download_dir: PathBuf,

    /// JSON file mapping video filenames to kept ranges.
    #[arg(long, default_value = "timestamps.json")]
    results: PathBuf,

    /// Keep the untrimmed download after a successful trim.
    #[arg(long)]
    keep_originals: bool,

    #[command(flatten)]
    trim: TrimSettings,
}

#[derive(Args)]
struct TrimArgs {
    /// Video to trim; the result is written next to it.
    input: PathBuf,

    #[command(flatten)]
    trim: TrimSettings,
}

#[derive(Clone, Copy, ValueEnum)]
enum Distance {
    Cosine,
    Euclidean,
}

impl Distance {
    fn function(self) -> DistanceFn {
        match self {
            Distance::Cosine => cosine_distance,
            Distance::Euclidean => euclidean_distance,
        }
    }
}

#[derive(Args)]
struct TrimSettings {
    /// Image of the person to look for.
    #[arg(long)]
    reference: PathBuf,

    /// Largest embedding distance still counted as a match.
    #[arg(long, default_value_t = DEFAULT_MATCH_TOLERANCE)]
    tolerance: f64,

    #[arg(long, value_enum, default_value = "cosine")]
    distance: Distance,

    /// Smallest face area, as a fraction of the frame, that counts (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_MIN_FACE_AREA_RATIO)]
    min_face_ratio: f64,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Seconds between sampled frames.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_INTERVAL_SECS)]
    interval: f64,

    /// Scale applied to frames before detection (0.0-1.0].
    #[arg(long, default_value_t = DEFAULT_DOWNSCALE)]
    downscale: f64,

    /// Gap in seconds between detections that starts a new range.
    #[arg(long, default_value_t = DEFAULT_GAP_THRESHOLD_SECS)]
    gap: f64,

    /// Ranges shorter than this many seconds are dropped.
    #[arg(long, default_value_t = DEFAULT_MIN_RANGE_SECS)]
    min_duration: f64,

    /// Output height in pixels; width keeps the aspect ratio.
    #[arg(long, default_value_t = DEFAULT_TARGET_HEIGHT)]
    target_height: u32,

    #[arg(long, default_value = DEFAULT_VIDEO_CODEC)]
    video_codec: String,

    #[arg(long, default_value = DEFAULT_VIDEO_BITRATE)]
    video_bitrate: String,

    #[arg(long, default_value = DEFAULT_AUDIO_CODEC)]
    audio_codec: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Discover(args) => run_discover(args),
        Command::Process(args) => run_process(args),
        Command::Trim(args) => run_trim(args),
    }
}

fn run_discover(args: DiscoverArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.separator.is_empty() {
        return Err("Separator must not be empty".into());
    }
    let api_key = read_api_key(&args.api_key_file)?;

    let use_case = DiscoverVideosUseCase::new(Box::new(YouTubeCatalog::new(api_key)));
    let report = use_case.execute(&args.channel_id, &args.query, args.target_minutes);

    if report.videos.is_empty() {
        if let Some(e) = report.error {
            return Err(e.into());
        }
        log::warn!("No videos found for {:?}", args.query);
        return Ok(());
    }

    let text = format_url_list(
        report
            .videos
            .iter()
            .map(|v| (v.url.as_str(), v.title.as_str())),
        &args.separator,
    );
    std::fs::write(&args.output, text)
        .map_err(|e| format!("Failed to write {}: {e}", args.output.display()))?;
    log::info!(
        "Saved {} URLs ({:.1} minutes) to {}",
        report.videos.len(),
        report.total_secs as f64 / 60.0,
        args.output.display()
    );
    if let Some(e) = report.error {
        log::warn!("Discovery stopped early: {e}");
    }
    Ok(())
}

fn run_process(args: ProcessArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate(&args.trim)?;
    if args.separator.is_empty() {
        return Err("Separator must not be empty".into());
    }
    let urls = read_url_list(&args.urls, &args.separator)
        .map_err(|e| format!("Failed to read URL list {}: {e}", args.urls.display()))?;
    if urls.is_empty() {
        return Err(format!("No URLs found in {}", args.urls.display()).into());
    }

    let store = TrimResultStore::open(&args.results)?;
    let trimmer = build_trimmer(&args.trim)?;
    let options = BatchOptions {
        download_dir: args.download_dir,
        keep_originals: args.keep_originals,
    };
    let mut batch = ProcessBatchUseCase::new(Box::new(YtDlpSource::new()), trimmer, store, options);
    let report = batch.execute(&urls)?;

    log::info!(
        "Results saved to {} ({} videos recorded)",
        batch.store().path().display(),
        batch.store().results().len()
    );
    if report.trimmed() == 0 {
        log::warn!("No video contained the reference face");
    }
    Ok(())
}

fn run_trim(args: TrimArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate(&args.trim)?;
    if !args.input.exists() {
        return Err(format!("Input file not found: {}", args.input.display()).into());
    }

    let mut trimmer = build_trimmer(&args.trim)?;
    match trimmer.execute(&args.input)? {
        TrimOutcome::Trimmed { output, ranges } => {
            let kept: f64 = ranges.iter().map(|r| r.duration()).sum();
            log::info!(
                "Kept {} ranges ({kept:.1}s) in {}",
                ranges.len(),
                output.display()
            );
        }
        TrimOutcome::NoMatches => {
            log::warn!("Reference face not found in {}", args.input.display());
        }
        TrimOutcome::Unreadable(reason) => {
            return Err(format!("Cannot read {}: {reason}", args.input.display()).into());
        }
    }
    Ok(())
}

fn build_trimmer(settings: &TrimSettings) -> Result<TrimVideoUseCase, Box<dyn std::error::Error>> {
    let detector_model = resolve_model(&FACE_DETECTOR_MODEL)?;
    let embedding_model = resolve_model(&FACE_EMBEDDING_MODEL)?;
    let mut detector =
        OnnxFaceDetector::from_models(&detector_model, &embedding_model, settings.confidence)?;

    let reference =
        FaceMatcher::load_reference(&mut ImageFileReader::new(), &mut detector, &settings.reference)?;
    let matcher = FaceMatcher::new(
        Box::new(detector),
        reference,
        MatchConfig {
            tolerance: settings.tolerance,
            min_face_area_ratio: settings.min_face_ratio,
            distance: settings.distance.function(),
        },
    );

    let sampler = TimestampSampler::new(
        Box::new(FfmpegReader::new()),
        matcher,
        SamplerConfig {
            interval_secs: settings.interval,
            downscale: settings.downscale,
            progress_every: PROGRESS_EVERY_SAMPLES,
        },
    );
    let extractor = SegmentExtractor::new(
        Box::new(FfmpegSegmentEncoder::new()),
        EncodeSettings {
            target_height: settings.target_height,
            video_codec: settings.video_codec.clone(),
            video_bitrate: settings.video_bitrate.clone(),
            audio_codec: settings.audio_codec.clone(),
        },
    );

    Ok(TrimVideoUseCase::new(
        sampler,
        RangeBuilder::new(settings.gap, settings.min_duration),
        extractor,
    ))
}

fn resolve_model(spec: &ModelSpec) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let name = spec.name;
    let path = model_resolver::resolve(
        spec,
        None,
        Some(Box::new(move |downloaded: u64, total: u64| {
            download_progress(name, downloaded, total)
        })),
    )?;
    Ok(path)
}

fn read_api_key(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let key = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read API key from {}: {e}", path.display()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("API key file {} is empty", path.display()).into());
    }
    Ok(key.to_string())
}

fn validate(settings: &TrimSettings) -> Result<(), Box<dyn std::error::Error>> {
    if !settings.reference.exists() {
        return Err(format!(
            "Reference image not found: {}",
            settings.reference.display()
        )
        .into());
    }
    if !is_image(&settings.reference) {
        return Err(format!(
            "Reference must be an image ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            settings.reference.display()
        )
        .into());
    }
    check_settings(settings)
}

fn check_settings(settings: &TrimSettings) -> Result<(), Box<dyn std::error::Error>> {
    if !(settings.tolerance > 0.0) {
        return Err(format!("Tolerance must be positive, got {}", settings.tolerance).into());
    }
    if !(0.0..=1.0).contains(&settings.min_face_ratio) {
        return Err(format!(
            "Minimum face ratio must be between 0.0 and 1.0, got {}",
            settings.min_face_ratio
        )
        .into());
    }
    if !(0.0..=1.0).contains(&settings.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            settings.confidence
        )
        .into());
    }
    if !(settings.interval > 0.0) {
        return Err(format!("Interval must be positive, got {}", settings.interval).into());
    }
    if !(settings.downscale > 0.0 && settings.downscale <= 1.0) {
        return Err(format!(
            "Downscale must be in (0.0, 1.0], got {}",
            settings.downscale
        )
        .into());
    }
    if !(settings.gap >= 0.0) || !(settings.min_duration >= 0.0) {
        return Err("Gap and minimum duration must not be negative".into());
    }
    if settings.target_height == 0 || settings.target_height % 2 != 0 {
        return Err(format!(
            "Target height must be a positive even number, got {}",
            settings.target_height
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
}
