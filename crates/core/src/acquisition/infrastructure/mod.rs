pub mod youtube_catalog;
pub mod yt_dlp_source;
