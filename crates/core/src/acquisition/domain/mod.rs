pub mod iso_duration;
pub mod url_list;
pub mod video_catalog;
pub mod video_source;
