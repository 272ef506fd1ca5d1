pub mod discover_videos_use_case;
pub mod process_batch_use_case;
pub mod range_builder;
pub mod segment_extractor;
pub mod timestamp_sampler;
pub mod trim_result_store;
pub mod trim_video_use_case;
pub mod video_outcome;

#[cfg(test)]
pub(crate) mod test_support;
