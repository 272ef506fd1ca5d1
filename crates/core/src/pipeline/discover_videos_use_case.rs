use crate::acquisition::domain::iso_duration::parse_iso_duration;
use crate::acquisition::domain::video_catalog::{CatalogError, VideoCatalog};
use crate::shared::constants::WATCH_URL_PREFIX;

#[derive(Clone, Debug, PartialEq)]
pub struct DiscoveredVideo {
    pub id: String,
    pub url: String,
    pub title: String,
    pub duration_secs: u64,
}

#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub videos: Vec<DiscoveredVideo>,
    pub total_secs: u64,
    /// Set when the catalog failed part-way; `videos` still holds what was
    /// accepted before that.
    pub error: Option<CatalogError>,
}

/// Collects catalog search results until their combined length would
/// exceed a time budget.
pub struct DiscoverVideosUseCase {
    catalog: Box<dyn VideoCatalog>,
}

impl DiscoverVideosUseCase {
    pub fn new(catalog: Box<dyn VideoCatalog>) -> Self {
        Self { catalog }
    }

    /// Accepts videos in catalog order while the running total stays within
    /// `target_minutes`. The first video that would overshoot ends discovery.
    pub fn execute(&self, channel_id: &str, query: &str, target_minutes: u64) -> DiscoveryReport {
        let budget = target_minutes.saturating_mul(60);
        let mut report = DiscoveryReport::default();
        let mut page_token: Option<String> = None;

        log::info!("Searching for videos up to {target_minutes} minutes");
        while report.total_secs < budget {
            let page = match self
                .catalog
                .search_page(channel_id, query, page_token.as_deref())
            {
                Ok(page) => page,
                Err(e) => {
                    log::error!("Catalog search failed: {e}");
                    report.error = Some(e);
                    break;
                }
            };
            if page.items.is_empty() {
                log::info!("No videos found in response");
                break;
            }
            log::debug!("Found {} videos in this page", page.items.len());

            for item in page.items {
                let Some(duration_secs) = parse_iso_duration(&item.duration) else {
                    log::warn!(
                        "Skipping {} ({}): unreadable duration {:?}",
                        item.id,
                        item.title,
                        item.duration
                    );
                    continue;
                };
                if report.total_secs + duration_secs > budget {
                    log::info!("Reached duration limit at {} seconds", report.total_secs);
                    return report;
                }
                report.total_secs += duration_secs;
                log::info!(
                    "Added {} ({duration_secs} s), total {} s",
                    item.title,
                    report.total_secs
                );
                report.videos.push(DiscoveredVideo {
                    url: format!("{WATCH_URL_PREFIX}{}", item.id),
                    id: item.id,
                    title: item.title,
                    duration_secs,
                });
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => {
                    log::info!("No more pages to fetch");
                    break;
                }
            }
        }

        log::info!(
            "Discovered {} videos totalling {} s",
            report.videos.len(),
            report.total_secs
        );
        report
    }
}
