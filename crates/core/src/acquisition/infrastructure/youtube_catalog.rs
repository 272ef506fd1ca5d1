use serde::Deserialize;

use crate::acquisition::domain::video_catalog::{
    CatalogError, CatalogItem, CatalogPage, VideoCatalog,
};
use crate::shared::constants::CATALOG_PAGE_SIZE;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API v3 catalog: `search.list` for ids, then `videos.list`
/// for titles and durations.
pub struct YouTubeCatalog {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeCatalog {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String, CatalogError> {
        let response = self
            .client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .map_err(|e| CatalogError::Http(e.without_url().to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CatalogError::Http(e.without_url().to_string()))?;
        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        Ok(body)
    }
}

impl VideoCatalog for YouTubeCatalog {
    fn search_page(
        &self,
        channel_id: &str,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<CatalogPage, CatalogError> {
        let page_size = CATALOG_PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "id,snippet"),
            ("channelId", channel_id),
            ("q", query),
            ("type", "video"),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let (ids, next_page_token) = decode_search(&self.get("search", &params)?)?;
        log::debug!("Search page returned {} videos", ids.len());
        if ids.is_empty() {
            return Ok(CatalogPage {
                items: Vec::new(),
                next_page_token,
            });
        }

        let joined = ids.join(",");
        let body = self.get(
            "videos",
            &[("part", "contentDetails,snippet"), ("id", joined.as_str())],
        )?;
        Ok(CatalogPage {
            items: decode_videos(&body)?,
            next_page_token,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: String,
    snippet: Snippet,
    content_details: ContentDetails,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
}

#[derive(Deserialize)]
struct ContentDetails {
    duration: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn decode_search(body: &str) -> Result<(Vec<String>, Option<String>), CatalogError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    let ids = response
        .items
        .into_iter()
        .filter_map(|item| item.id.video_id)
        .collect();
    Ok((ids, response.next_page_token))
}

fn decode_videos(body: &str) -> Result<Vec<CatalogItem>, CatalogError> {
    let response: VideosResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(response
        .items
        .into_iter()
        .map(|v| CatalogItem {
            id: v.id,
            title: v.snippet.title,
            duration: v.content_details.duration,
        })
        .collect())
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().chars().take(200).collect())
}
