use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(String),
    #[error("catalog API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected catalog response: {0}")]
    Decode(String),
}

/// One searchable video as the catalog describes it.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    /// ISO-8601 duration as reported, e.g. `PT1H2M10S`.
    pub duration: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub next_page_token: Option<String>,
}

/// Paged search over a video catalog, scoped to one channel.
pub trait VideoCatalog {
    fn search_page(
        &self,
        channel_id: &str,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<CatalogPage, CatalogError>;
}
