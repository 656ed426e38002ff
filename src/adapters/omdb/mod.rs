//! OMDb metadata lookup
//!
//! One HTTP request per query. The title resolver above this adapter decides
//! what to retry; this layer never retries.
//!
//! API reference: https://www.omdbapi.com/

pub mod dto;

use async_trait::async_trait;

use crate::config::MetadataSettings;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{sanitize_year, QUERY_WORD_JOINER};
use crate::ports::*;

const USER_AGENT: &str = concat!("autorip/", env!("CARGO_PKG_VERSION"));

/// OMDb API client
pub struct OmdbClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a client from the metadata settings
    pub fn new(settings: &MetadataSettings) -> Result<Self, DomainError> {
        Self::with_base_url(&settings.omdb_url, &settings.omdb_api_key)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Request URL for one lookup. Query words stay joined by `+`.
    pub fn request_url(&self, title: &str, year: Option<&str>) -> String {
        let title = title
            .split(QUERY_WORD_JOINER)
            .map(|word| urlencoding::encode(word).into_owned())
            .collect::<Vec<_>>()
            .join(&QUERY_WORD_JOINER.to_string());
        format!(
            "{}?t={}&y={}&plot=short&r=json&apikey={}",
            self.base_url,
            title,
            urlencoding::encode(year.unwrap_or("")),
            urlencoding::encode(&self.api_key)
        )
    }
}

/// Convert an OMDb response body into a match, or `None` when OMDb found nothing
pub fn parse_title_response(body: &str) -> Result<Option<TitleMatch>, DomainError> {
    let doc: dto::TitleResponse = serde_json::from_str(body)
        .map_err(|e| DomainError::Lookup(format!("Unreadable OMDb response: {}", e)))?;

    if !doc.is_match() {
        tracing::debug!(error = doc.error.as_deref().unwrap_or(""), "Webservice failed");
        return Ok(None);
    }

    Ok(Some(TitleMatch {
        title: doc.title.filter(|t| !t.trim().is_empty()),
        year: sanitize_year(doc.year.as_deref().unwrap_or("")),
        category: VideoCategory::from_service_type(doc.media_type.as_deref().unwrap_or("")),
    }))
}

#[async_trait]
impl MetadataLookupPort for OmdbClient {
    async fn query(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> Result<Option<TitleMatch>, DomainError> {
        tracing::debug!(title, year = year.unwrap_or(""), "Calling webservice");

        let response = self
            .http_client
            .get(self.request_url(title, year))
            .send()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Network(e.to_string()))?;
        parse_title_response(&body)
    }
}
