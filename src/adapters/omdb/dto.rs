//! OMDb API Data Transfer Objects
//!
//! Field names match the OMDb JSON response. Only the fields the title
//! resolver consumes are modelled; convert to domain types before use.

use serde::Deserialize;

/// Response of a `?t=` title lookup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TitleResponse {
    /// "True" or "False"
    pub response: String,
    /// Error text when `response` is "False"
    pub error: Option<String>,
    pub title: Option<String>,
    /// Release year; series report ranges such as "1999–2003"
    pub year: Option<String>,
    /// "movie", "series", "episode" or "game"
    #[serde(rename = "Type")]
    pub media_type: Option<String>,
}

impl TitleResponse {
    pub fn is_match(&self) -> bool {
        !self.response.eq_ignore_ascii_case("false")
    }
}
