// src/models/url_entry.rs - Pure data structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::validations::validate_long_url;

// DTO for shortening a URL
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateShortUrlDto {
    #[validate(custom(function = "validate_long_url"))]
    pub url: String,
}

/// A stored long URL and the token derived from its identifier
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UrlEntry {
    /// Sequence-assigned identifier, the input of the codec
    pub id: i64,

    /// The original, long URL
    pub long_url: String,

    /// Token encoded from `id`, the public path segment
    pub short_url: String,

    pub created_at: DateTime<Utc>,
}

impl UrlEntry {
    pub fn new(id: i64, long_url: String, short_url: String) -> Self {
        Self {
            id,
            long_url,
            short_url,
            created_at: Utc::now(),
        }
    }
}

// Pagination for listing entries
#[derive(Debug, Default, Deserialize)]
pub struct UrlEntryQueryParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// DTO for response with entry details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlEntryResponseDto {
    pub long_url: String,
    pub short_url: String,
    pub full_short_url: String,
    pub created_at: DateTime<Utc>,
}

impl UrlEntryResponseDto {
    pub fn from_entry(entry: UrlEntry, site_url: &str) -> Self {
        let full_short_url = format!("{}/{}", site_url.trim_end_matches('/'), entry.short_url);
        Self {
            long_url: entry.long_url,
            short_url: entry.short_url,
            full_short_url,
            created_at: entry.created_at,
        }
    }
}
