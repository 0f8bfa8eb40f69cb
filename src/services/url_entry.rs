// src/services/url_entry.rs - Business logic
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use validator::Validate;

use crate::codec::Codec;
use crate::errors::{RepositoryError, ServiceError};
use crate::models::{CreateShortUrlDto, UrlEntry, UrlEntryResponseDto};
use crate::repositories::UrlEntryRepositoryTrait;
use crate::validations::normalize_long_url;

type Result<T> = std::result::Result<T, ServiceError>;

/// Outcome of a shorten request
#[derive(Debug, Clone)]
pub struct Shortened {
    pub entry: UrlEntryResponseDto,
    /// `false` when the long URL was already stored
    pub created: bool,
}

#[async_trait]
pub trait UrlServiceTrait {
    async fn shorten(&self, dto: CreateShortUrlDto) -> Result<Shortened>;
    async fn resolve(&self, token: &str) -> Result<UrlEntryResponseDto>;
    async fn list(&self, limit: Option<i64>, offset: Option<i64>)
        -> Result<Vec<UrlEntryResponseDto>>;
}

pub struct UrlService<T: UrlEntryRepositoryTrait + ?Sized> {
    repository: Arc<T>,
    codec: Arc<Codec>,
    site_url: String,
}

impl<T: UrlEntryRepositoryTrait + ?Sized> UrlService<T> {
    pub fn new(repository: Arc<T>, codec: Arc<Codec>, site_url: impl Into<String>) -> Self {
        Self {
            repository,
            codec,
            site_url: site_url.into(),
        }
    }

    fn to_response(&self, entry: UrlEntry) -> UrlEntryResponseDto {
        UrlEntryResponseDto::from_entry(entry, &self.site_url)
    }

    // Encodes a freshly reserved identifier
    fn token_for(&self, id: i64) -> Result<String> {
        let id = u64::try_from(id).map_err(|_| {
            ServiceError::InternalError(format!("Sequence produced negative identifier {}", id))
        })?;
        Ok(self.codec.token_from_identifier(id)?)
    }
}

#[async_trait]
impl<T: UrlEntryRepositoryTrait + ?Sized> UrlServiceTrait for UrlService<T> {
    async fn shorten(&self, dto: CreateShortUrlDto) -> Result<Shortened> {
        let dto = CreateShortUrlDto {
            url: normalize_long_url(&dto.url),
        };
        if let Err(e) = dto.validate() {
            return Err(ServiceError::ValidationError(e.to_string()));
        }
        let long_url = dto.url;

        if let Some(existing) = self.repository.find_by_long_url(&long_url).await? {
            debug!("'{}' is already shortened as '{}'", long_url, existing.short_url);
            return Ok(Shortened {
                entry: self.to_response(existing),
                created: false,
            });
        }

        let id = self.repository.next_id().await?;
        let token = self.token_for(id)?;
        let entry = UrlEntry::new(id, long_url.clone(), token);

        match self.repository.insert(&entry).await {
            Ok(saved) => {
                info!("Shortened '{}' as '{}'", saved.long_url, saved.short_url);
                Ok(Shortened {
                    entry: self.to_response(saved),
                    created: true,
                })
            }
            // Lost a race with a concurrent request for the same URL
            Err(RepositoryError::Conflict(msg)) => {
                warn!("Insert conflict for '{}': {}", long_url, msg);
                let existing = self
                    .repository
                    .find_by_long_url(&long_url)
                    .await?
                    .ok_or(ServiceError::Conflict(msg))?;
                Ok(Shortened {
                    entry: self.to_response(existing),
                    created: false,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve(&self, token: &str) -> Result<UrlEntryResponseDto> {
        let not_found = || ServiceError::NotFound(format!("No URL for '{}'", token));

        let id = match self.codec.identifier_from_token(token) {
            Ok(id) => id,
            Err(e) => {
                debug!("Rejected token '{}': {}", token, e);
                return Err(not_found());
            }
        };
        let id = i64::try_from(id).map_err(|_| not_found())?;

        let entry = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)?;

        Ok(self.to_response(entry))
    }

    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<UrlEntryResponseDto>> {
        if limit.is_some_and(|l| l < 0) || offset.is_some_and(|o| o < 0) {
            return Err(ServiceError::ValidationError(
                "limit and offset must not be negative".to_string(),
            ));
        }

        let entries = self.repository.find_all(limit, offset).await?;
        Ok(entries.into_iter().map(|e| self.to_response(e)).collect())
    }
}
