use std::sync::Arc;

use actix_web::web;

mod url_entry;

pub use url_entry::{Shortened, UrlService, UrlServiceTrait};

use crate::{codec::Codec, repositories::UrlEntryRepositoryTrait};

/// Service type shared with the handlers, independent of the storage backend
pub type UrlServiceType = UrlService<dyn UrlEntryRepositoryTrait>;

/// Service Register
pub fn register(
    repository: Arc<dyn UrlEntryRepositoryTrait>,
    codec: Arc<Codec>,
    site_url: &str,
) -> web::Data<UrlServiceType> {
    web::Data::new(UrlService::new(repository, codec, site_url))
}
