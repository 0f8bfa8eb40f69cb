mod url_entry;

pub use url_entry::{CreateShortUrlDto, UrlEntry, UrlEntryQueryParams, UrlEntryResponseDto};
