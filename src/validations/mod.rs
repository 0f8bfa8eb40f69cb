mod url_entry;

pub use url_entry::{normalize_long_url, validate_long_url, MAX_URL_LENGTH};
