use url::Url;
use validator::ValidationError;

/// Longest URL accepted for shortening
pub const MAX_URL_LENGTH: usize = 2048;

/// Brings a submitted URL to the form it is stored and deduplicated under.
///
/// Trims it, assumes `http://` when it has no scheme, then takes the
/// serialization of the parsed URL (lowercase scheme and host, tabs and
/// newlines dropped). Unparseable input is returned unchanged apart from the
/// scheme so that validation can report it.
pub fn normalize_long_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let with_scheme = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    match Url::parse(&with_scheme) {
        Ok(url) => url.to_string(),
        Err(_) => with_scheme,
    }
}

// `scheme://` prefix, scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Validates that a URL string is properly formatted and uses http/https
pub fn validate_long_url(url_str: &str) -> Result<(), ValidationError> {
    if url_str.len() > MAX_URL_LENGTH {
        let mut err = ValidationError::new("url_length");
        err.message = Some(format!("URL must be at most {} characters", MAX_URL_LENGTH).into());
        return Err(err);
    }

    // The parser silently drops these, but they cannot be sent back in a header
    if url_str.chars().any(char::is_control) {
        let mut err = ValidationError::new("url_control_characters");
        err.message = Some("URL must not contain control characters".into());
        return Err(err);
    }

    match Url::parse(url_str) {
        Ok(url) => {
            // Only accept HTTP and HTTPS URLs
            if url.scheme() != "http" && url.scheme() != "https" {
                let mut err = ValidationError::new("url_scheme");
                err.message = Some("URL scheme must be http or https".into());
                return Err(err);
            }

            if url.host_str().map_or(true, str::is_empty) {
                let mut err = ValidationError::new("url_host");
                err.message = Some("URL must have a host".into());
                return Err(err);
            }

            Ok(())
        }
        Err(_) => {
            let mut err = ValidationError::new("url_format");
            err.message = Some("Invalid URL format".into());
            Err(err)
        }
    }
}
