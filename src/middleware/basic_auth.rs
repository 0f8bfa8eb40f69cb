use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use base64::{engine::general_purpose::STANDARD, Engine};
use futures_util::future::{ready, Ready};
use log::{debug, error};

use crate::{config::AuthConfig, errors::AppError};

/// Extracting this guards a handler behind HTTP Basic authentication against
/// the configured [`AuthConfig`].
#[derive(Debug, Clone)]
pub struct ApiUser {
    pub username: String,
}

impl FromRequest for ApiUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<ApiUser, AppError> {
    let auth = req.app_data::<web::Data<AuthConfig>>().ok_or_else(|| {
        error!("AuthConfig is not registered as app data");
        AppError::Internal("Authentication is not configured".to_string())
    })?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing credentials".to_string()))?;

    let (username, password) = header
        .to_str()
        .ok()
        .and_then(parse_basic_credentials)
        .ok_or_else(|| AppError::Unauthorized("Malformed credentials".to_string()))?;

    if username != auth.username || password != auth.password {
        debug!("Rejected credentials for user '{}'", username);
        return Err(AppError::Unauthorized("Invalid username or password".to_string()));
    }

    Ok(ApiUser { username })
}

/// Splits `Basic base64(user:password)` into its two parts
fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
