use actix_web::{http::header::LOCATION, web, HttpResponse, Responder};
use log::{debug, info};
use serde_json::json;

use crate::{
    middleware::ApiUser,
    models::{CreateShortUrlDto, UrlEntryQueryParams},
    services::{UrlServiceTrait, UrlServiceType},
    types::Result,
};

/// Shorten URL route handler
pub async fn create_handler(
    user: ApiUser,
    dto: web::Json<CreateShortUrlDto>,
    service: web::Data<UrlServiceType>,
) -> Result<impl Responder> {
    debug!("User '{}' shortening '{}'", user.username, dto.url);
    let shortened = service.shorten(dto.into_inner()).await?;

    let (mut response, message) = if shortened.created {
        (HttpResponse::Created(), "Successfully created short URL")
    } else {
        (HttpResponse::Ok(), "That URL is already shortened")
    };
    Ok(response.json(json!({
        "data": shortened.entry,
        "message": message,
    })))
}

/// List entries route handler
pub async fn get_all_handler(
    _user: ApiUser,
    query: web::Query<UrlEntryQueryParams>,
    service: web::Data<UrlServiceType>,
) -> Result<impl Responder> {
    let entries = service.list(query.limit, query.offset).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": entries,
        "message": "Successfully retrieved URLs",
    })))
}

/// Resolve token route handler
pub async fn get_by_token_handler(
    _user: ApiUser,
    path: web::Path<String>,
    service: web::Data<UrlServiceType>,
) -> Result<impl Responder> {
    let entry = service.resolve(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": entry,
        "message": "Successfully retrieved URL",
    })))
}

/// Redirect route handler
pub async fn redirect_handler(
    path: web::Path<String>,
    service: web::Data<UrlServiceType>,
) -> Result<impl Responder> {
    let token = path.into_inner();
    debug!("Redirect requested for token: {}", token);

    let entry = service.resolve(&token).await?;

    info!("Redirecting '{}' to '{}'", token, entry.long_url);
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, entry.long_url))
        .finish())
}
