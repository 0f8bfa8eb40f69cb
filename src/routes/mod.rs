use actix_web::{web, HttpResponse, Responder};

mod url_entry;

use crate::types::{AppState, HealthStatus, ResponsePayload};

// Handler function for the root route "/"
async fn index() -> impl Responder {
    let welcome_message = ResponsePayload {
        status: 200,
        message: String::from("Welcome! POST a URL to /api/urls to shorten it."),
    };

    HttpResponse::Ok().json(welcome_message)
}

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let uptime = data.start_time.elapsed().as_secs();

    let (storage, db_health) = match &data.db {
        Some(db) => ("postgres", Some(db.health_check().await)),
        None => ("memory", None),
    };

    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        storage: storage.to_string(),
        db_health,
        uptime_seconds: uptime,
    };

    HttpResponse::Ok().json(status)
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
    cfg.route("/health", web::get().to(health_check));
    url_entry::configure_api_routes(cfg);
    url_entry::configure_redirect_route(cfg);
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Instant};

    use actix_web::{
        http::{header, StatusCode},
        test, App,
    };
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        codec::Codec,
        config::AuthConfig,
        repositories::InMemoryUrlEntryRepository,
        services::{self, UrlServiceType},
    };

    const SITE: &str = "http://127.0.0.1:5000";

    fn credentials() -> (header::HeaderName, String) {
        (
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("admin:default")),
        )
    }

    fn url_service() -> web::Data<UrlServiceType> {
        services::register(
            Arc::new(InMemoryUrlEntryRepository::new()),
            Arc::new(Codec::default()),
            SITE,
        )
    }

    macro_rules! test_app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState {
                        start_time: Instant::now(),
                        db: None,
                        version: "test".to_string(),
                    }))
                    .app_data(web::Data::new(AuthConfig {
                        username: "admin".to_string(),
                        password: "default".to_string(),
                    }))
                    .app_data($service)
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_index_and_health() {
        let app = test_app!(url_service());

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["storage"], "memory");
    }

    #[actix_web::test]
    async fn test_shorten_then_redirect() {
        let app = test_app!(url_service());

        let req = test::TestRequest::post()
            .uri("/api/urls")
            .insert_header(credentials())
            .set_json(json!({ "url": "www.google.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        // The first identifier of the sequence is 1
        assert_eq!(body["data"]["short_url"], "i5xai6");
        assert_eq!(body["data"]["long_url"], "http://www.google.com/");
        assert_eq!(body["data"]["full_short_url"], "http://127.0.0.1:5000/i5xai6");

        let req = test::TestRequest::get().uri("/i5xai6").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "http://www.google.com/"
        );
    }

    #[actix_web::test]
    async fn test_shortening_twice_returns_same_token() {
        let app = test_app!(url_service());

        let shorten = |url: &str| {
            test::TestRequest::post()
                .uri("/api/urls")
                .insert_header(credentials())
                .set_json(json!({ "url": url }))
                .to_request()
        };

        let first = test::call_service(&app, shorten("http://www.google.com")).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let first: Value = test::read_body_json(first).await;

        let second = test::call_service(&app, shorten("www.google.com")).await;
        assert_eq!(second.status(), StatusCode::OK);
        let second: Value = test::read_body_json(second).await;
        assert_eq!(first["data"]["short_url"], second["data"]["short_url"]);

        let third = test::call_service(&app, shorten("www.bing.com")).await;
        let third: Value = test::read_body_json(third).await;
        assert_eq!(third["data"]["short_url"], "ep3seq");
    }

    #[actix_web::test]
    async fn test_url_with_newline_is_stored_redirectable() {
        let app = test_app!(url_service());

        let req = test::TestRequest::post()
            .uri("/api/urls")
            .insert_header(credentials())
            .set_json(json!({ "url": "http://a.com/x\ny" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["long_url"], "http://a.com/xy");

        let token = body["data"]["short_url"].as_str().unwrap().to_string();
        let req = test::TestRequest::get().uri(&format!("/{}", token)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "http://a.com/xy");
    }

    #[actix_web::test]
    async fn test_scheme_and_host_case_do_not_create_new_entries() {
        let app = test_app!(url_service());

        let shorten = |url: &str| {
            test::TestRequest::post()
                .uri("/api/urls")
                .insert_header(credentials())
                .set_json(json!({ "url": url }))
                .to_request()
        };

        let first = test::call_service(&app, shorten("HTTP://Bing.com")).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let first: Value = test::read_body_json(first).await;

        let second = test::call_service(&app, shorten("http://bing.com/")).await;
        assert_eq!(second.status(), StatusCode::OK);
        let second: Value = test::read_body_json(second).await;
        assert_eq!(first["data"]["short_url"], second["data"]["short_url"]);
    }

    #[actix_web::test]
    async fn test_url_nested_in_query_gets_default_scheme() {
        let app = test_app!(url_service());

        let req = test::TestRequest::post()
            .uri("/api/urls")
            .insert_header(credentials())
            .set_json(json!({ "url": "www.example.com/login?next=https://app.example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["data"]["long_url"],
            "http://www.example.com/login?next=https://app.example.com"
        );
    }

    #[actix_web::test]
    async fn test_api_requires_credentials() {
        let app = test_app!(url_service());

        let req = test::TestRequest::post()
            .uri("/api/urls")
            .set_json(json!({ "url": "www.google.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

        let req = test::TestRequest::get()
            .uri("/api/urls")
            .insert_header((
                header::AUTHORIZATION,
                format!("Basic {}", STANDARD.encode("admin:wrong")),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_invalid_url_is_bad_request() {
        let app = test_app!(url_service());

        let req = test::TestRequest::post()
            .uri("/api/urls")
            .insert_header(credentials())
            .set_json(json!({ "url": "ftp://example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status_code"], 400);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("URL scheme must be http or https"));
    }

    #[actix_web::test]
    async fn test_resolve_and_list_through_api() {
        let app = test_app!(url_service());

        for url in ["http://a.com", "http://b.com"] {
            let req = test::TestRequest::post()
                .uri("/api/urls")
                .insert_header(credentials())
                .set_json(json!({ "url": url }))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri("/api/urls/ep3seq")
            .insert_header(credentials())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["long_url"], "http://b.com/");

        let req = test::TestRequest::get()
            .uri("/api/urls?limit=1")
            .insert_header(credentials())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["long_url"], "http://b.com/");
    }

    #[actix_web::test]
    async fn test_unknown_or_malformed_token_is_not_found() {
        let app = test_app!(url_service());

        for uri in ["/i5xai6", "/!!!", "/zzzzzzzzzz"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }
}
