use std::{sync::Arc, time::Instant};

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{debug, info};

use crate::{
    config::{Config, Environment, StorageBackend},
    db::Database,
    errors::AppError,
    middleware::{RequestId, RequestLogger},
    repositories::{InMemoryUrlEntryRepository, PgUrlEntryRepository, UrlEntryRepositoryTrait},
    routes, services,
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

// Picks the storage backend; the database handle is kept for health checks
async fn connect_storage(
    config: &Config,
) -> AppResult<(Arc<dyn UrlEntryRepositoryTrait>, Option<Database>)> {
    match config.storage {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.db)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            let repository: Arc<dyn UrlEntryRepositoryTrait> =
                Arc::new(PgUrlEntryRepository::new(&db));
            Ok((repository, Some(db)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage, entries will not survive a restart");
            let repository: Arc<dyn UrlEntryRepositoryTrait> =
                Arc::new(InMemoryUrlEntryRepository::new());
            Ok((repository, None))
        }
    }
}

pub async fn server() -> AppResult<()> {
    let config = Config::load()?;

    setup_logging(&config)?;

    let start_time = Instant::now();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    // Built once; every worker shares the same table and alphabet
    let codec = Arc::new(config.codec.build_codec(&config.app.environment)?);

    let (repository, db) = connect_storage(&config).await?;
    let url_service = services::register(repository, codec, &config.app.site_url);

    let enable_debug_logging = config.app.environment != Environment::Production;

    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T"
    } else {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{X-Request-ID}i"
    };

    let app_config = config.clone();
    let app_db = db.clone();

    HttpServer::new(move || {
        let cors = if app_config.app.environment == Environment::Production {
            Cors::default()
        } else {
            Cors::permissive()
        };

        App::new()
            .app_data(web::Data::new(AppState {
                start_time,
                db: app_db.clone(),
                version: app_config.app.version.clone(),
            }))
            .app_data(web::Data::new(app_config.auth.clone()))
            .app_data(url_service.clone())
            .wrap(RequestLogger::new(enable_debug_logging))
            .wrap(Logger::new(log_format))
            .wrap(cors)
            // Outermost, so the access log sees the id
            .wrap(RequestId)
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    if let Some(db) = db {
        db.shutdown().await;
    }

    Ok(())
}
