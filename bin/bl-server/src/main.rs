//! Bloglist Server
//!
//! Serves the blog bookmark API:
//! - `/api/blogs`, `/api/users`, `/api/login`, `/api/stats`
//! - `/health`
//! - `/swagger-ui` (OpenAPI document at `/api-docs/openapi.json`)
//!
//! ## Configuration
//!
//! Read from a TOML file (`BLOGLIST_CONFIG` or a standard path) with `BLOGLIST_*`
//! environment overrides. See `bl_config::AppConfig::example_toml`.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BLOGLIST_HTTP_PORT` | `3003` | HTTP port |
//! | `BLOGLIST_MONGODB_URI` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `BLOGLIST_STORAGE_BACKEND` | `mongodb` | `mongodb` or `memory` |
//! | `BLOGLIST_JWT_SECRET` | - | Token signing secret, required unless dev mode |
//! | `BLOGLIST_DEV_MODE` | `false` | Allow a built-in development secret |
//! | `LOG_FORMAT` | text | `json` for structured output |
//! | `RUST_LOG` | `info` | Log filter |

use std::sync::Arc;
use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::info;

use bl_config::{AppConfig, StorageBackend};
use bl_platform::{
    build_router, cors_layer, initialize_indexes, Argon2Config, BlogRepository,
    MongoBlogRepository, MongoUserRepository, PasswordPolicy, PasswordService, PlatformServices,
    TokenCodec, TokenCodecConfig, UserRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    bl_common::init_logging("bl-server");

    info!("Starting Bloglist Server");

    let config = AppConfig::load()?;

    let token_codec = Arc::new(TokenCodec::new(
        TokenCodecConfig::new(config.auth.jwt.secret.clone())
            .with_issuer(config.auth.jwt.issuer.clone())
            .with_expiry_secs(i64::try_from(config.auth.jwt.token_expiry_secs)?),
    ));

    let password_service = Arc::new(PasswordService::new(
        Argon2Config::default(),
        PasswordPolicy::with_min_length(config.auth.password.min_length),
    )?);

    let (blog_repo, user_repo) = build_repositories(&config).await?;
    let services = PlatformServices::new(blog_repo, user_repo, token_codec, password_service);

    let app = build_router(&services, cors_layer(&config.http.cors_origins));

    let addr = config.http.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);
    info!("Swagger UI at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Bloglist Server shutdown complete");
    Ok(())
}

async fn build_repositories(
    config: &AppConfig,
) -> Result<(Arc<dyn BlogRepository>, Arc<dyn UserRepository>)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage, data is lost on restart");
            Ok((
                Arc::new(bl_platform::InMemoryBlogRepository::new()),
                Arc::new(bl_platform::InMemoryUserRepository::new()),
            ))
        }
        StorageBackend::Mongodb => {
            info!("Connecting to MongoDB: {}/{}", config.mongodb.uri, config.mongodb.database);
            let client = mongodb::Client::with_uri_str(&config.mongodb.uri).await?;
            let db = client.database(&config.mongodb.database);

            initialize_indexes(&db).await?;

            Ok((
                Arc::new(MongoBlogRepository::new(&db)),
                Arc::new(MongoUserRepository::new(&db)),
            ))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
