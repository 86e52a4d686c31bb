/// News Feed Service - HTTP Server
///
/// Serves feed items, likes, stars, favorites and comments.
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use news_feed_service::config::StorageBackend;
use news_feed_service::handlers;
use news_feed_service::metrics::serve_metrics;
use news_feed_service::repository::{FeedGateway, InMemoryFeedGateway, PgFeedGateway};
use news_feed_service::{Config, FeedService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_gateway(config: &Config) -> anyhow::Result<Arc<dyn FeedGateway>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(InMemoryFeedGateway::new()))
        }
        StorageBackend::Postgres => {
            let db = config
                .database
                .as_ref()
                .context("database configuration missing for postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(db.max_connections)
                .min_connections(db.min_connections)
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect(&db.url)
                .await
                .context("Failed to connect to database")?;

            sqlx::query("SELECT 1")
                .execute(&pool)
                .await
                .context("Database health check failed")?;

            let gateway = PgFeedGateway::new(pool);
            gateway
                .run_migrations()
                .await
                .context("Failed to run database migrations")?;
            tracing::info!(
                max_connections = db.max_connections,
                "Database pool ready, migrations applied"
            );

            Ok(Arc::new(gateway))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log.json);

    tracing::info!(
        env = %config.app.env,
        storage = ?config.storage,
        "Starting news-feed-service"
    );

    let gateway = build_gateway(&config).await?;
    let service =
        FeedService::new(gateway).with_default_page_limit(config.feed.default_page_limit);
    let service_data = web::Data::new(service);

    let bind_address = format!("{}:{}", config.app.host, config.app.http_port);
    tracing::info!("HTTP server listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .wrap(TracingLogger::default())
            .route(
                "/health",
                web::get()
                    .to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
            )
            .route(
                "/ready",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            )
            .route("/metrics", web::get().to(serve_metrics))
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    tracing::info!("news-feed-service shutting down");
    Ok(())
}
