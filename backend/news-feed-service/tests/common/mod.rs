//! Shared fixtures for news-feed-service integration tests
#![allow(dead_code)]

use news_feed_service::domain::FeedDto;
use news_feed_service::repository::{InMemoryFeedGateway, PgFeedGateway};
use news_feed_service::FeedService;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// Service over a fresh in-memory store
pub fn memory_service() -> FeedService {
    FeedService::new(Arc::new(InMemoryFeedGateway::new()))
}

/// Gateway over the database named by TEST_DATABASE_URL, migrated and emptied
pub async fn postgres_gateway() -> PgFeedGateway {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .expect("connect postgres");

    let gateway = PgFeedGateway::new(pool);
    gateway.run_migrations().await.expect("run migrations");

    sqlx::query("TRUNCATE feed_items, engagement_edges, comments")
        .execute(gateway.pool())
        .await
        .expect("truncate feed tables");

    gateway
}

pub async fn create_feed(service: &FeedService, title: &str) -> FeedDto {
    service
        .create_feed(title, &format!("{} body", title))
        .await
        .expect("create feed")
}

/// Reads a feed item without counting a view
pub async fn peek(service: &FeedService, id: uuid::Uuid) -> Option<FeedDto> {
    let page = service
        .list_feeds(Some(i64::from(u16::MAX)), None)
        .await
        .expect("list feeds");
    page.current_values.into_iter().find(|f| f.id == id)
}

/// True when every adjacent pair is ordered by (created_at, id) descending
pub fn is_newest_first(items: &[FeedDto]) -> bool {
    items
        .windows(2)
        .all(|w| (w[0].created_at, w[0].id) >= (w[1].created_at, w[1].id))
}
