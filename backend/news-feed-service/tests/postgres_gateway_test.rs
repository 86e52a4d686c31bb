//! PostgreSQL gateway tests
//!
//! Run with a disposable database:
//! TEST_DATABASE_URL=postgres://... cargo test --test postgres_gateway_test -- --ignored
mod common;

use chrono::Utc;
use common::{is_newest_first, postgres_gateway};
use futures::future::join_all;
use news_feed_service::domain::{CounterKind, EngagementKind};
use news_feed_service::repository::{FeedGateway, FeedUnit};
use news_feed_service::{AppError, FeedService};
use serial_test::serial;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
#[serial]
#[ignore = "Requires PostgreSQL database"]
async fn test_uncommitted_unit_rolls_back() {
    let gateway = postgres_gateway().await;

    let id = {
        let mut unit = gateway.begin().await.unwrap();
        let item = unit.insert_feed("draft", "body", Utc::now()).await.unwrap();
        item.id
    };

    let mut unit = gateway.begin().await.unwrap();
    assert!(!unit.feed_exists(id).await.unwrap());
}

#[tokio::test]
#[serial]
#[ignore = "Requires PostgreSQL database"]
async fn test_edge_insert_is_conditional() {
    let gateway = postgres_gateway().await;
    let user = Uuid::new_v4();

    let mut unit = gateway.begin().await.unwrap();
    let feed = unit.insert_feed("t", "b", Utc::now()).await.unwrap();
    assert!(unit
        .insert_edge_if_absent(user, feed.id, EngagementKind::Like)
        .await
        .unwrap());
    assert!(!unit
        .insert_edge_if_absent(user, feed.id, EngagementKind::Like)
        .await
        .unwrap());
    assert!(unit
        .insert_edge_if_absent(user, feed.id, EngagementKind::Star)
        .await
        .unwrap());
    assert!(unit
        .delete_edge(user, feed.id, EngagementKind::Like)
        .await
        .unwrap());
    assert!(!unit
        .delete_edge(user, feed.id, EngagementKind::Like)
        .await
        .unwrap());
    unit.commit().await.unwrap();
}

#[tokio::test]
#[serial]
#[ignore = "Requires PostgreSQL database"]
async fn test_counters_floor_at_zero() {
    let gateway = postgres_gateway().await;

    let mut unit = gateway.begin().await.unwrap();
    let feed = unit.insert_feed("t", "b", Utc::now()).await.unwrap();
    assert!(unit
        .decrement_counter(feed.id, CounterKind::Likes, Utc::now())
        .await
        .unwrap());
    assert!(!unit
        .increment_counter(Uuid::new_v4(), CounterKind::Views, Utc::now())
        .await
        .unwrap());

    let current = unit.find_feed(feed.id).await.unwrap().unwrap();
    assert_eq!(current.counter(CounterKind::Likes), 0);
}

#[tokio::test]
#[serial]
#[ignore = "Requires PostgreSQL database"]
async fn test_comment_on_missing_feed_maps_to_not_found() {
    let gateway = postgres_gateway().await;

    let mut unit = gateway.begin().await.unwrap();
    let err = unit
        .insert_comment(Uuid::new_v4(), Uuid::new_v4(), "hello", Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[serial]
#[ignore = "Requires PostgreSQL database"]
async fn test_service_flow_against_postgres() {
    let gateway = postgres_gateway().await;
    let pool = gateway.pool().clone();
    let service = FeedService::new(Arc::new(gateway));
    let user = Uuid::new_v4();

    let feed = service.create_feed("pg", "body").await.unwrap();
    service.like_feed(feed.id, user).await.unwrap();
    service.like_feed(feed.id, user).await.unwrap();
    service.star_feed(feed.id, user).await.unwrap();
    service.add_comment(feed.id, user, "hi").await.unwrap();

    let current = service.get_feed(feed.id).await.unwrap();
    assert_eq!(current.likes_count, 1);
    assert_eq!(current.comments_count, 1);
    assert_eq!(current.view_count, 1);

    let favorites = service.list_favorites(user, None, None).await.unwrap();
    assert_eq!(favorites.total_count, 1);

    service.delete_feed(feed.id).await.unwrap();
    assert!(service.list_user_comments(user).await.unwrap().is_empty());
    assert_eq!(
        service
            .list_favorites(user, None, None)
            .await
            .unwrap()
            .total_count,
        0
    );
    assert!(service
        .list_engaged_feed_ids(user, EngagementKind::Star)
        .await
        .unwrap()
        .is_empty());
    assert!(service
        .list_engaged_feed_ids(user, EngagementKind::Like)
        .await
        .unwrap()
        .is_empty());

    let edges_left: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM engagement_edges WHERE feed_id = $1")
            .bind(feed.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(edges_left, 0);
}

#[tokio::test]
#[serial]
#[ignore = "Requires PostgreSQL database"]
async fn test_concurrent_likes_against_postgres() {
    let gateway = postgres_gateway().await;
    let service = FeedService::new(Arc::new(gateway));
    let feed = service.create_feed("race", "body").await.unwrap();
    let users: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();

    // Duplicate requests may lose the insert race; they must never double count
    let requests = users
        .iter()
        .chain(users.iter())
        .map(|user| service.like_feed(feed.id, *user));
    for result in join_all(requests).await {
        result.unwrap();
    }

    let page = service.list_feeds(None, None).await.unwrap();
    let current = page
        .current_values
        .iter()
        .find(|f| f.id == feed.id)
        .unwrap();
    assert_eq!(current.likes_count, 8);
}

#[tokio::test]
#[serial]
#[ignore = "Requires PostgreSQL database"]
async fn test_pagination_against_postgres() {
    let gateway = postgres_gateway().await;
    let service = FeedService::new(Arc::new(gateway));
    for i in 0..25 {
        service
            .create_feed(&format!("feed {}", i), "body")
            .await
            .unwrap();
    }

    let page = service.list_feeds(Some(10), Some(20)).await.unwrap();

    assert_eq!(page.total_count, 25);
    assert_eq!(page.current_values.len(), 5);
    assert!(is_newest_first(&page.current_values));
}
