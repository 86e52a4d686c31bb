//! Persistence gateway for feed items, comments and engagement edges.
//!
//! Storage is reached only through a [`FeedUnit`]: one unit is one atomic
//! unit of work. Everything done through a unit becomes visible together on
//! [`FeedUnit::commit`]; dropping a unit without committing discards it.
//!
//! Counter changes are storage-side deltas and edge uniqueness is enforced by
//! the store itself, so callers never read-modify-write a counter.

pub mod memory;
pub mod postgres;

use crate::domain::{Comment, CounterKind, EngagementKind, FeedItem};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use memory::InMemoryFeedGateway;
pub use postgres::PgFeedGateway;

/// Entry point to a feed store
#[async_trait]
pub trait FeedGateway: Send + Sync {
    /// Open a new unit of work
    async fn begin(&self) -> Result<Box<dyn FeedUnit>>;
}

/// Storage primitives available inside one unit of work
#[async_trait]
pub trait FeedUnit: Send {
    // ========== Feed items ==========

    async fn insert_feed(
        &mut self,
        title: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<FeedItem>;

    /// Replace title and text; `None` if the item does not exist
    async fn update_feed(
        &mut self,
        id: Uuid,
        title: &str,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<FeedItem>>;

    async fn find_feed(&mut self, id: Uuid) -> Result<Option<FeedItem>>;

    /// Total item count plus one window ordered newest first (ties by id)
    async fn find_feed_page(&mut self, limit: i64, offset: i64)
        -> Result<(i64, Vec<FeedItem>)>;

    async fn delete_feed(&mut self, id: Uuid) -> Result<bool>;

    async fn feed_exists(&mut self, id: Uuid) -> Result<bool>;

    /// `counter = counter + 1`; false if the item is gone
    async fn increment_counter(
        &mut self,
        id: Uuid,
        kind: CounterKind,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// `counter = max(counter - 1, 0)`; false if the item is gone
    async fn decrement_counter(
        &mut self,
        id: Uuid,
        kind: CounterKind,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    // ========== Engagement edges ==========

    async fn edge_exists(
        &mut self,
        user_id: Uuid,
        feed_id: Uuid,
        kind: EngagementKind,
    ) -> Result<bool>;

    /// Atomic conditional insert; true only if this call created the edge
    async fn insert_edge_if_absent(
        &mut self,
        user_id: Uuid,
        feed_id: Uuid,
        kind: EngagementKind,
    ) -> Result<bool>;

    /// True only if this call removed an edge
    async fn delete_edge(
        &mut self,
        user_id: Uuid,
        feed_id: Uuid,
        kind: EngagementKind,
    ) -> Result<bool>;

    /// Remove every edge of every kind pointing at the feed item
    async fn delete_edges_for_feed(&mut self, feed_id: Uuid) -> Result<u64>;

    async fn list_feed_ids_for_user(
        &mut self,
        user_id: Uuid,
        kind: EngagementKind,
    ) -> Result<Vec<Uuid>>;

    /// Items the user has starred: total plus one window, same ordering as feeds
    async fn find_favorites_page(
        &mut self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<FeedItem>)>;

    // ========== Comments ==========

    async fn insert_comment(
        &mut self,
        feed_id: Uuid,
        author_id: Uuid,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Comment>;

    async fn update_comment(
        &mut self,
        id: Uuid,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Comment>>;

    /// Comments on a feed item, newest first
    async fn find_comments_by_feed(&mut self, feed_id: Uuid) -> Result<Vec<Comment>>;

    /// Comments written by a user, newest first
    async fn find_comments_by_author(&mut self, author_id: Uuid) -> Result<Vec<Comment>>;

    async fn delete_comments_for_feed(&mut self, feed_id: Uuid) -> Result<u64>;

    /// Make every change done through this unit visible atomically
    async fn commit(self: Box<Self>) -> Result<()>;
}
