//! Engagement ledger - per-user LIKE and STAR edges on feed items.
//!
//! Edges are the ground truth; `likes_count` is maintained alongside them in
//! the same unit of work. The counter delta follows the outcome of the atomic
//! insert/delete primitive, never the advisory existence check, so a retried
//! or concurrent duplicate request cannot count twice.

use crate::domain::{EdgeChange, EngagementKind, FeedItem, Page, PageRequest};
use crate::error::Result;
use crate::repository::FeedUnit;
use crate::services::feed_aggregate::ensure_exists;
use chrono::Utc;
use uuid::Uuid;

/// Create the edge if missing and bump the matching counter
pub async fn engage(
    unit: &mut dyn FeedUnit,
    feed_id: Uuid,
    user_id: Uuid,
    kind: EngagementKind,
) -> Result<EdgeChange> {
    ensure_exists(unit, feed_id).await?;

    // Fast path only; the conditional insert below decides
    if unit.edge_exists(user_id, feed_id, kind).await? {
        return Ok(EdgeChange::Unchanged);
    }

    if !unit.insert_edge_if_absent(user_id, feed_id, kind).await? {
        return Ok(EdgeChange::Unchanged);
    }

    if let Some(counter) = kind.counter() {
        unit.increment_counter(feed_id, counter, Utc::now()).await?;
    }

    Ok(EdgeChange::Created)
}

/// Remove the edge if present and lower the matching counter (floor 0)
pub async fn disengage(
    unit: &mut dyn FeedUnit,
    feed_id: Uuid,
    user_id: Uuid,
    kind: EngagementKind,
) -> Result<EdgeChange> {
    ensure_exists(unit, feed_id).await?;

    if !unit.delete_edge(user_id, feed_id, kind).await? {
        return Ok(EdgeChange::Unchanged);
    }

    if let Some(counter) = kind.counter() {
        unit.decrement_counter(feed_id, counter, Utc::now()).await?;
    }

    Ok(EdgeChange::Removed)
}

pub async fn like(unit: &mut dyn FeedUnit, feed_id: Uuid, user_id: Uuid) -> Result<EdgeChange> {
    engage(unit, feed_id, user_id, EngagementKind::Like).await
}

pub async fn unlike(unit: &mut dyn FeedUnit, feed_id: Uuid, user_id: Uuid) -> Result<EdgeChange> {
    disengage(unit, feed_id, user_id, EngagementKind::Like).await
}

pub async fn star(unit: &mut dyn FeedUnit, feed_id: Uuid, user_id: Uuid) -> Result<EdgeChange> {
    engage(unit, feed_id, user_id, EngagementKind::Star).await
}

pub async fn unstar(unit: &mut dyn FeedUnit, feed_id: Uuid, user_id: Uuid) -> Result<EdgeChange> {
    disengage(unit, feed_id, user_id, EngagementKind::Star).await
}

/// Starred feed items of a user, ordered like the global feed
pub async fn list_favorites(
    unit: &mut dyn FeedUnit,
    user_id: Uuid,
    page: PageRequest,
) -> Result<Page<FeedItem>> {
    let (total_count, current_values) = unit
        .find_favorites_page(user_id, page.limit, page.offset)
        .await?;

    Ok(Page {
        total_count,
        limit: page.limit,
        offset: page.offset,
        current_values,
    })
}

/// Feed ids the user currently holds an edge of `kind` on, most recent first
pub async fn engaged_feed_ids(
    unit: &mut dyn FeedUnit,
    user_id: Uuid,
    kind: EngagementKind,
) -> Result<Vec<Uuid>> {
    unit.list_feed_ids_for_user(user_id, kind).await
}
