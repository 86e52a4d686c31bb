/// Feed aggregate - feed items and the counters derived for them
///
/// Counters are never written from caller input: views move here on read,
/// likes move through the engagement ledger and comments through the comment
/// ledger.
use crate::domain::{CounterKind, FeedItem, Page, PageRequest};
use crate::error::{AppError, Result};
use crate::repository::FeedUnit;
use crate::services::comments;
use chrono::Utc;
use uuid::Uuid;

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

/// Fail with NotFound unless the feed item exists
pub async fn ensure_exists(unit: &mut dyn FeedUnit, id: Uuid) -> Result<()> {
    if !unit.feed_exists(id).await? {
        return Err(AppError::feed_not_found(id));
    }
    Ok(())
}

/// Publish a new feed item with zeroed counters
pub async fn create(unit: &mut dyn FeedUnit, title: &str, body: &str) -> Result<FeedItem> {
    require_text("title", title)?;
    require_text("text", body)?;

    unit.insert_feed(title, body, Utc::now()).await
}

/// Read a feed item, counting the read as a view
pub async fn get(unit: &mut dyn FeedUnit, id: Uuid) -> Result<FeedItem> {
    if !unit
        .increment_counter(id, CounterKind::Views, Utc::now())
        .await?
    {
        return Err(AppError::feed_not_found(id));
    }

    unit.find_feed(id)
        .await?
        .ok_or_else(|| AppError::feed_not_found(id))
}

/// Replace title and body; counters and created_at stay as they are
pub async fn update(
    unit: &mut dyn FeedUnit,
    id: Uuid,
    title: &str,
    body: &str,
) -> Result<FeedItem> {
    require_text("title", title)?;
    require_text("text", body)?;
    ensure_exists(unit, id).await?;

    unit.update_feed(id, title, body, Utc::now())
        .await?
        .ok_or_else(|| AppError::feed_not_found(id))
}

/// Remove a feed item with all of its comments and engagement edges.
///
/// The caller commits the unit; nothing is visible until then.
pub async fn delete(unit: &mut dyn FeedUnit, id: Uuid) -> Result<()> {
    ensure_exists(unit, id).await?;

    let comments_removed = comments::delete_all_for_feed(unit, id).await?;
    let edges_removed = unit.delete_edges_for_feed(id).await?;

    if !unit.delete_feed(id).await? {
        return Err(AppError::feed_not_found(id));
    }

    tracing::debug!(
        feed_id = %id,
        comments_removed,
        edges_removed,
        "Feed item removed with dependents"
    );

    Ok(())
}

/// One window over all feed items, newest first
pub async fn list_page(unit: &mut dyn FeedUnit, page: PageRequest) -> Result<Page<FeedItem>> {
    let (total_count, current_values) = unit.find_feed_page(page.limit, page.offset).await?;

    Ok(Page {
        total_count,
        limit: page.limit,
        offset: page.offset,
        current_values,
    })
}
