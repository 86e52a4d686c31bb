/// Comment ledger - comments scoped to a feed item
use crate::domain::{Comment, CounterKind};
use crate::error::{AppError, Result};
use crate::repository::FeedUnit;
use crate::services::feed_aggregate::{ensure_exists, require_text};
use chrono::Utc;
use uuid::Uuid;

/// Insert a comment and bump the parent's comment counter in the same unit
pub async fn add(
    unit: &mut dyn FeedUnit,
    feed_id: Uuid,
    author_id: Uuid,
    text: &str,
) -> Result<Comment> {
    require_text("text", text)?;
    ensure_exists(unit, feed_id).await?;

    let now = Utc::now();
    let comment = unit.insert_comment(feed_id, author_id, text, now).await?;

    if !unit
        .increment_counter(feed_id, CounterKind::Comments, now)
        .await?
    {
        return Err(AppError::feed_not_found(feed_id));
    }

    Ok(comment)
}

/// Comments on a feed item, newest first
pub async fn list_by_feed(unit: &mut dyn FeedUnit, feed_id: Uuid) -> Result<Vec<Comment>> {
    unit.find_comments_by_feed(feed_id).await
}

/// Comments written by a user, newest first
pub async fn list_by_author(unit: &mut dyn FeedUnit, author_id: Uuid) -> Result<Vec<Comment>> {
    unit.find_comments_by_author(author_id).await
}

/// Replace the text of a comment; the parent's counters are untouched
pub async fn edit(unit: &mut dyn FeedUnit, comment_id: Uuid, text: &str) -> Result<Comment> {
    require_text("text", text)?;

    unit.update_comment(comment_id, text, Utc::now())
        .await?
        .ok_or_else(|| AppError::comment_not_found(comment_id))
}

/// Bulk removal, only for feed item deletion
pub(crate) async fn delete_all_for_feed(unit: &mut dyn FeedUnit, feed_id: Uuid) -> Result<u64> {
    unit.delete_comments_for_feed(feed_id).await
}
