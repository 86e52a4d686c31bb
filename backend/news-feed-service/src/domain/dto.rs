/// Response records handed to callers of the feed service
use super::models::{Comment, FeedItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDto {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub likes_count: i64,
    pub view_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeedItem> for FeedDto {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            text: item.text,
            likes_count: item.likes_count,
            view_count: item.view_count,
            comments_count: item.comments_count,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: Uuid,
    pub feed_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            feed_id: comment.feed_id,
            user_id: comment.author_id,
            text: comment.text,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
