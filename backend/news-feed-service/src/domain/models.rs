use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Feed item entity - a single published news entry with its derived counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedItem {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub likes_count: i64,
    pub view_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedItem {
    /// Counter value for the given kind
    pub fn counter(&self, kind: CounterKind) -> i64 {
        match kind {
            CounterKind::Likes => self.likes_count,
            CounterKind::Views => self.view_count,
            CounterKind::Comments => self.comments_count,
        }
    }

    pub(crate) fn counter_mut(&mut self, kind: CounterKind) -> &mut i64 {
        match kind {
            CounterKind::Likes => &mut self.likes_count,
            CounterKind::Views => &mut self.view_count,
            CounterKind::Comments => &mut self.comments_count,
        }
    }
}

/// Comment entity - a comment attached to a feed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub feed_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kind of per-user engagement edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementKind {
    Like,
    Star,
}

impl EngagementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementKind::Like => "like",
            EngagementKind::Star => "star",
        }
    }

    /// Counter maintained alongside edges of this kind, if any.
    /// Stars only toggle favorites membership.
    pub fn counter(&self) -> Option<CounterKind> {
        match self {
            EngagementKind::Like => Some(CounterKind::Likes),
            EngagementKind::Star => None,
        }
    }
}

impl fmt::Display for EngagementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived counters stored on a feed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Likes,
    Views,
    Comments,
}

impl CounterKind {
    /// Column backing this counter in `feed_items`
    pub fn column(&self) -> &'static str {
        match self {
            CounterKind::Likes => "likes_count",
            CounterKind::Views => "view_count",
            CounterKind::Comments => "comments_count",
        }
    }
}

/// Outcome of an edge toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeChange {
    Created,
    Removed,
    Unchanged,
}

impl EdgeChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeChange::Created => "created",
            EdgeChange::Removed => "removed",
            EdgeChange::Unchanged => "unchanged",
        }
    }
}

/// One window over an ordered collection.
///
/// `total_count` and `current_values` come from separate queries and may
/// reflect slightly different points in time under concurrent writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
    pub current_values: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            total_count: self.total_count,
            limit: self.limit,
            offset: self.offset,
            current_values: self.current_values.into_iter().map(f).collect(),
        }
    }
}
