use super::{FeedGateway, FeedUnit};
use crate::domain::{Comment, CounterKind, EngagementKind, FeedItem};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

type EdgeKey = (Uuid, Uuid, EngagementKind);

#[derive(Debug, Clone, Default)]
struct MemoryState {
    feeds: HashMap<Uuid, FeedItem>,
    /// (user_id, feed_id, kind) -> created_at; the map key is the uniqueness constraint
    edges: BTreeMap<EdgeKey, DateTime<Utc>>,
    comments: HashMap<Uuid, Comment>,
}

impl MemoryState {
    fn remove_dependents(&mut self, feed_id: Uuid) -> (u64, u64) {
        let edges_before = self.edges.len();
        self.edges.retain(|(_, f, _), _| *f != feed_id);
        let comments_before = self.comments.len();
        self.comments.retain(|_, c| c.feed_id != feed_id);
        (
            (edges_before - self.edges.len()) as u64,
            (comments_before - self.comments.len()) as u64,
        )
    }
}

/// In-process feed store with the same guarantees as the PostgreSQL one.
///
/// Units of work are serialized by a single async mutex. The first write in a
/// unit stages a copy of the state, which replaces the shared state only on
/// commit; read-only units never copy.
///
/// Dependent inserts against a missing feed item are rejected the way a
/// foreign key would reject them, and deleting an item cascades.
#[derive(Clone, Default)]
pub struct InMemoryFeedGateway {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryFeedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    async fn begin_unit(&self) -> InMemoryFeedUnit {
        InMemoryFeedUnit {
            guard: self.state.clone().lock_owned().await,
            staged: None,
        }
    }
}

#[async_trait]
impl FeedGateway for InMemoryFeedGateway {
    async fn begin(&self) -> Result<Box<dyn FeedUnit>> {
        Ok(Box::new(self.begin_unit().await))
    }
}

/// Reads go straight to the locked state until the first write stages a copy.
pub struct InMemoryFeedUnit {
    guard: OwnedMutexGuard<MemoryState>,
    staged: Option<MemoryState>,
}

impl InMemoryFeedUnit {
    fn state(&self) -> &MemoryState {
        self.staged.as_ref().unwrap_or(&*self.guard)
    }

    fn staged_mut(&mut self) -> &mut MemoryState {
        let guard = &self.guard;
        self.staged.get_or_insert_with(|| (**guard).clone())
    }
}

fn newest_first<T, K>(items: &mut [T], key: K)
where
    K: Fn(&T) -> (DateTime<Utc>, Uuid),
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn window<T>(items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl FeedUnit for InMemoryFeedUnit {
    async fn insert_feed(
        &mut self,
        title: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<FeedItem> {
        let item = FeedItem {
            id: Uuid::new_v4(),
            title: title.to_string(),
            text: text.to_string(),
            likes_count: 0,
            view_count: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.staged_mut().feeds.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_feed(
        &mut self,
        id: Uuid,
        title: &str,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<FeedItem>> {
        if !self.state().feeds.contains_key(&id) {
            return Ok(None);
        }
        Ok(self.staged_mut().feeds.get_mut(&id).map(|item| {
            item.title = title.to_string();
            item.text = text.to_string();
            item.updated_at = updated_at;
            item.clone()
        }))
    }

    async fn find_feed(&mut self, id: Uuid) -> Result<Option<FeedItem>> {
        Ok(self.state().feeds.get(&id).cloned())
    }

    async fn find_feed_page(
        &mut self,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<FeedItem>)> {
        let mut items: Vec<FeedItem> = self.state().feeds.values().cloned().collect();
        let total = items.len() as i64;
        newest_first(&mut items, |f| (f.created_at, f.id));
        Ok((total, window(items, limit, offset)))
    }

    async fn delete_feed(&mut self, id: Uuid) -> Result<bool> {
        if !self.state().feeds.contains_key(&id) {
            return Ok(false);
        }
        let state = self.staged_mut();
        state.feeds.remove(&id);
        state.remove_dependents(id);
        Ok(true)
    }

    async fn feed_exists(&mut self, id: Uuid) -> Result<bool> {
        Ok(self.state().feeds.contains_key(&id))
    }

    async fn increment_counter(
        &mut self,
        id: Uuid,
        kind: CounterKind,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if !self.state().feeds.contains_key(&id) {
            return Ok(false);
        }
        if let Some(item) = self.staged_mut().feeds.get_mut(&id) {
            *item.counter_mut(kind) += 1;
            item.updated_at = now;
        }
        Ok(true)
    }

    async fn decrement_counter(
        &mut self,
        id: Uuid,
        kind: CounterKind,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if !self.state().feeds.contains_key(&id) {
            return Ok(false);
        }
        if let Some(item) = self.staged_mut().feeds.get_mut(&id) {
            let counter = item.counter_mut(kind);
            *counter = (*counter - 1).max(0);
            item.updated_at = now;
        }
        Ok(true)
    }

    async fn edge_exists(
        &mut self,
        user_id: Uuid,
        feed_id: Uuid,
        kind: EngagementKind,
    ) -> Result<bool> {
        Ok(self.state().edges.contains_key(&(user_id, feed_id, kind)))
    }

    async fn insert_edge_if_absent(
        &mut self,
        user_id: Uuid,
        feed_id: Uuid,
        kind: EngagementKind,
    ) -> Result<bool> {
        if !self.state().feeds.contains_key(&feed_id) {
            return Err(AppError::feed_not_found(feed_id));
        }

        let key = (user_id, feed_id, kind);
        if self.state().edges.contains_key(&key) {
            return Ok(false);
        }
        self.staged_mut().edges.insert(key, Utc::now());
        Ok(true)
    }

    async fn delete_edge(
        &mut self,
        user_id: Uuid,
        feed_id: Uuid,
        kind: EngagementKind,
    ) -> Result<bool> {
        let key = (user_id, feed_id, kind);
        if !self.state().edges.contains_key(&key) {
            return Ok(false);
        }
        Ok(self.staged_mut().edges.remove(&key).is_some())
    }

    async fn delete_edges_for_feed(&mut self, feed_id: Uuid) -> Result<u64> {
        if !self.state().edges.keys().any(|(_, f, _)| *f == feed_id) {
            return Ok(0);
        }
        let edges = &mut self.staged_mut().edges;
        let before = edges.len();
        edges.retain(|(_, f, _), _| *f != feed_id);
        Ok((before - edges.len()) as u64)
    }

    async fn list_feed_ids_for_user(
        &mut self,
        user_id: Uuid,
        kind: EngagementKind,
    ) -> Result<Vec<Uuid>> {
        let mut edges: Vec<(Uuid, DateTime<Utc>)> = self
            .state()
            .edges
            .iter()
            .filter(|((u, _, k), _)| *u == user_id && *k == kind)
            .map(|((_, f, _), created_at)| (*f, *created_at))
            .collect();
        newest_first(&mut edges, |(feed_id, created_at)| (*created_at, *feed_id));
        Ok(edges.into_iter().map(|(feed_id, _)| feed_id).collect())
    }

    async fn find_favorites_page(
        &mut self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<FeedItem>)> {
        let state = self.state();
        let mut items: Vec<FeedItem> = state
            .edges
            .keys()
            .filter(|(u, _, k)| *u == user_id && *k == EngagementKind::Star)
            .filter_map(|(_, feed_id, _)| state.feeds.get(feed_id).cloned())
            .collect();
        let total = items.len() as i64;
        newest_first(&mut items, |f| (f.created_at, f.id));
        Ok((total, window(items, limit, offset)))
    }

    async fn insert_comment(
        &mut self,
        feed_id: Uuid,
        author_id: Uuid,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Comment> {
        if !self.state().feeds.contains_key(&feed_id) {
            return Err(AppError::feed_not_found(feed_id));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            feed_id,
            author_id,
            text: text.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.staged_mut().comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &mut self,
        id: Uuid,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Comment>> {
        if !self.state().comments.contains_key(&id) {
            return Ok(None);
        }
        Ok(self.staged_mut().comments.get_mut(&id).map(|comment| {
            comment.text = text.to_string();
            comment.updated_at = updated_at;
            comment.clone()
        }))
    }

    async fn find_comments_by_feed(&mut self, feed_id: Uuid) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .state()
            .comments
            .values()
            .filter(|c| c.feed_id == feed_id)
            .cloned()
            .collect();
        newest_first(&mut comments, |c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn find_comments_by_author(&mut self, author_id: Uuid) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .state()
            .comments
            .values()
            .filter(|c| c.author_id == author_id)
            .cloned()
            .collect();
        newest_first(&mut comments, |c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn delete_comments_for_feed(&mut self, feed_id: Uuid) -> Result<u64> {
        if !self.state().comments.values().any(|c| c.feed_id == feed_id) {
            return Ok(0);
        }
        let comments = &mut self.staged_mut().comments;
        let before = comments.len();
        comments.retain(|_, c| c.feed_id != feed_id);
        Ok((before - comments.len()) as u64)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let InMemoryFeedUnit { mut guard, staged } = *self;
        if let Some(staged) = staged {
            *guard = staged;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_uncommitted_unit_is_discarded() {
        let gateway = InMemoryFeedGateway::new();

        let mut unit = gateway.begin().await.unwrap();
        let item = unit.insert_feed("title", "body", Utc::now()).await.unwrap();
        drop(unit);

        let mut unit = gateway.begin().await.unwrap();
        assert!(!unit.feed_exists(item.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_edge_insert_is_conditional() {
        let gateway = InMemoryFeedGateway::new();
        let user_id = Uuid::new_v4();

        let mut unit = gateway.begin().await.unwrap();
        let item = unit.insert_feed("title", "body", Utc::now()).await.unwrap();
        assert!(unit
            .insert_edge_if_absent(user_id, item.id, EngagementKind::Like)
            .await
            .unwrap());
        assert!(!unit
            .insert_edge_if_absent(user_id, item.id, EngagementKind::Like)
            .await
            .unwrap());
        // A star is a separate edge
        assert!(unit
            .insert_edge_if_absent(user_id, item.id, EngagementKind::Star)
            .await
            .unwrap());
        unit.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_dependent_insert_on_missing_feed_rejected() {
        let gateway = InMemoryFeedGateway::new();
        let mut unit = gateway.begin().await.unwrap();

        let missing = Uuid::new_v4();
        let err = unit
            .insert_edge_if_absent(Uuid::new_v4(), missing, EngagementKind::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = unit
            .insert_comment(missing, Uuid::new_v4(), "hi", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_counter_ops_never_resurrect_or_go_negative() {
        let gateway = InMemoryFeedGateway::new();
        let mut unit = gateway.begin().await.unwrap();

        assert!(!unit
            .increment_counter(Uuid::new_v4(), CounterKind::Likes, Utc::now())
            .await
            .unwrap());

        let item = unit.insert_feed("title", "body", Utc::now()).await.unwrap();
        assert!(unit
            .decrement_counter(item.id, CounterKind::Likes, Utc::now())
            .await
            .unwrap());
        let item = unit.find_feed(item.id).await.unwrap().unwrap();
        assert_eq!(item.likes_count, 0);
    }

    #[tokio::test]
    async fn test_read_only_unit_stages_nothing() {
        let gateway = InMemoryFeedGateway::new();
        let mut unit = gateway.begin_unit().await;
        let item = unit.insert_feed("title", "body", Utc::now()).await.unwrap();
        Box::new(unit).commit().await.unwrap();

        let mut unit = gateway.begin_unit().await;
        assert_eq!(unit.find_feed_page(10, 0).await.unwrap().0, 1);
        assert!(unit.find_comments_by_feed(item.id).await.unwrap().is_empty());
        // No-op writes do not stage either
        assert!(!unit
            .delete_edge(Uuid::new_v4(), item.id, EngagementKind::Like)
            .await
            .unwrap());
        assert!(!unit
            .increment_counter(Uuid::new_v4(), CounterKind::Views, Utc::now())
            .await
            .unwrap());
        assert!(unit.staged.is_none());

        assert!(unit
            .increment_counter(item.id, CounterKind::Views, Utc::now())
            .await
            .unwrap());
        assert!(unit.staged.is_some());
        // The unit sees its own write before commit
        assert_eq!(unit.find_feed(item.id).await.unwrap().unwrap().view_count, 1);
        drop(unit);

        let mut unit = gateway.begin_unit().await;
        assert_eq!(unit.find_feed(item.id).await.unwrap().unwrap().view_count, 0);
    }

    #[tokio::test]
    async fn test_delete_feed_purges_every_edge_kind() {
        let gateway = InMemoryFeedGateway::new();
        let user_id = Uuid::new_v4();

        let mut unit = gateway.begin().await.unwrap();
        let item = unit.insert_feed("title", "body", Utc::now()).await.unwrap();
        for kind in [EngagementKind::Like, EngagementKind::Star] {
            unit.insert_edge_if_absent(user_id, item.id, kind)
                .await
                .unwrap();
        }
        assert!(unit.delete_feed(item.id).await.unwrap());
        unit.commit().await.unwrap();

        let mut unit = gateway.begin().await.unwrap();
        for kind in [EngagementKind::Like, EngagementKind::Star] {
            assert!(unit
                .list_feed_ids_for_user(user_id, kind)
                .await
                .unwrap()
                .is_empty());
            assert!(!unit.edge_exists(user_id, item.id, kind).await.unwrap());
        }
    }
}
