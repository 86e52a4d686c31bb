/// Feed service - the orchestrator behind every public feed operation
///
/// Each operation opens exactly one unit of work, runs the component logic
/// (existence checks come first, so NotFound surfaces before any mutation),
/// commits, and maps records to response DTOs. A failure before commit drops
/// the unit and with it every change made so far.
use crate::domain::{
    CommentDto, EdgeChange, EngagementKind, FeedDto, Page, PageRequest, DEFAULT_PAGE_LIMIT,
};
use crate::error::{AppError, Result};
use crate::metrics::{FEED_ENGAGEMENT_TOTAL, FEED_OPERATIONS_TOTAL};
use crate::repository::FeedGateway;
use crate::services::{comments, engagement, feed_aggregate};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    Like,
    Unlike,
    Star,
    Unstar,
}

impl Toggle {
    fn operation(&self) -> &'static str {
        match self {
            Toggle::Like => "like_feed",
            Toggle::Unlike => "unlike_feed",
            Toggle::Star => "star_feed",
            Toggle::Unstar => "unstar_feed",
        }
    }

    fn kind(&self) -> EngagementKind {
        match self {
            Toggle::Like | Toggle::Unlike => EngagementKind::Like,
            Toggle::Star | Toggle::Unstar => EngagementKind::Star,
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Toggle::Like | Toggle::Star => "add",
            Toggle::Unlike | Toggle::Unstar => "remove",
        }
    }
}

fn record<T>(operation: &str, result: &Result<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(AppError::Validation(_)) => "validation",
        Err(AppError::NotFound(_)) => "not_found",
        Err(err) => {
            warn!(operation, error = %err, "Feed operation failed");
            "error"
        }
    };
    FEED_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

#[derive(Clone)]
pub struct FeedService {
    gateway: Arc<dyn FeedGateway>,
    default_page_limit: i64,
}

impl FeedService {
    pub fn new(gateway: Arc<dyn FeedGateway>) -> Self {
        Self {
            gateway,
            default_page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Override the page size used when callers omit `limit`
    pub fn with_default_page_limit(mut self, limit: i64) -> Self {
        self.default_page_limit = limit;
        self
    }

    fn page(&self, limit: Option<i64>, offset: Option<i64>) -> Result<PageRequest> {
        PageRequest::new(limit, offset, self.default_page_limit)
    }

    // ========== Feed items ==========

    pub async fn create_feed(&self, title: &str, text: &str) -> Result<FeedDto> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            let item = feed_aggregate::create(unit.as_mut(), title, text).await?;
            unit.commit().await?;
            Ok::<_, AppError>(item)
        }
        .await;
        record("create_feed", &result);

        let item = result?;
        info!(feed_id = %item.id, "Feed created");
        Ok(item.into())
    }

    /// Fetch a feed item; every successful read counts as one view
    pub async fn get_feed(&self, id: Uuid) -> Result<FeedDto> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            let item = feed_aggregate::get(unit.as_mut(), id).await?;
            unit.commit().await?;
            Ok::<_, AppError>(item)
        }
        .await;
        record("get_feed", &result);

        Ok(result?.into())
    }

    pub async fn list_feeds(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Page<FeedDto>> {
        let result = async {
            let page = self.page(limit, offset)?;
            let mut unit = self.gateway.begin().await?;
            let items = feed_aggregate::list_page(unit.as_mut(), page).await?;
            unit.commit().await?;
            Ok::<_, AppError>(items)
        }
        .await;
        record("list_feeds", &result);

        Ok(result?.map(FeedDto::from))
    }

    pub async fn update_feed(&self, id: Uuid, title: &str, text: &str) -> Result<FeedDto> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            let item = feed_aggregate::update(unit.as_mut(), id, title, text).await?;
            unit.commit().await?;
            Ok::<_, AppError>(item)
        }
        .await;
        record("update_feed", &result);

        let item = result?;
        info!(feed_id = %item.id, "Feed updated");
        Ok(item.into())
    }

    /// Delete a feed item together with its comments, likes and stars
    pub async fn delete_feed(&self, id: Uuid) -> Result<()> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            feed_aggregate::delete(unit.as_mut(), id).await?;
            unit.commit().await
        }
        .await;
        record("delete_feed", &result);

        result?;
        info!(feed_id = %id, "Feed deleted");
        Ok(())
    }

    // ========== Engagement ==========

    async fn toggle(&self, toggle: Toggle, feed_id: Uuid, user_id: Uuid) -> Result<()> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            let change = match toggle {
                Toggle::Like => engagement::like(unit.as_mut(), feed_id, user_id).await?,
                Toggle::Unlike => engagement::unlike(unit.as_mut(), feed_id, user_id).await?,
                Toggle::Star => engagement::star(unit.as_mut(), feed_id, user_id).await?,
                Toggle::Unstar => engagement::unstar(unit.as_mut(), feed_id, user_id).await?,
            };
            unit.commit().await?;
            Ok::<EdgeChange, AppError>(change)
        }
        .await;
        record(toggle.operation(), &result);

        let change = result?;
        FEED_ENGAGEMENT_TOTAL
            .with_label_values(&[toggle.kind().as_str(), toggle.action(), change.as_str()])
            .inc();
        debug!(
            feed_id = %feed_id,
            user_id = %user_id,
            kind = %toggle.kind(),
            change = change.as_str(),
            "Engagement edge toggled"
        );

        Ok(())
    }

    /// Idempotent: repeated likes from one user count once
    pub async fn like_feed(&self, feed_id: Uuid, user_id: Uuid) -> Result<()> {
        self.toggle(Toggle::Like, feed_id, user_id).await
    }

    pub async fn unlike_feed(&self, feed_id: Uuid, user_id: Uuid) -> Result<()> {
        self.toggle(Toggle::Unlike, feed_id, user_id).await
    }

    pub async fn star_feed(&self, feed_id: Uuid, user_id: Uuid) -> Result<()> {
        self.toggle(Toggle::Star, feed_id, user_id).await
    }

    pub async fn unstar_feed(&self, feed_id: Uuid, user_id: Uuid) -> Result<()> {
        self.toggle(Toggle::Unstar, feed_id, user_id).await
    }

    pub async fn list_favorites(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Page<FeedDto>> {
        let result = async {
            let page = self.page(limit, offset)?;
            let mut unit = self.gateway.begin().await?;
            let items = engagement::list_favorites(unit.as_mut(), user_id, page).await?;
            unit.commit().await?;
            Ok::<_, AppError>(items)
        }
        .await;
        record("list_favorites", &result);

        Ok(result?.map(FeedDto::from))
    }

    /// Ids of feed items the user has liked or starred
    pub async fn list_engaged_feed_ids(
        &self,
        user_id: Uuid,
        kind: EngagementKind,
    ) -> Result<Vec<Uuid>> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            let ids = engagement::engaged_feed_ids(unit.as_mut(), user_id, kind).await?;
            unit.commit().await?;
            Ok::<_, AppError>(ids)
        }
        .await;
        record("list_engaged_feed_ids", &result);

        result
    }

    // ========== Comments ==========

    pub async fn add_comment(
        &self,
        feed_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<CommentDto> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            let comment = comments::add(unit.as_mut(), feed_id, author_id, text).await?;
            unit.commit().await?;
            Ok::<_, AppError>(comment)
        }
        .await;
        record("add_comment", &result);

        let comment = result?;
        info!(
            comment_id = %comment.id,
            feed_id = %comment.feed_id,
            user_id = %comment.author_id,
            "Comment added"
        );
        Ok(comment.into())
    }

    pub async fn list_comments(&self, feed_id: Uuid) -> Result<Vec<CommentDto>> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            feed_aggregate::ensure_exists(unit.as_mut(), feed_id).await?;
            let items = comments::list_by_feed(unit.as_mut(), feed_id).await?;
            unit.commit().await?;
            Ok::<_, AppError>(items)
        }
        .await;
        record("list_comments", &result);

        Ok(result?.into_iter().map(CommentDto::from).collect())
    }

    pub async fn list_user_comments(&self, author_id: Uuid) -> Result<Vec<CommentDto>> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            let items = comments::list_by_author(unit.as_mut(), author_id).await?;
            unit.commit().await?;
            Ok::<_, AppError>(items)
        }
        .await;
        record("list_user_comments", &result);

        Ok(result?.into_iter().map(CommentDto::from).collect())
    }

    pub async fn edit_comment(&self, comment_id: Uuid, text: &str) -> Result<CommentDto> {
        let result = async {
            let mut unit = self.gateway.begin().await?;
            let comment = comments::edit(unit.as_mut(), comment_id, text).await?;
            unit.commit().await?;
            Ok::<_, AppError>(comment)
        }
        .await;
        record("edit_comment", &result);

        Ok(result?.into())
    }
}
