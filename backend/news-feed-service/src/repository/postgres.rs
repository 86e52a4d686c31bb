use super::{FeedGateway, FeedUnit};
use crate::domain::{Comment, CounterKind, EngagementKind, FeedItem};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const FEED_COLUMNS: &str =
    "id, title, text, likes_count, view_count, comments_count, created_at, updated_at";

const COMMENT_COLUMNS: &str = "id, feed_id, author_id, text, created_at, updated_at";

/// PostgreSQL-backed feed store; every unit of work is one transaction
#[derive(Clone)]
pub struct PgFeedGateway {
    pool: PgPool,
}

impl PgFeedGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the bundled schema migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl FeedGateway for PgFeedGateway {
    async fn begin(&self) -> Result<Box<dyn FeedUnit>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgFeedUnit { tx }))
    }
}

/// Unit of work over an open PostgreSQL transaction.
///
/// Dropping it without `commit` rolls the transaction back.
pub struct PgFeedUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl FeedUnit for PgFeedUnit {
    async fn insert_feed(
        &mut self,
        title: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<FeedItem> {
        let query = format!(
            r#"
            INSERT INTO feed_items (id, title, text, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {}
            "#,
            FEED_COLUMNS
        );

        let item = sqlx::query_as::<_, FeedItem>(&query)
            .bind(Uuid::new_v4())
            .bind(title)
            .bind(text)
            .bind(now)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(item)
    }

    async fn update_feed(
        &mut self,
        id: Uuid,
        title: &str,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<FeedItem>> {
        let query = format!(
            r#"
            UPDATE feed_items
            SET title = $2, text = $3, updated_at = $4
            WHERE id = $1
            RETURNING {}
            "#,
            FEED_COLUMNS
        );

        let item = sqlx::query_as::<_, FeedItem>(&query)
            .bind(id)
            .bind(title)
            .bind(text)
            .bind(updated_at)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(item)
    }

    async fn find_feed(&mut self, id: Uuid) -> Result<Option<FeedItem>> {
        let query = format!("SELECT {} FROM feed_items WHERE id = $1", FEED_COLUMNS);

        let item = sqlx::query_as::<_, FeedItem>(&query)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(item)
    }

    async fn find_feed_page(
        &mut self,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<FeedItem>)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feed_items")
            .fetch_one(&mut *self.tx)
            .await?;

        let query = format!(
            r#"
            SELECT {}
            FROM feed_items
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
            FEED_COLUMNS
        );

        let items = sqlx::query_as::<_, FeedItem>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok((total, items))
    }

    async fn delete_feed(&mut self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feed_items WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn feed_exists(&mut self, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM feed_items WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *self.tx)
                .await?;

        Ok(exists)
    }

    async fn increment_counter(
        &mut self,
        id: Uuid,
        kind: CounterKind,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let query = format!(
            "UPDATE feed_items SET {col} = {col} + 1, updated_at = $2 WHERE id = $1",
            col = kind.column()
        );

        let result = sqlx::query(&query)
            .bind(id)
            .bind(now)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn decrement_counter(
        &mut self,
        id: Uuid,
        kind: CounterKind,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let query = format!(
            "UPDATE feed_items SET {col} = GREATEST({col} - 1, 0), updated_at = $2 WHERE id = $1",
            col = kind.column()
        );

        let result = sqlx::query(&query)
            .bind(id)
            .bind(now)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn edge_exists(
        &mut self,
        user_id: Uuid,
        feed_id: Uuid,
        kind: EngagementKind,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM engagement_edges
                WHERE user_id = $1 AND feed_id = $2 AND kind = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(feed_id)
        .bind(kind.as_str())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn insert_edge_if_absent(
        &mut self,
        user_id: Uuid,
        feed_id: Uuid,
        kind: EngagementKind,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO engagement_edges (user_id, feed_id, kind)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, feed_id, kind) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(feed_id)
        .bind(kind.as_str())
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_edge(
        &mut self,
        user_id: Uuid,
        feed_id: Uuid,
        kind: EngagementKind,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM engagement_edges
            WHERE user_id = $1 AND feed_id = $2 AND kind = $3
            "#,
        )
        .bind(user_id)
        .bind(feed_id)
        .bind(kind.as_str())
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_edges_for_feed(&mut self, feed_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM engagement_edges WHERE feed_id = $1")
            .bind(feed_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_feed_ids_for_user(
        &mut self,
        user_id: Uuid,
        kind: EngagementKind,
    ) -> Result<Vec<Uuid>> {
        let feed_ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT feed_id
            FROM engagement_edges
            WHERE user_id = $1 AND kind = $2
            ORDER BY created_at DESC, feed_id DESC
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(feed_ids)
    }

    async fn find_favorites_page(
        &mut self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<FeedItem>)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM engagement_edges e
            JOIN feed_items f ON f.id = e.feed_id
            WHERE e.user_id = $1 AND e.kind = $2
            "#,
        )
        .bind(user_id)
        .bind(EngagementKind::Star.as_str())
        .fetch_one(&mut *self.tx)
        .await?;

        let items = sqlx::query_as::<_, FeedItem>(
            r#"
            SELECT f.id, f.title, f.text, f.likes_count, f.view_count, f.comments_count,
                   f.created_at, f.updated_at
            FROM feed_items f
            JOIN engagement_edges e ON e.feed_id = f.id
            WHERE e.user_id = $1 AND e.kind = $2
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(EngagementKind::Star.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok((total, items))
    }

    async fn insert_comment(
        &mut self,
        feed_id: Uuid,
        author_id: Uuid,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Comment> {
        let query = format!(
            r#"
            INSERT INTO comments (id, feed_id, author_id, text, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        );

        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(Uuid::new_v4())
            .bind(feed_id)
            .bind(author_id)
            .bind(text)
            .bind(now)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(comment)
    }

    async fn update_comment(
        &mut self,
        id: Uuid,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Comment>> {
        let query = format!(
            r#"
            UPDATE comments
            SET text = $2, updated_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        );

        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(text)
            .bind(updated_at)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(comment)
    }

    async fn find_comments_by_feed(&mut self, feed_id: Uuid) -> Result<Vec<Comment>> {
        let query = format!(
            r#"
            SELECT {}
            FROM comments
            WHERE feed_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
            COMMENT_COLUMNS
        );

        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(feed_id)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(comments)
    }

    async fn find_comments_by_author(&mut self, author_id: Uuid) -> Result<Vec<Comment>> {
        let query = format!(
            r#"
            SELECT {}
            FROM comments
            WHERE author_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
            COMMENT_COLUMNS
        );

        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(author_id)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(comments)
    }

    async fn delete_comments_for_feed(&mut self, feed_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE feed_id = $1")
            .bind(feed_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let unit = *self;
        unit.tx.commit().await?;
        Ok(())
    }
}
