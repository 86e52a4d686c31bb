/// Feed handlers - HTTP endpoints for feed items, likes, stars and favorites
use crate::domain::EngagementKind;
use crate::error::Result;
use crate::services::FeedService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UserParams {
    #[serde(alias = "userId")]
    pub user_id: Uuid,
}

/// Request body for creating a feed item
#[derive(Debug, Deserialize)]
pub struct CreateFeedRequest {
    pub title: String,
    pub text: String,
}

/// Request body for updating a feed item
#[derive(Debug, Deserialize)]
pub struct UpdateFeedRequest {
    pub title: String,
    pub text: String,
}

/// Publish a feed item
pub async fn create_feed(
    service: web::Data<FeedService>,
    req: web::Json<CreateFeedRequest>,
) -> Result<HttpResponse> {
    let feed = service.create_feed(&req.title, &req.text).await?;
    Ok(HttpResponse::Created().json(feed))
}

/// Get a feed item (counts as a view)
pub async fn get_feed(
    service: web::Data<FeedService>,
    feed_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let feed = service.get_feed(*feed_id).await?;
    Ok(HttpResponse::Ok().json(feed))
}

/// Page through all feed items, newest first
pub async fn list_feeds(
    service: web::Data<FeedService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let page = service.list_feeds(query.limit, query.offset).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn update_feed(
    service: web::Data<FeedService>,
    feed_id: web::Path<Uuid>,
    req: web::Json<UpdateFeedRequest>,
) -> Result<HttpResponse> {
    let feed = service.update_feed(*feed_id, &req.title, &req.text).await?;
    Ok(HttpResponse::Ok().json(feed))
}

pub async fn delete_feed(
    service: web::Data<FeedService>,
    feed_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete_feed(*feed_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn like_feed(
    service: web::Data<FeedService>,
    feed_id: web::Path<Uuid>,
    query: web::Query<UserParams>,
) -> Result<HttpResponse> {
    service.like_feed(*feed_id, query.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn unlike_feed(
    service: web::Data<FeedService>,
    feed_id: web::Path<Uuid>,
    query: web::Query<UserParams>,
) -> Result<HttpResponse> {
    service.unlike_feed(*feed_id, query.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn star_feed(
    service: web::Data<FeedService>,
    feed_id: web::Path<Uuid>,
    query: web::Query<UserParams>,
) -> Result<HttpResponse> {
    service.star_feed(*feed_id, query.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn unstar_feed(
    service: web::Data<FeedService>,
    feed_id: web::Path<Uuid>,
    query: web::Query<UserParams>,
) -> Result<HttpResponse> {
    service.unstar_feed(*feed_id, query.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Page through the feed items a user has starred
pub async fn list_favorites(
    service: web::Data<FeedService>,
    user_id: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let page = service
        .list_favorites(*user_id, query.limit, query.offset)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Ids of feed items a user has liked
pub async fn list_liked_ids(
    service: web::Data<FeedService>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let ids = service
        .list_engaged_feed_ids(*user_id, EngagementKind::Like)
        .await?;
    Ok(HttpResponse::Ok().json(ids))
}

/// Ids of feed items a user has starred
pub async fn list_starred_ids(
    service: web::Data<FeedService>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let ids = service
        .list_engaged_feed_ids(*user_id, EngagementKind::Star)
        .await?;
    Ok(HttpResponse::Ok().json(ids))
}
