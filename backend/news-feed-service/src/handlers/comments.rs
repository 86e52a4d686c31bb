/// Comment handlers - HTTP endpoints for comment operations
use crate::error::Result;
use crate::services::FeedService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

/// Request body for adding a comment
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
    #[serde(alias = "userId")]
    pub user_id: Uuid,
    #[serde(alias = "feedId")]
    pub feed_id: Uuid,
}

/// Request body for editing a comment
#[derive(Debug, Deserialize)]
pub struct EditCommentRequest {
    pub text: String,
}

/// Add a comment to a feed item
pub async fn add_comment(
    service: web::Data<FeedService>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let comment = service
        .add_comment(req.feed_id, req.user_id, &req.text)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Comments on a feed item, newest first
pub async fn list_comments(
    service: web::Data<FeedService>,
    feed_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = service.list_comments(*feed_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Comments written by a user, newest first
pub async fn list_user_comments(
    service: web::Data<FeedService>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = service.list_user_comments(*user_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn edit_comment(
    service: web::Data<FeedService>,
    comment_id: web::Path<Uuid>,
    req: web::Json<EditCommentRequest>,
) -> Result<HttpResponse> {
    let comment = service.edit_comment(*comment_id, &req.text).await?;
    Ok(HttpResponse::Ok().json(comment))
}
