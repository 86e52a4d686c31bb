/// HTTP handlers for feed endpoints
///
/// Handlers only translate between HTTP and `FeedService`; all feed rules
/// live in the service layer.
pub mod comments;
pub mod feeds;

use actix_web::web;

/// Register the `/api/v1/feeds` routes.
///
/// Fixed-segment routes are registered before `/{feed_id}` so they are not
/// captured by it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/feeds")
            .route("", web::get().to(feeds::list_feeds))
            .route("", web::post().to(feeds::create_feed))
            .route("/comment", web::post().to(comments::add_comment))
            .route("/comment/{comment_id}", web::put().to(comments::edit_comment))
            .route(
                "/comments/by-user/{user_id}",
                web::get().to(comments::list_user_comments),
            )
            .route("/favorites/{user_id}", web::get().to(feeds::list_favorites))
            .route("/users/{user_id}/liked", web::get().to(feeds::list_liked_ids))
            .route(
                "/users/{user_id}/starred",
                web::get().to(feeds::list_starred_ids),
            )
            .route("/{feed_id}", web::get().to(feeds::get_feed))
            .route("/{feed_id}", web::put().to(feeds::update_feed))
            .route("/{feed_id}", web::delete().to(feeds::delete_feed))
            .route("/{feed_id}/like", web::post().to(feeds::like_feed))
            .route("/{feed_id}/unlike", web::post().to(feeds::unlike_feed))
            .route("/{feed_id}/star", web::post().to(feeds::star_feed))
            .route("/{feed_id}/unstar", web::post().to(feeds::unstar_feed))
            .route("/{feed_id}/comments", web::get().to(comments::list_comments)),
    );
}
