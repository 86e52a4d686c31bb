pub mod comments;
pub mod engagement;
pub mod feed_aggregate;
pub mod feed_service;

pub use feed_service::FeedService;
