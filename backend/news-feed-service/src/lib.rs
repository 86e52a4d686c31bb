/// News Feed Service Library
///
/// Publishes feed items and tracks how users engage with them: views, likes,
/// stars (favorites) and comments. Counters on a feed item always agree with
/// the engagement records behind them.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `domain`: Feed items, comments, engagement kinds, paging
/// - `services`: Business logic layer
/// - `repository`: Storage gateways (PostgreSQL and in-memory)
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus counters
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod repository;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::FeedService;
