pub mod dto;
pub mod models;
pub mod paging;

pub use dto::{CommentDto, FeedDto};
pub use models::{Comment, CounterKind, EdgeChange, EngagementKind, FeedItem, Page};
pub use paging::{PageRequest, DEFAULT_PAGE_LIMIT};
