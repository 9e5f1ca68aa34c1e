use crate::error::CoreError;
use crate::types::{CommentRecord, PostRecord};
use async_trait::async_trait;

/// Read-only access to a discussion forum.
#[async_trait]
pub trait ForumSource: Send + Sync {
    /// Up to `limit` posts from the forum's "hot" listing, in listing order.
    async fn hot_posts(&self, forum: &str, limit: u32) -> Result<Vec<PostRecord>, CoreError>;

    /// The post's comment forest flattened breadth-first, "load more" nodes skipped.
    ///
    /// `limit` is a hint for the server; callers still truncate.
    async fn post_comments(
        &self,
        post_id: &str,
        limit: u32,
    ) -> Result<Vec<CommentRecord>, CoreError>;
}
