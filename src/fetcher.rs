use rumour_core::{AnalysisConfig, CommentRecord, CoreError, ForumSource, PostRecord};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    pub max_posts: u32,
    pub max_comments_per_post: u32,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for FetchLimits {
    fn from(analysis: &AnalysisConfig) -> Self {
        Self {
            max_posts: analysis.max_posts,
            max_comments_per_post: analysis.max_comments_per_post,
        }
    }
}

/// Raw record sets of one forum, before annotation.
#[derive(Debug, Default)]
pub struct FetchedForum {
    pub posts: Vec<PostRecord>,
    pub comments: Vec<CommentRecord>,
}

/// Hot posts of `forum` and, per post, the first `max_comments_per_post` flattened comments.
///
/// Any source error aborts the fetch.
pub async fn fetch_forum<S>(
    source: &S,
    forum: &str,
    limits: FetchLimits,
) -> Result<FetchedForum, CoreError>
where
    S: ForumSource + ?Sized,
{
    let posts = source.hot_posts(forum, limits.max_posts).await?;
    let mut comments = Vec::new();

    for post in &posts {
        let mut post_comments = source
            .post_comments(&post.id, limits.max_comments_per_post)
            .await?;

        let fetched = post_comments.len();
        post_comments.retain(|comment| comment.post_id == post.id);
        post_comments.truncate(limits.max_comments_per_post as usize);
        debug!(
            post = %post.id,
            fetched,
            kept = post_comments.len(),
            "Fetched comments"
        );
        comments.extend(post_comments);
    }

    info!(
        forum,
        posts = posts.len(),
        comments = comments.len(),
        "Fetched forum"
    );
    Ok(FetchedForum { posts, comments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use rumour_core::RedditApiError;
    use std::collections::HashMap;

    struct StaticSource {
        posts: Vec<PostRecord>,
        comments: HashMap<String, Vec<CommentRecord>>,
    }

    #[async_trait]
    impl ForumSource for StaticSource {
        async fn hot_posts(&self, forum: &str, limit: u32) -> Result<Vec<PostRecord>, CoreError> {
            if forum == "missing" {
                return Err(RedditApiError::SubredditNotFound {
                    subreddit: forum.to_string(),
                }
                .into());
            }
            Ok(self.posts.iter().take(limit as usize).cloned().collect())
        }

        async fn post_comments(
            &self,
            post_id: &str,
            _limit: u32,
        ) -> Result<Vec<CommentRecord>, CoreError> {
            self.comments
                .get(post_id)
                .cloned()
                .ok_or_else(|| RedditApiError::PostNotFound {
                    post_id: post_id.to_string(),
                }
                .into())
        }
    }

    fn post(id: &str) -> PostRecord {
        PostRecord::new(
            id.to_string(),
            format!("title {id}"),
            String::new(),
            String::new(),
            0,
            0,
            DateTime::<Utc>::UNIX_EPOCH,
        )
    }

    fn comment(post_id: &str, id: &str) -> CommentRecord {
        CommentRecord::new(
            post_id.to_string(),
            id.to_string(),
            format!("t3_{post_id}"),
            format!("comment {id}"),
            0,
            DateTime::<Utc>::UNIX_EPOCH,
        )
    }

    fn source() -> StaticSource {
        let mut comments = HashMap::new();
        comments.insert(
            "a".to_string(),
            (0..5).map(|i| comment("a", &format!("a{i}"))).collect(),
        );
        comments.insert(
            "b".to_string(),
            vec![comment("b", "b0"), comment("zzz", "orphan")],
        );
        comments.insert("c".to_string(), Vec::new());
        StaticSource {
            posts: vec![post("a"), post("b"), post("c")],
            comments,
        }
    }

    #[tokio::test]
    async fn test_comments_truncated_per_post() {
        let limits = FetchLimits {
            max_posts: 10,
            max_comments_per_post: 3,
        };
        let fetched = fetch_forum(&source(), "rust", limits).await.unwrap();
        assert_eq!(fetched.posts.len(), 3);

        let ids: Vec<_> = fetched.comments.iter().map(|c| c.comment_id.as_str()).collect();
        assert_eq!(ids, vec!["a0", "a1", "a2", "b0"]);
    }

    #[tokio::test]
    async fn test_every_comment_references_a_fetched_post() {
        let fetched = fetch_forum(&source(), "rust", FetchLimits::default())
            .await
            .unwrap();
        for comment in &fetched.comments {
            assert!(fetched.posts.iter().any(|p| p.id == comment.post_id));
        }
    }

    #[tokio::test]
    async fn test_post_limit_bounds_comment_requests() {
        let limits = FetchLimits {
            max_posts: 1,
            max_comments_per_post: 100,
        };
        let fetched = fetch_forum(&source(), "rust", limits).await.unwrap();
        assert_eq!(fetched.posts.len(), 1);
        assert_eq!(fetched.comments.len(), 5);
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let err = fetch_forum(&source(), "missing", FetchLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::RedditApi(RedditApiError::SubredditNotFound { .. })
        ));

        let mut broken = source();
        broken.comments.remove("b");
        let err = fetch_forum(&broken, "rust", FetchLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::RedditApi(RedditApiError::PostNotFound { .. })
        ));
    }
}
