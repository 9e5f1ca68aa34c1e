use crate::rate_limiter::{RateLimitConfig, RateLimiter};
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, Response, StatusCode};
use rumour_core::{CommentRecord, CoreError, PostRecord, RedditApiError};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

/// Largest page Reddit serves for a listing request.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<T> {
    pub kind: String,
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPostData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: String,
    pub created_utc: f64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
}

/// Comment listing as found in a comments response or in a comment's `replies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentListing {
    #[serde(default)]
    pub kind: String,
    pub data: CommentListingData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentListingData {
    #[serde(default)]
    pub children: Vec<CommentThing>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentThing {
    #[serde(rename = "t1")]
    Comment(RedditCommentData),
    /// "load more comments" placeholder.
    #[serde(rename = "more")]
    More(RedditMoreData),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditCommentData {
    pub id: String,
    pub parent_id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
    pub created_utc: f64,
    #[serde(default)]
    pub replies: Replies,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditMoreData {
    #[serde(default)]
    pub count: u32,
}

/// Reddit sends `""` for a comment without replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Replies {
    Listing(CommentListing),
    Empty(String),
}

impl Default for Replies {
    fn default() -> Self {
        Replies::Empty(String::new())
    }
}

impl Replies {
    fn into_children(self) -> Vec<CommentThing> {
        match self {
            Replies::Listing(listing) => listing.data.children,
            Replies::Empty(_) => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct RedditApiClient {
    http_client: Client,
    rate_limiter: RateLimiter,
    api_base: Url,
    user_agent: String,
}

impl RedditApiClient {
    pub fn new(user_agent: String, api_base: &str) -> Result<Self, CoreError> {
        let api_base = Url::parse(api_base).map_err(|e| CoreError::InvalidInput {
            message: format!("Invalid Reddit API base URL '{}': {}", api_base, e),
        })?;

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            rate_limiter: RateLimiter::new(RateLimitConfig::reddit_oauth()),
            api_base,
            user_agent,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base.as_str().trim_end_matches('/'), endpoint)
    }

    /// Sends a request and maps unsuccessful statuses onto `RedditApiError`.
    ///
    /// `not_found` builds the error reported for a 404 so callers can name the missing resource.
    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        access_token: &str,
        query_params: &[(&str, &str)],
        not_found: impl FnOnce() -> RedditApiError,
    ) -> Result<Response, CoreError> {
        let url = self.endpoint_url(endpoint);
        let start_time = Instant::now();

        let waited = self.rate_limiter.acquire().await;
        debug!("Acquired rate limit permit for {} {} after {:?}", method, endpoint, waited);

        let request_builder = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(access_token)
            .query(query_params);

        info!("Making Reddit API request: {} {}", method, endpoint);
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                if e.is_timeout() {
                    return Err(CoreError::RedditApi(RedditApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        debug!(
            "{} {} answered {} in {:?}",
            method,
            endpoint,
            status,
            start_time.elapsed()
        );
        if status.is_success() {
            return Ok(response);
        }

        error!("Request failed with status: {} for {}", status, endpoint);
        let api_error = match status {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .unwrap_or(60);
                warn!("Rate limited, Reddit asked to wait {} seconds", retry_after);
                RedditApiError::RateLimitExceeded { retry_after }
            }
            StatusCode::UNAUTHORIZED => RedditApiError::InvalidToken,
            StatusCode::FORBIDDEN => RedditApiError::Forbidden {
                resource: endpoint.to_string(),
            },
            StatusCode::NOT_FOUND => not_found(),
            status if status.is_server_error() => RedditApiError::ServerError {
                status_code: status.as_u16(),
            },
            status => RedditApiError::InvalidResponse {
                details: format!("Unexpected status {} for {}", status, endpoint),
            },
        };
        Err(CoreError::RedditApi(api_error))
    }

    pub async fn get_subreddit_posts(
        &self,
        access_token: &str,
        subreddit: &str,
        limit: u32,
        after: Option<&str>,
    ) -> Result<RedditListing<RedditPostData>, CoreError> {
        let endpoint = format!("/r/{}/hot", subreddit);
        let limit_str = limit.to_string();
        let mut params = vec![("limit", limit_str.as_str()), ("raw_json", "1")];
        if let Some(after_val) = after {
            params.push(("after", after_val));
        }

        let response = self
            .make_request(Method::GET, &endpoint, access_token, &params, || {
                RedditApiError::SubredditNotFound {
                    subreddit: subreddit.to_string(),
                }
            })
            .await?;

        let listing: RedditListing<RedditPostData> = response.json().await.map_err(|e| {
            error!("Failed to parse subreddit posts: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse posts for r/{}", subreddit),
            })
        })?;

        info!(
            "Retrieved {} posts from r/{}",
            listing.data.children.len(),
            subreddit
        );
        Ok(listing)
    }

    pub async fn get_post_comments(
        &self,
        access_token: &str,
        post_id: &str,
        limit: u32,
    ) -> Result<CommentListing, CoreError> {
        let endpoint = format!("/comments/{}", post_id);
        let limit_str = limit.to_string();
        let params = [("limit", limit_str.as_str()), ("raw_json", "1")];

        let response = self
            .make_request(Method::GET, &endpoint, access_token, &params, || {
                RedditApiError::PostNotFound {
                    post_id: post_id.to_string(),
                }
            })
            .await?;

        // The first element repeats the post itself.
        let (_post, comments): (IgnoredAny, CommentListing) =
            response.json().await.map_err(|e| {
                error!("Failed to parse comments: {}", e);
                CoreError::RedditApi(RedditApiError::InvalidResponse {
                    details: format!("Failed to parse comments for post {}", post_id),
                })
            })?;

        debug!(
            "Retrieved {} top-level comment nodes for post {}",
            comments.data.children.len(),
            post_id
        );
        Ok(comments)
    }

    /// Forwards an OAuth2 token request through this client so it carries the configured User-Agent.
    pub async fn send_oauth_request(
        &self,
        request: oauth2::HttpRequest,
    ) -> Result<oauth2::HttpResponse, reqwest::Error> {
        let response = self
            .http_client
            .request(request.method, request.url.as_str())
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status_code = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(oauth2::HttpResponse {
            status_code,
            headers,
            body,
        })
    }
}

fn timestamp(created_utc: f64) -> DateTime<Utc> {
    DateTime::from_timestamp(created_utc.trunc() as i64, 0).unwrap_or_default()
}

/// Flattens a comment forest breadth-first: all top-level comments, then their replies, and so on.
/// "load more" placeholders are dropped without being resolved.
pub fn flatten_comment_forest(post_id: &str, listing: CommentListing) -> Vec<CommentRecord> {
    let mut queue: VecDeque<CommentThing> = listing.data.children.into();
    let mut comments = Vec::new();

    while let Some(thing) = queue.pop_front() {
        match thing {
            CommentThing::Comment(data) => {
                queue.extend(data.replies.into_children());
                comments.push(CommentRecord::new(
                    post_id.to_string(),
                    data.id,
                    data.parent_id,
                    data.body,
                    data.score,
                    timestamp(data.created_utc),
                ));
            }
            CommentThing::More(more) => {
                debug!("Skipping 'load more' node hiding {} comments", more.count);
            }
        }
    }

    comments
}

impl From<RedditPostData> for PostRecord {
    fn from(post_data: RedditPostData) -> Self {
        PostRecord::new(
            post_data.id,
            post_data.title,
            post_data.selftext,
            post_data.url,
            post_data.score,
            post_data.num_comments,
            timestamp(post_data.created_utc),
        )
    }
}
