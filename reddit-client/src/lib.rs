pub mod api;
pub mod rate_limiter;


use api::{flatten_comment_forest, RedditApiClient, MAX_PAGE_SIZE};
use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, RequestTokenError, TokenResponse, TokenUrl};
use rumour_core::{
    CommentRecord, CoreError, ForumSource, PostRecord, RedditApiError, RedditCredentials,
};
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/authorize";

/// Tokens are refreshed this long before Reddit would reject them.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct RedditOAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub api_base: String,
    pub token_url: String,
}

impl RedditOAuth2Config {
    pub fn new(client_id: String, client_secret: String, user_agent: String) -> Self {
        Self {
            client_id,
            client_secret,
            user_agent,
            api_base: rumour_core::DEFAULT_API_BASE.to_string(),
            token_url: rumour_core::DEFAULT_TOKEN_URL.to_string(),
        }
    }

    pub fn with_endpoints(mut self, api_base: String, token_url: String) -> Self {
        self.api_base = api_base;
        self.token_url = token_url;
        self
    }
}

impl From<&RedditCredentials> for RedditOAuth2Config {
    fn from(credentials: &RedditCredentials) -> Self {
        Self::new(
            credentials.client_id.clone(),
            credentials.client_secret.clone(),
            credentials.user_agent.clone(),
        )
        .with_endpoints(credentials.api_base.clone(), credentials.token_url.clone())
    }
}

/// Application-only bearer token.
#[derive(Debug, Clone)]
pub struct RedditToken {
    pub access_token: String,
    pub expires_at: SystemTime,
}

impl RedditToken {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() + EXPIRY_MARGIN >= self.expires_at
    }
}

/// Read-only Reddit client authenticated with static script-app credentials.
pub struct RedditClient {
    oauth_client: BasicClient,
    api: RedditApiClient,
    token: Mutex<Option<RedditToken>>,
}

impl RedditClient {
    pub fn new(config: RedditOAuth2Config) -> Result<Self, CoreError> {
        let invalid_url = |field: &str, e: url::ParseError| CoreError::InvalidInput {
            message: format!("Invalid {} URL: {}", field, e),
        };

        let oauth_client = BasicClient::new(
            ClientId::new(config.client_id),
            Some(ClientSecret::new(config.client_secret)),
            AuthUrl::new(REDDIT_AUTH_URL.to_string()).map_err(|e| invalid_url("auth", e))?,
            Some(TokenUrl::new(config.token_url).map_err(|e| invalid_url("token", e))?),
        );
        let api = RedditApiClient::new(config.user_agent, &config.api_base)?;

        Ok(Self {
            oauth_client,
            api,
            token: Mutex::new(None),
        })
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token
            .lock()
            .await
            .as_ref()
            .is_some_and(|token| !token.is_expired())
    }

    pub async fn set_token(&self, token: RedditToken) {
        *self.token.lock().await = Some(token);
    }

    /// Requests a fresh client-credentials token.
    pub async fn authenticate(&self) -> Result<RedditToken, CoreError> {
        info!("Requesting Reddit application token");
        let response = self
            .oauth_client
            .exchange_client_credentials()
            .request_async(|request| self.api.send_oauth_request(request))
            .await
            .map_err(|e| {
                let reason = match &e {
                    RequestTokenError::ServerResponse(response) => response.to_string(),
                    other => other.to_string(),
                };
                error!("Token request failed: {}", reason);
                CoreError::RedditApi(RedditApiError::AuthenticationFailed { reason })
            })?;

        let lifetime = response
            .expires_in()
            .unwrap_or(Duration::from_secs(3600));
        let token = RedditToken {
            access_token: response.access_token().secret().clone(),
            expires_at: SystemTime::now() + lifetime,
        };
        debug!("Token valid for {:?}", lifetime);
        Ok(token)
    }

    /// Returns a valid access token, authenticating when none is cached or it has expired.
    pub async fn ensure_authenticated(&self) -> Result<String, CoreError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| !token.is_expired()) {
            return Ok(token.access_token.clone());
        }

        let token = self.authenticate().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    /// Walks the hot listing page by page until `limit` posts are collected or it runs out.
    pub async fn fetch_hot_posts(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<PostRecord>, CoreError> {
        let access_token = self.ensure_authenticated().await?;
        let limit = limit as usize;
        let mut posts = Vec::with_capacity(limit.min(MAX_PAGE_SIZE));
        let mut after: Option<String> = None;

        while posts.len() < limit {
            let page_size = (limit - posts.len()).min(MAX_PAGE_SIZE) as u32;
            let listing = self
                .api
                .get_subreddit_posts(&access_token, subreddit, page_size, after.as_deref())
                .await?;

            let page_len = listing.data.children.len();
            posts.extend(
                listing
                    .data
                    .children
                    .into_iter()
                    .map(|child| PostRecord::from(child.data)),
            );

            after = listing.data.after;
            if page_len == 0 || after.is_none() {
                break;
            }
        }

        posts.truncate(limit);
        Ok(posts)
    }

    pub async fn fetch_comments(
        &self,
        post_id: &str,
        limit: u32,
    ) -> Result<Vec<CommentRecord>, CoreError> {
        let access_token = self.ensure_authenticated().await?;
        let listing = self
            .api
            .get_post_comments(&access_token, post_id, limit)
            .await?;
        Ok(flatten_comment_forest(post_id, listing))
    }
}

#[async_trait]
impl ForumSource for RedditClient {
    async fn hot_posts(&self, forum: &str, limit: u32) -> Result<Vec<PostRecord>, CoreError> {
        self.fetch_hot_posts(forum, limit).await
    }

    async fn post_comments(
        &self,
        post_id: &str,
        limit: u32,
    ) -> Result<Vec<CommentRecord>, CoreError> {
        self.fetch_comments(post_id, limit).await
    }
}
