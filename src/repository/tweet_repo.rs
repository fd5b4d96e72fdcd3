use crate::domain::interface::*;
use crate::error::*;
use crate::initializer::Credentials;
use crate::repository::RepositoryError;
use async_trait::async_trait;
use oauth1_request::{signature_method::HmacSha1, Token};
use std::sync::Arc;

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1";

// Fields are kept in alphabetical order, the order they are signed in.
#[derive(oauth1_request::Request)]
struct SearchQuery<'a> {
    count: u32,
    include_entities: bool,
    q: &'a str,
}

#[derive(oauth1_request::Request)]
struct UserTimelineQuery<'a> {
    count: u32,
    exclude_replies: bool,
    include_rts: bool,
    screen_name: &'a str,
}

pub struct TweetRepository {
    http_client: Arc<dyn IHttpClient + Sync + Send>,
    credentials: Credentials,
    api_base: String,
}

impl TweetRepository {
    pub fn new(
        http_client: Arc<dyn IHttpClient + Sync + Send>,
        credentials: Credentials,
        api_base: String,
    ) -> Self {
        Self {
            http_client,
            credentials,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Sends an OAuth1 signed GET and hands back the decoded body with its
    /// status, whatever that status is.
    pub async fn send_request<R>(&self, url: &str, params: &R) -> Result<UpstreamResponse>
    where
        R: oauth1_request::Request + Sync + ?Sized,
    {
        let token = Token::from_parts(
            self.credentials.api_key.as_str(),
            self.credentials.api_secret_key.as_str(),
            self.credentials.access_token.as_str(),
            self.credentials.access_token_secret.as_str(),
        );
        let authorization = oauth1_request::get(url, params, &token, HmacSha1::new());
        let uri = oauth1_request::to_query(url.to_owned(), params);

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&authorization)
                .map_err(|err| ServiceError::new(RepositoryError::InvalidCredentials, err))?,
        );

        let response = self.http_client.get(&uri, Some(headers)).await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice::<serde_json::Value>(&bytes)
            .map_err(|err| ServiceError::new(RepositoryError::InvalidBody, err))?;

        tracing::debug!(%url, %status, "upstream responded");

        Ok((body, status))
    }
}

#[async_trait]
impl ITweetRepository for TweetRepository {
    async fn search_by_hashtag(&self, hashtag: &str, limit: u32) -> Result<UpstreamResponse> {
        let url = format!("{}/search/tweets.json", self.api_base);
        let q = format!("#{}", hashtag);
        let params = SearchQuery {
            count: limit,
            include_entities: true,
            q: &q,
        };

        self.send_request(&url, &params).await
    }

    async fn user_timeline(&self, username: &str, limit: u32) -> Result<UpstreamResponse> {
        let url = format!("{}/statuses/user_timeline.json", self.api_base);
        let params = UserTimelineQuery {
            count: limit,
            exclude_replies: false,
            include_rts: true,
            screen_name: username,
        };

        self.send_request(&url, &params).await
    }
}
