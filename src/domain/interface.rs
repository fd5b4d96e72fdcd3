use crate::error::Result;
use async_trait::async_trait;

/// Raw upstream answer: the decoded JSON body and the status it came with.
pub type UpstreamResponse = (serde_json::Value, http::StatusCode);

#[async_trait]
pub trait ITweetRepository {
    async fn search_by_hashtag(&self, hashtag: &str, limit: u32) -> Result<UpstreamResponse>;
    async fn user_timeline(&self, username: &str, limit: u32) -> Result<UpstreamResponse>;
}

#[async_trait]
pub trait IHttpClient {
    async fn get(
        &self,
        url: &str,
        header: Option<reqwest::header::HeaderMap>,
    ) -> Result<reqwest::Response>;
}
