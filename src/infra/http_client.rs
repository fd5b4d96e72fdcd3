use crate::domain::interface::*;
use crate::error::*;
use async_trait::async_trait;

#[derive(Debug)]
pub enum HttpClientError {
    HttpError,
}

impl IServiceError for HttpClientError {
    fn error_type(&self) -> String {
        use HttpClientError::*;

        match self {
            HttpError => "http_error",
        }
        .to_string()
    }

    fn status_code(&self) -> http::StatusCode {
        use HttpClientError::*;

        match self {
            HttpError => http::StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> ServiceError {
        ServiceError::new(HttpClientError::HttpError, err)
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> HttpClient {
        HttpClient {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IHttpClient for HttpClient {
    async fn get(
        &self,
        url: &str,
        header: Option<reqwest::header::HeaderMap>,
    ) -> Result<reqwest::Response> {
        let mut req = self.client.get(url);
        if let Some(h) = header {
            req = req.headers(h);
        }
        let resp = req.send().await.map_err(|err| {
            tracing::warn!(%url, %err, "upstream request failed");
            err
        })?;

        Ok(resp)
    }
}
