use crate::domain::interface::*;
use crate::domain::model::*;
use crate::error::*;
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_LIMIT: u32 = 30;

#[derive(Debug)]
pub enum TweetServiceError {
    UnexpectedPayload,
}

impl IServiceError for TweetServiceError {
    fn error_type(&self) -> String {
        use TweetServiceError::*;

        match self {
            UnexpectedPayload => "invalid_upstream_payload",
        }
        .to_string()
    }

    fn status_code(&self) -> http::StatusCode {
        use TweetServiceError::*;

        match self {
            UnexpectedPayload => http::StatusCode::BAD_GATEWAY,
        }
    }
}

/// Outcome of a search: formatted tweets on success, otherwise the upstream
/// error body untouched together with its status.
#[derive(Debug, PartialEq)]
pub enum SearchResult {
    Tweets(Vec<FormattedTweet>),
    Upstream {
        body: Value,
        status: http::StatusCode,
    },
}

impl SearchResult {
    pub fn status(&self) -> http::StatusCode {
        match self {
            SearchResult::Tweets(_) => http::StatusCode::OK,
            SearchResult::Upstream { status, .. } => *status,
        }
    }
}

#[derive(Clone)]

pub struct TweetService {
    tweet_repo: Arc<dyn ITweetRepository + Send + Sync>,
}

impl TweetService {
    pub fn new(tweet_repo: Arc<dyn ITweetRepository + Send + Sync>) -> Self {
        Self { tweet_repo }
    }

    pub async fn get_tweets_by_hashtag(&self, hashtag: &str, limit: u32) -> Result<SearchResult> {
        let (body, status) = self.tweet_repo.search_by_hashtag(hashtag, limit).await?;
        if status != http::StatusCode::OK {
            return Ok(SearchResult::Upstream { body, status });
        }

        let statuses = match body {
            Value::Object(mut map) => map.remove("statuses").unwrap_or(Value::Null),
            other => {
                return Err(ServiceError::new(
                    TweetServiceError::UnexpectedPayload,
                    anyhow::anyhow!("expected a search object, got {}", kind(&other)),
                ))
            }
        };

        Ok(SearchResult::Tweets(format_tweets(raw_tweets(statuses)?)))
    }

    // The timeline endpoint answers with a bare array rather than a
    // `statuses` wrapper like search does.
    pub async fn get_tweets_by_user(&self, username: &str, limit: u32) -> Result<SearchResult> {
        let (body, status) = self.tweet_repo.user_timeline(username, limit).await?;
        if status != http::StatusCode::OK {
            return Ok(SearchResult::Upstream { body, status });
        }

        Ok(SearchResult::Tweets(format_tweets(raw_tweets(body)?)))
    }
}

// Only the list itself has to be well formed. An entry that is not an
// object is formatted from defaults so the output keeps the input length.
fn raw_tweets(value: Value) -> Result<Vec<RawTweet>> {
    let items = match value {
        Value::Null => return Ok(vec![]),
        Value::Array(items) => items,
        other => {
            return Err(ServiceError::new(
                TweetServiceError::UnexpectedPayload,
                anyhow::anyhow!("expected a list of tweets, got {}", kind(&other)),
            ))
        }
    };

    Ok(items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|err| {
                tracing::debug!(%err, "tweet entry is not an object");
                RawTweet::default()
            })
        })
        .collect())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct StubRepository {
        response: UpstreamResponse,
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl StubRepository {
        fn new(body: Value, status: u16) -> Arc<Self> {
            Arc::new(Self {
                response: (body, http::StatusCode::from_u16(status).unwrap()),
                calls: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl ITweetRepository for StubRepository {
        async fn search_by_hashtag(&self, hashtag: &str, limit: u32) -> Result<UpstreamResponse> {
            self.calls.lock().unwrap().push((hashtag.to_string(), limit));
            Ok(self.response.clone())
        }

        async fn user_timeline(&self, username: &str, limit: u32) -> Result<UpstreamResponse> {
            self.calls.lock().unwrap().push((username.to_string(), limit));
            Ok(self.response.clone())
        }
    }

    fn tweets(n: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| {
                    json!({
                        "text": format!("test-{}", i),
                        "favorite_count": i,
                        "entities": { "hashtags": [{ "text": format!("hashtag{}", i) }] },
                        "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                        "user": { "name": format!("name-{}", i), "screen_name": format!("{}", i), "id": i }
                    })
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn it_should_format_hashtag_statuses() {
        let repo = StubRepository::new(json!({ "statuses": tweets(3), "search_metadata": {} }), 200);
        let service = TweetService::new(repo.clone());

        let result = service.get_tweets_by_hashtag("fifa", 3).await.unwrap();
        assert_eq!(result.status(), http::StatusCode::OK);
        match result {
            SearchResult::Tweets(tweets) => {
                assert_eq!(tweets.len(), 3);
                assert_eq!(tweets[2].text, "test-2");
                assert_eq!(tweets[2].hashtags, vec!["#hashtag2".to_string()]);
                assert_eq!(tweets[2].account.href, "/2");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(*repo.calls.lock().unwrap(), vec![("fifa".to_string(), 3)]);
    }

    #[tokio::test]
    async fn it_should_return_empty_list_for_empty_statuses() {
        let service = TweetService::new(StubRepository::new(json!({ "statuses": [] }), 200));
        let result = service.get_tweets_by_hashtag("fifa", DEFAULT_LIMIT).await.unwrap();
        assert_eq!(result, SearchResult::Tweets(vec![]));
    }

    #[tokio::test]
    async fn it_should_default_missing_statuses_to_empty() {
        let service = TweetService::new(StubRepository::new(json!({}), 200));
        let result = service.get_tweets_by_hashtag("fifa", DEFAULT_LIMIT).await.unwrap();
        assert_eq!(result, SearchResult::Tweets(vec![]));
    }

    #[tokio::test]
    async fn it_should_not_format_hashtag_errors() {
        let errors = json!({ "errors": [{ "code": 195, "message": "Missing or invalid url parameter." }] });
        let service = TweetService::new(StubRepository::new(errors.clone(), 403));

        let result = service.get_tweets_by_hashtag("@", DEFAULT_LIMIT).await.unwrap();
        assert_eq!(
            result,
            SearchResult::Upstream {
                body: errors,
                status: http::StatusCode::FORBIDDEN,
            }
        );
    }

    #[tokio::test]
    async fn it_should_format_user_timeline_from_top_level_array() {
        let repo = StubRepository::new(tweets(10), 200);
        let service = TweetService::new(repo.clone());

        let result = service.get_tweets_by_user("realdonaldtrump", 10).await.unwrap();
        match result {
            SearchResult::Tweets(tweets) => assert_eq!(tweets.len(), 10),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            *repo.calls.lock().unwrap(),
            vec![("realdonaldtrump".to_string(), 10)]
        );
    }

    #[tokio::test]
    async fn it_should_not_format_user_errors() {
        let errors = json!({ "errors": [{ "code": 34, "message": "Sorry, that page does not exist." }] });
        let service = TweetService::new(StubRepository::new(errors.clone(), 404));

        let result = service.get_tweets_by_user("xsolnine", 10).await.unwrap();
        assert_eq!(result.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(
            result,
            SearchResult::Upstream {
                body: errors,
                status: http::StatusCode::NOT_FOUND,
            }
        );
    }

    #[tokio::test]
    async fn it_should_default_mistyped_fields_instead_of_failing() {
        let body = json!([
            { "text": "ok", "favorite_count": 3 },
            { "text": "bad", "favorite_count": "3" },
            { "text": "worse", "user": { "name": 5 }, "entities": { "hashtags": [null, { "text": "fifa" }] } },
            null
        ]);
        let service = TweetService::new(StubRepository::new(body, 200));

        let result = service.get_tweets_by_user("rustlang", 10).await.unwrap();
        match result {
            SearchResult::Tweets(tweets) => {
                assert_eq!(tweets.len(), 4);
                assert_eq!(tweets[0].likes, 3);
                assert_eq!(tweets[1].text, "bad");
                assert_eq!(tweets[1].likes, 0);
                assert_eq!(tweets[2].account.fullname, "");
                assert_eq!(tweets[2].hashtags, vec!["#fifa".to_string()]);
                assert_eq!(tweets[3].text, "");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let service = TweetService::new(StubRepository::new(
            json!({ "statuses": [{ "text": "ok" }, { "retweet_count": "many" }] }),
            200,
        ));
        let result = service.get_tweets_by_hashtag("fifa", 10).await.unwrap();
        assert_eq!(result.status(), http::StatusCode::OK);
        match result {
            SearchResult::Tweets(tweets) => assert_eq!(tweets.len(), 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn it_should_reject_unexpected_success_payloads() {
        let service = TweetService::new(StubRepository::new(json!({ "statuses": [] }), 200));
        let err = service.get_tweets_by_user("rustlang", 10).await.unwrap_err();
        assert!(err.is_error_of(TweetServiceError::UnexpectedPayload));

        let service = TweetService::new(StubRepository::new(json!([]), 200));
        let err = service.get_tweets_by_hashtag("fifa", 10).await.unwrap_err();
        assert!(err.is_error_of(TweetServiceError::UnexpectedPayload));
        assert_eq!(err.status_code(), http::StatusCode::BAD_GATEWAY);

        let service = TweetService::new(StubRepository::new(json!({ "statuses": "none" }), 200));
        let err = service.get_tweets_by_hashtag("fifa", 10).await.unwrap_err();
        assert!(err.is_error_of(TweetServiceError::UnexpectedPayload));
    }
}
