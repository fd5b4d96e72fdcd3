use super::AccountID;
use chrono::DateTime;
use serde::*;

/// Layout of `created_at` in v1.1 payloads, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
const UPSTREAM_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Layout of the formatted `date`, e.g. `8:19 PM - 10 Oct 2018`.
const DISPLAY_DATE_FORMAT: &str = "%-I:%-M %p - %-d %b %Y";

/// Tweet as returned by the upstream search and timeline endpoints.
///
/// Only the fields the formatter reads are kept. All of them are optional:
/// a value that is missing, `null` or of an unexpected type falls back to
/// its default when formatted.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTweet {
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub favorite_count: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub reply_count: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub retweet_count: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub entities: Option<RawEntities>,
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub user: Option<RawUser>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawEntities {
    #[serde(deserialize_with = "lenient_list")]
    pub hashtags: Option<Vec<RawHashtag>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawHashtag {
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawUser {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub screen_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub id: Option<u64>,
}

// Yields `None` instead of failing when the value does not fit `T`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// Keeps the entries that fit `T` and drops the rest (`null`, strings, ...).
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: de::DeserializeOwned,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]

pub struct FormattedTweet {
    pub text: String,
    pub likes: u64,
    pub replies: u64,
    pub retweets: u64,
    pub hashtags: Vec<String>,
    pub date: String,
    pub account: Account,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Account {
    pub fullname: String,
    pub href: String,
    pub id: AccountID,
}

impl From<RawTweet> for FormattedTweet {
    fn from(tweet: RawTweet) -> Self {
        let hashtags = tweet
            .entities
            .and_then(|entities| entities.hashtags)
            .unwrap_or_default()
            .into_iter()
            .map(|hashtag| format!("#{}", hashtag.text.unwrap_or_default()))
            .collect();
        let user = tweet.user.unwrap_or_default();

        FormattedTweet {
            text: tweet.text.unwrap_or_default(),
            likes: tweet.favorite_count.unwrap_or(0),
            replies: tweet.reply_count.unwrap_or(0),
            retweets: tweet.retweet_count.unwrap_or(0),
            hashtags,
            date: tweet
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
            account: Account {
                fullname: user.name.unwrap_or_default(),
                href: format!("/{}", user.screen_name.unwrap_or_default()),
                id: AccountID::from(user.id),
            },
        }
    }
}

/// Reformats an upstream `created_at` timestamp for display.
///
/// The offset carried by the timestamp is kept as-is. Returns an empty
/// string when the input does not match the upstream layout.
pub fn format_date(created_at: &str) -> String {
    match DateTime::parse_from_str(created_at, UPSTREAM_DATE_FORMAT) {
        Ok(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(err) => {
            tracing::debug!(%created_at, %err, "unparsable created_at");
            String::new()
        }
    }
}

pub fn format_tweets(tweets: Vec<RawTweet>) -> Vec<FormattedTweet> {
    tweets.into_iter().map(FormattedTweet::from).collect()
}
