use crate::domain::service;
use crate::infra;
use crate::repository;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{} must be set", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("invalid listen address {0:?}")]
    InvalidAddr(String, #[source] std::net::AddrParseError),
}

/// OAuth 1.0a secrets used to sign every upstream request.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret_key: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    pub const API_KEY: &'static str = "TWITTER_API_KEY";
    pub const API_SECRET_KEY: &'static str = "TWITTER_API_SECRET_KEY";
    pub const ACCESS_TOKEN: &'static str = "TWITTER_ACCESS_TOKEN";
    pub const ACCESS_TOKEN_SECRET: &'static str = "TWITTER_ACCESS_TOKEN_SECRET";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves all four secrets through `lookup`, reporting every one that
    /// is missing or empty at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = vec![];
        let mut get = |name: &'static str| match lookup(name).filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => {
                missing.push(name);
                String::new()
            }
        };

        let credentials = Credentials {
            api_key: get(Self::API_KEY),
            api_secret_key: get(Self::API_SECRET_KEY),
            access_token: get(Self::ACCESS_TOKEN),
            access_token_secret: get(Self::ACCESS_TOKEN_SECRET),
        };

        if missing.is_empty() {
            Ok(credentials)
        } else {
            Err(ConfigError::MissingCredentials(missing))
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret_key", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub addr: SocketAddr,
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let credentials = Credentials::from_env()?;
        let addr = std::env::var("GETTWEET_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidAddr(addr.clone(), err))?;
        let api_base = std::env::var("TWITTER_API_BASE")
            .ok()
            .filter(|it| !it.is_empty())
            .unwrap_or_else(|| repository::DEFAULT_API_BASE.to_string());

        Ok(Config {
            credentials,
            addr,
            api_base,
        })
    }
}

#[derive(Clone)]
pub struct Infras {
    pub http_client: Arc<infra::HttpClient>,
    pub credentials: Credentials,
    pub api_base: String,
}

pub fn infras(config: &Config) -> Infras {
    Infras {
        http_client: Arc::new(infra::HttpClient::new()),
        credentials: config.credentials.clone(),
        api_base: config.api_base.clone(),
    }
}

#[derive(Clone)]
pub struct Repository {
    pub tweet: Arc<repository::TweetRepository>,
}

pub fn repository(infras: &Infras) -> Repository {
    let tweet = Arc::new(repository::TweetRepository::new(
        infras.http_client.clone(),
        infras.credentials.clone(),
        infras.api_base.clone(),
    ));
    Repository { tweet }
}

#[derive(Clone)]
pub struct Services {
    pub tweet: service::TweetService,
}

#[derive(Clone)]
pub struct AppContext {
    pub services: Services,
}

pub fn new(config: Config) -> AppContext {
    let infras = infras(&config);
    let repository = repository(&infras);
    let services = Services {
        tweet: service::TweetService::new(repository.tweet.clone()),
    };
    AppContext { services }
}
