use crate::domain::service::{SearchResult, DEFAULT_LIMIT};
use crate::error::*;
use crate::initializer::Services;
use http::{HeaderValue, Method, StatusCode, Uri};
use hyper::{header, Body, Request, Response};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;

#[derive(Debug, PartialEq)]
enum Route {
    Hashtags(String),
    Users(String),
}

/// Matches `/hashtags/<hashtag>` and `/users/<username>`. The segment is
/// percent-decoded and has to be non-empty without any `/` in it.
fn match_route(path: &str) -> Option<Route> {
    let (resource, segment) = path.strip_prefix('/')?.split_once('/')?;
    let segment = percent_decode_str(segment).decode_utf8().ok()?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }

    match resource {
        "hashtags" => Some(Route::Hashtags(segment.into_owned())),
        "users" => Some(Route::Users(segment.into_owned())),
        _ => None,
    }
}

fn parse_limit(query: Option<&str>) -> Result<u32> {
    let Some(query) = query else {
        return Ok(DEFAULT_LIMIT);
    };

    match url::form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == "limit") {
        None => Ok(DEFAULT_LIMIT),
        Some((_, value)) => value.parse::<u32>().map_err(|err| {
            GeneralError::invalid_query(anyhow::anyhow!(
                "limit must be a non-negative integer, got {:?}: {}",
                value,
                err
            ))
        }),
    }
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

fn search_response(result: SearchResult) -> Result<Response<Body>> {
    let status = result.status();
    let body = match &result {
        SearchResult::Tweets(tweets) => serde_json::to_vec(tweets),
        SearchResult::Upstream { body, .. } => serde_json::to_vec(body),
    }
    .map_err(GeneralError::serialization_error)?;

    Ok(json_response(status, body))
}

async fn dispatch(services: &Services, method: &Method, uri: &Uri) -> Result<Response<Body>> {
    let route = match_route(uri.path()).ok_or_else(|| ServiceError::only(GeneralError::NotFound))?;
    if *method != Method::GET && *method != Method::HEAD {
        return Err(ServiceError::only(GeneralError::MethodNotAllowed));
    }
    let limit = parse_limit(uri.query())?;

    let result = match route {
        Route::Hashtags(hashtag) => services.tweet.get_tweets_by_hashtag(&hashtag, limit).await?,
        Route::Users(username) => services.tweet.get_tweets_by_user(&username, limit).await?,
    };

    search_response(result)
}

/// Entry point handed to hyper. Every outcome, errors included, becomes a
/// JSON response. HEAD is answered like GET with the body left out.
pub async fn route(services: Services, req: Request<Body>) -> std::result::Result<Response<Body>, Infallible> {
    let (parts, _) = req.into_parts();

    let mut response = match dispatch(&services, &parts.method, &parts.uri).await {
        Ok(response) => response,
        Err(err) => {
            if err.status_code().is_server_error() {
                tracing::warn!(error_type = %err.error_type(), error = ?err, "request failed");
            }
            err.to_http_response()
        }
    };
    if parts.method == Method::HEAD {
        *response.body_mut() = Body::empty();
    }

    tracing::info!(
        method = %parts.method,
        path = %parts.uri.path(),
        status = response.status().as_u16(),
        "handled request"
    );

    Ok(response)
}
