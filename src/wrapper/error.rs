use anyhow::Error;
use serde::*;
use std::any::Any;

pub trait IServiceError: Any {
    fn error_type(&self) -> String {
        "internal_server_error".to_string()
    }

    fn status_code(&self) -> http::StatusCode {
        http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[derive(Debug)]
pub struct ServiceError {
    type_id: std::any::TypeId,
    error_type: String,
    status_code: http::StatusCode,
    inner: Error,
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    error_type: String,
    error: String,
}

impl ServiceError {
    pub fn new<E>(err: impl IServiceError, detail: E) -> ServiceError
    where
        Error: From<E>,
    {
        ServiceError {
            type_id: err.type_id(),
            error_type: err.error_type(),
            status_code: err.status_code(),
            inner: From::from(detail),
        }
    }

    pub fn only(err: impl IServiceError) -> ServiceError {
        let message = err.error_type();
        ServiceError {
            type_id: err.type_id(),
            error_type: err.error_type(),
            status_code: err.status_code(),
            inner: Error::msg(message),
        }
    }

    pub fn status_code(&self) -> http::StatusCode {
        self.status_code
    }

    pub fn error_type(&self) -> String {
        self.error_type.clone()
    }

    pub fn is_error_of(&self, err: impl IServiceError) -> bool {
        self.type_id == err.type_id() && self.error_type() == err.error_type()
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_type: self.error_type.clone(),
            error: format!("{:#}", self.inner),
        }
    }

    // 500s never leak the underlying cause
    pub fn to_secure_error_response(&self) -> ErrorResponse {
        if self.status_code == http::StatusCode::INTERNAL_SERVER_ERROR {
            ErrorResponse {
                error_type: self.error_type.clone(),
                error: String::new(),
            }
        } else {
            self.to_error_response()
        }
    }

    pub fn to_http_response(self) -> hyper::Response<hyper::Body> {
        // ErrorResponse only holds strings, so serialization cannot fail
        let body = serde_json::to_vec(&self.to_secure_error_response()).unwrap_or_default();
        let mut response = hyper::Response::new(hyper::Body::from(body));
        *response.status_mut() = self.status_code;
        let headers = response.headers_mut();
        headers.insert(
            hyper::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN,
            http::HeaderValue::from_static("*"),
        );
        response
    }
}

// anyhow::Error can be treated as ServiceError
impl IServiceError for Error {}

// Errors raised while handling an inbound request, before any upstream call.
pub enum GeneralError {
    SerializationError,
    InvalidQuery,
    NotFound,
    MethodNotAllowed,
}

impl GeneralError {
    pub fn serialization_error<E>(detail: E) -> ServiceError
    where
        Error: From<E>,
    {
        ServiceError::new(GeneralError::SerializationError, detail)
    }

    pub fn invalid_query<E>(detail: E) -> ServiceError
    where
        Error: From<E>,
    {
        ServiceError::new(GeneralError::InvalidQuery, detail)
    }
}

impl IServiceError for GeneralError {
    fn error_type(&self) -> String {
        use GeneralError::*;

        match self {
            SerializationError => "serialization_error".to_string(),
            InvalidQuery => "invalid_query".to_string(),
            NotFound => "not_found".to_string(),
            MethodNotAllowed => "method_not_allowed".to_string(),
        }
    }

    fn status_code(&self) -> http::StatusCode {
        use GeneralError::*;

        match self {
            SerializationError => http::StatusCode::INTERNAL_SERVER_ERROR,
            InvalidQuery => http::StatusCode::BAD_REQUEST,
            NotFound => http::StatusCode::NOT_FOUND,
            MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}
