use crate::error::*;

#[derive(Debug)]
pub enum RepositoryError {
    InvalidCredentials,
    InvalidBody,
}

impl IServiceError for RepositoryError {
    fn error_type(&self) -> String {
        use RepositoryError::*;

        match self {
            InvalidCredentials => "invalid_credentials",
            InvalidBody => "invalid_body",
        }
        .to_string()
    }

    fn status_code(&self) -> http::StatusCode {
        use RepositoryError::*;

        match self {
            InvalidCredentials => http::StatusCode::INTERNAL_SERVER_ERROR,
            InvalidBody => http::StatusCode::BAD_GATEWAY,
        }
    }
}
