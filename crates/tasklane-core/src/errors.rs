use std::fmt;
use std::str::FromStr;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use crate::response::ErrorBody;

/// Machine-readable error codes written next to the human message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    RequestInvalid,
    Unauthorized,
    NotFound,
    SystemError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 4] = [
        ErrorCode::RequestInvalid,
        ErrorCode::Unauthorized,
        ErrorCode::NotFound,
        ErrorCode::SystemError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::RequestInvalid => "ERR_REQUEST_INVALID",
            ErrorCode::Unauthorized => "ERR_UNAUTHORIZED",
            ErrorCode::NotFound => "ERR_NOT_FOUND",
            ErrorCode::SystemError => "ERR_SYSTEM_ERROR",
        }
    }

    /// Human text used when an error carries no message of its own.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::RequestInvalid => "Invalid request",
            ErrorCode::Unauthorized => "Authorization failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::SystemError => "Internal Server Error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::RequestInvalid => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::SystemError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
            StatusCode::NOT_FOUND => ErrorCode::NotFound,
            s if s.is_client_error() => ErrorCode::RequestInvalid,
            _ => ErrorCode::SystemError,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub error: Error,
    pub details: Vec<String>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code: ErrorCode::from_status(status),
            error: err.into(),
            details: Vec::new(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    /// Builds an error from a code alone, using the code's status and default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            status: code.status(),
            code,
            error: anyhow::anyhow!(code.default_message()),
            details: Vec::new(),
        }
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }

    /// Rejects a request body that failed `validator` checks, one detail per field error.
    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        details.sort();

        Self::from_code(ErrorCode::RequestInvalid).with_details(details)
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = ?self.error, code = %self.code, "Request failed");
        }

        let body = Json(ErrorBody {
            error: self.error.to_string(),
            code: Some(self.code.as_str().to_string()),
            details: self.details,
        });

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
