use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::session::SessionKey;

/// Why a single decode strategy could not turn a token into text.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid percent-encoding: {0}")]
    PercentEncoding(#[source] std::string::FromUtf8Error),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not valid UTF-8: {0}")]
    Utf8(#[source] std::string::FromUtf8Error),
}

/// Failures of the capture flow, each mapped to its own user-facing outcome.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no data received")]
    NoData,

    #[error("could not decode token: {0}")]
    Decode(#[from] DecodeError),

    #[error("decoded payload is not a valid record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not store captured record: {0}")]
    Storage(#[from] SessionError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("value for {name} is {size} bytes, over the {limit} byte cookie limit")]
    TooLarge {
        name: &'static str,
        size: usize,
        limit: usize,
    },

    #[error("failed to serialize {key:?}: {source}")]
    Serialize {
        key: SessionKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored {key:?} could not be decoded")]
    Unreadable { key: SessionKey },

    #[error("stored {key:?} is corrupt: {source}")]
    Corrupt {
        key: SessionKey,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Errors returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields")]
    Validation(Vec<FieldError>),

    /// `detail` is only populated when the server runs in development mode.
    #[error("Internal server error")]
    Internal { detail: Option<String> },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(errors) => ErrorBody {
                success: false,
                message: self.to_string(),
                errors: Some(errors.as_slice()),
                error: None,
            },
            ApiError::Internal { detail } => ErrorBody {
                success: false,
                message: self.to_string(),
                errors: None,
                error: detail.as_deref(),
            },
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
