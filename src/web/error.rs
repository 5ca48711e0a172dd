use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::routes::{PostsError, SubscribeError, SubscribersError};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),
    #[error("subscribers error: {0}")]
    Subscribers(#[from] SubscribersError),
    #[error("posts error: {0}")]
    Posts(#[from] PostsError),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            Error::Subscribe(er) => er.status_code_and_client_error(),
            Error::Subscribers(er) => er.status_code_and_client_error(),
            Error::Posts(er) => er.status_code_and_client_error(),
        }
    }

    /// Name of the innermost error variant, e.g. `AlreadySubscribed`.
    pub fn variant_name(&self) -> &str {
        match self {
            Error::Subscribe(er) => er.as_ref(),
            Error::Subscribers(er) => er.as_ref(),
            Error::Posts(er) => er.as_ref(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the client gets to see. Store failures only ever surface as a generic `Service` message.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("{_0}")]
    Validation(String),
    #[display("{_0}")]
    Conflict(&'static str),
    #[display("{_0}")]
    NotFound(&'static str),
    #[display("{_0}")]
    Service(&'static str),
}

impl ClientError {
    pub fn invalid_body() -> Self {
        ClientError::Validation("Invalid JSON body".to_string())
    }
}
