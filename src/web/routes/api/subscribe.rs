use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::info;

use crate::{
    model::{self, Subscriber},
    web::{
        types::{DataParsingError, SubscribePayload, ValidEmail},
        ClientError, WebResult,
    },
    AppState,
};

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum SubscribeError {
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),
    #[error("email is already subscribed")]
    AlreadySubscribed,
    #[error("model error: {0}")]
    Model(model::Error),
}

impl From<model::Error> for SubscribeError {
    fn from(value: model::Error) -> Self {
        match value {
            model::Error::Conflict => SubscribeError::AlreadySubscribed,
            er => SubscribeError::Model(er),
        }
    }
}

impl SubscribeError {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            SubscribeError::Body(_) => (StatusCode::BAD_REQUEST, ClientError::invalid_body()),
            SubscribeError::DataParsing(er) => {
                (StatusCode::BAD_REQUEST, ClientError::Validation(er.to_string()))
            }
            SubscribeError::AlreadySubscribed => (
                StatusCode::BAD_REQUEST,
                ClientError::Conflict("Email already subscribed"),
            ),
            SubscribeError::Model(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::Service("Subscription failed"),
            ),
        }
    }
}

// ###################################
// ->   API
// ###################################
#[derive(Debug, Serialize)]
pub struct Subscribed {
    message: &'static str,
    email: String,
}

#[tracing::instrument(name = "Saving new subscriber to the database", skip_all)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<SubscribePayload>, JsonRejection>,
) -> WebResult<(StatusCode, Json<Subscribed>)> {
    let Json(payload) = payload.map_err(SubscribeError::Body)?;
    let email = ValidEmail::try_from(payload).map_err(SubscribeError::DataParsing)?;

    let subscriber = Subscriber::new(email);
    app_state
        .model_mgr
        .store()
        .insert_subscriber(&subscriber)
        .await
        .map_err(SubscribeError::from)?;

    info!(subscriber_id = %subscriber.id, "New subscriber successfully added to the list.");

    Ok((
        StatusCode::CREATED,
        Json(Subscribed {
            message: "Subscribed successfully",
            email: subscriber.email,
        }),
    ))
}
