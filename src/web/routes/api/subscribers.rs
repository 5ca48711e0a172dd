use axum::{extract::State, http::StatusCode, Json};
use strum_macros::AsRefStr;

use crate::{
    model::{self, Subscriber},
    web::{ClientError, WebResult},
    AppState,
};

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum SubscribersError {
    #[error("failed to list subscribers: {0}")]
    List(#[from] model::Error),
}

impl SubscribersError {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            SubscribersError::List(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::Service("Failed to fetch subscribers"),
            ),
        }
    }
}

#[tracing::instrument(name = "Listing subscribers", skip_all)]
pub async fn subscribers(State(app_state): State<AppState>) -> WebResult<Json<Vec<Subscriber>>> {
    let subscribers = app_state
        .model_mgr
        .store()
        .list_subscribers()
        .await
        .map_err(SubscribersError::List)?;

    Ok(Json(subscribers))
}
