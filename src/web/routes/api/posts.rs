use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use strum_macros::AsRefStr;
use tracing::info;
use uuid::Uuid;

use crate::{
    model::{self, Post},
    web::{
        types::{DataParsingError, NewPostPayload, PostId, ValidPost},
        ClientError, WebResult,
    },
    AppState,
};

// ###################################
// ->   ERROR
// ###################################
/// Store failures are split per operation since each one reports its own message to the client.
#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum PostsError {
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),
    #[error("post not found: {0}")]
    NotFound(Uuid),

    #[error("failed to create post: {0}")]
    Create(model::Error),
    #[error("failed to list posts: {0}")]
    List(model::Error),
    #[error("failed to fetch post: {0}")]
    Fetch(model::Error),
}

impl PostsError {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use PostsError::*;

        match self {
            Body(_) => (StatusCode::BAD_REQUEST, ClientError::invalid_body()),
            DataParsing(er) => (StatusCode::BAD_REQUEST, ClientError::Validation(er.to_string())),
            NotFound(_) => (StatusCode::NOT_FOUND, ClientError::NotFound("Post not found")),
            Create(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::Service("Failed to create post"),
            ),
            List(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::Service("Failed to fetch posts"),
            ),
            Fetch(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::Service("Failed to fetch post"),
            ),
        }
    }
}

// ###################################
// ->   API
// ###################################
#[tracing::instrument(name = "Creating a post", skip_all)]
pub async fn post_create(
    State(app_state): State<AppState>,
    payload: Result<Json<NewPostPayload>, JsonRejection>,
) -> WebResult<(StatusCode, Json<Post>)> {
    let Json(payload) = payload.map_err(PostsError::Body)?;
    let post = ValidPost::try_from(payload).map_err(PostsError::DataParsing)?;

    let post = Post::new(post);
    app_state
        .model_mgr
        .store()
        .insert_post(&post)
        .await
        .map_err(PostsError::Create)?;

    info!(post_id = %post.id, "New post successfully created.");

    Ok((StatusCode::CREATED, Json(post)))
}

#[tracing::instrument(name = "Listing posts", skip_all)]
pub async fn posts_list(State(app_state): State<AppState>) -> WebResult<Json<Vec<Post>>> {
    let posts = app_state
        .model_mgr
        .store()
        .list_posts()
        .await
        .map_err(PostsError::List)?;

    Ok(Json(posts))
}

#[tracing::instrument(name = "Fetching a post", skip(app_state))]
pub async fn post_fetch(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<Post>> {
    let id = PostId::parse(&id).map_err(PostsError::DataParsing)?;

    let post = app_state
        .model_mgr
        .store()
        .get_post(*id)
        .await
        .map_err(PostsError::Fetch)?
        .ok_or(PostsError::NotFound(*id))?;

    Ok(Json(post))
}
