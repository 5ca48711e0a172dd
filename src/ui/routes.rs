use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    client::SubscribeOutcome,
    model::Post,
    ui::UiState,
};

pub fn routes(ui_state: UiState) -> Router {
    Router::new()
        .route("/", get(home).post(home_subscribe))
        .route("/health-check", get(health_check))
        .with_state(ui_state)
}

#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("tera template render error: {0}")]
    Tera(#[from] tera::Error),
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        error!("{:<12} - {self}", "UI_ERROR");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong, please try again later.",
        )
            .into_response()
    }
}

/// A post the way the page shows it.
#[derive(Debug, Serialize)]
struct PostView {
    title: String,
    content: String,
    author: Option<String>,
    date: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        PostView {
            title: post.title,
            content: post.content,
            author: post.author,
            date: post.created_at.format("%B %-d, %Y").to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    email: String,
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

#[tracing::instrument(name = "ui_home", skip(ui_state))]
pub async fn home(State(ui_state): State<UiState>) -> Result<Html<String>, UiError> {
    render_home(&ui_state, None).await
}

#[tracing::instrument(name = "ui_home_subscribe", skip(ui_state, form))]
pub async fn home_subscribe(
    State(ui_state): State<UiState>,
    Form(form): Form<SubscribeForm>,
) -> Result<Html<String>, UiError> {
    let outcome = ui_state.api_client.subscribe(&form.email).await;
    render_home(&ui_state, Some(outcome)).await
}

async fn render_home(
    ui_state: &UiState,
    outcome: Option<SubscribeOutcome>,
) -> Result<Html<String>, UiError> {
    // A failed fetch still renders the page, just without posts.
    let posts: Vec<PostView> = match ui_state.api_client.list_posts().await {
        Ok(posts) => posts.into_iter().map(PostView::from).collect(),
        Err(er) => {
            warn!("failed to fetch posts: {er}");
            Vec::new()
        }
    };

    let mut ctx = tera::Context::new();
    ctx.insert("posts", &posts);
    if let Some(outcome) = outcome {
        ctx.insert("feedback", outcome.message());
        ctx.insert("feedback_ok", &outcome.is_success());
    }

    let body = ui_state
        .templ_mgr
        .render_html_to_string(&ctx, "home.html")?;

    Ok(Html(body))
}
