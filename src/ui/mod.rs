//! The client UI: a single server rendered page that lists posts and takes newsletter sign-ups.
//!
//! It only ever talks to the backend through `ApiClient`.

mod routes;

pub use routes::{routes, UiError};

use std::{future::Future, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    app::shutdown_signal, client::ApiClient, config::UiConfig, templ_manager::TemplateManager,
    Result,
};

pub struct UiApp {
    pub ui_state: UiState,
    pub listener: TcpListener,
}

impl UiApp {
    pub fn new(ui_state: UiState, listener: TcpListener) -> Self {
        UiApp { ui_state, listener }
    }

    pub async fn build_from_config(config: &UiConfig) -> Result<Self> {
        let api_client = ApiClient::new(&config.api_base_url, config.timeout())?;
        let templ_mgr = TemplateManager::init()?;
        let ui_state = UiState::new(api_client, templ_mgr);

        let listener = TcpListener::bind(config.socket_addr()).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "UI listening on:", addr);

        Ok(UiApp::new(ui_state, listener))
    }
}

pub struct UiInternalState {
    pub api_client: ApiClient,
    pub templ_mgr: TemplateManager,
}

/// Shared by all UI handlers, cloned per request.
#[derive(Clone, Deref)]
pub struct UiState(Arc<UiInternalState>);

impl UiState {
    pub fn new(api_client: ApiClient, templ_mgr: TemplateManager) -> Self {
        UiState(Arc::new(UiInternalState {
            api_client,
            templ_mgr,
        }))
    }
}

/// Serves the UI until SIGTERM or Ctrl-C arrives.
pub async fn serve(app: UiApp) -> Result<()> {
    serve_with_shutdown(app, shutdown_signal()).await
}

pub async fn serve_with_shutdown<F>(app: UiApp, signal: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let UiApp { ui_state, listener } = app;

    let router = routes(ui_state).layer(TraceLayer::new_for_http());

    axum::serve(listener, router)
        .with_graceful_shutdown(signal)
        .await?;
    info!("{:<20} - UI server closed", "serve");

    Ok(())
}
