//! Shared setup for the integration tests.
//!
//! Every test gets its own server on a random port, backed by a fresh `MemStore`.

use std::{
    future::Future,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, OnceLock},
};

use anyhow::Result;
use mailwave::{
    init_dbg_tracing,
    model::{self, MemStore, ModelManager, Post, Store, Subscriber},
    App, AppState,
};
use serde_json::Value;
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::info;
use uuid::Uuid;

/// Trying to bind port 0 will trigger an OS scan for an available port
/// which will then be bound to the application.
pub const TEST_SOCK_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);

pub fn init_test_subscriber() {
    static SUBSCRIBER: OnceLock<()> = OnceLock::new();
    SUBSCRIBER.get_or_init(|| {
        if std::env::var("TEST_LOG").is_ok() {
            init_dbg_tracing();
        }
    });
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub http_client: reqwest::Client,
    pub store: Arc<dyn Store>,
}

impl TestApp {
    /// Serves the app on a random port, backed by an empty `MemStore`.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_store(Arc::new(MemStore::new())).await
    }

    /// Serves the app with a store whose every operation fails.
    pub async fn spawn_failing() -> Result<Self> {
        Self::spawn_with_store(Arc::new(FailingStore)).await
    }

    pub async fn spawn_with_store(store: Arc<dyn Store>) -> Result<Self> {
        let (app, addr) = build_test_app(store.clone()).await?;
        tokio::spawn(mailwave::serve_with_shutdown(app, std::future::pending()));

        Ok(TestApp {
            addr,
            http_client: reqwest::Client::new(),
            store,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}/api{path}", self.addr)
    }

    pub async fn post_subscribe(&self, body: &Value) -> Result<reqwest::Response> {
        let res = self
            .http_client
            .post(self.url("/subscribe"))
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn get_subscribers(&self) -> Result<reqwest::Response> {
        let res = self.http_client.get(self.url("/subscribers")).send().await?;
        Ok(res)
    }

    pub async fn post_posts(&self, body: &Value) -> Result<reqwest::Response> {
        let res = self
            .http_client
            .post(self.url("/posts"))
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn get_posts(&self) -> Result<reqwest::Response> {
        let res = self.http_client.get(self.url("/posts")).send().await?;
        Ok(res)
    }

    pub async fn get_post(&self, id: &str) -> Result<reqwest::Response> {
        let res = self
            .http_client
            .get(self.url(&format!("/posts/{id}")))
            .send()
            .await?;
        Ok(res)
    }
}

/// Binds a listener and builds the `App` without serving it.
pub async fn build_test_app(store: Arc<dyn Store>) -> Result<(App, SocketAddr)> {
    init_test_subscriber();

    let listener = TcpListener::bind(TEST_SOCK_ADDR).await?;
    let addr = listener.local_addr()?;
    info!("Listening on {addr}");

    let app_state = AppState::new(ModelManager::from_arc(store));
    Ok((App::new(app_state, listener), addr))
}

/// Serves `app` until `signal` resolves, in a separate task.
pub fn spawn_with_signal<F>(app: App, signal: F) -> JoinHandle<mailwave::Result<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(mailwave::serve_with_shutdown(app, signal))
}

/// Reads the `{"error": ...}` message out of an error response.
pub async fn error_message(res: reqwest::Response) -> Result<String> {
    let body: Value = res.json().await?;
    let msg = body["error"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no error message in {body}"))?
        .to_string();
    Ok(msg)
}

/// A store that is always unavailable.
#[derive(Debug)]
pub struct FailingStore;

fn unavailable() -> model::Error {
    model::Error::Sqlx(sqlx::Error::PoolTimedOut)
}

#[async_trait::async_trait]
impl Store for FailingStore {
    async fn insert_subscriber(&self, _subscriber: &Subscriber) -> model::Result<()> {
        Err(unavailable())
    }
    async fn list_subscribers(&self) -> model::Result<Vec<Subscriber>> {
        Err(unavailable())
    }
    async fn insert_post(&self, _post: &Post) -> model::Result<()> {
        Err(unavailable())
    }
    async fn list_posts(&self) -> model::Result<Vec<Post>> {
        Err(unavailable())
    }
    async fn get_post(&self, _id: Uuid) -> model::Result<Option<Post>> {
        Err(unavailable())
    }
    async fn close(&self) {}
}
