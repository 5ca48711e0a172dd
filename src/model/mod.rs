//! Persistence for subscribers and posts.
//!
//! Handlers never talk to a database directly. They go through the `ModelManager`, a cheaply
//! cloneable handle to a `Store`. `PgStore` is the production store, `MemStore` keeps everything
//! in memory and is what the tests run against.

mod mem;
mod pg;

pub use mem::MemStore;
pub use pg::PgStore;

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    config::DbConfig,
    web::types::{ValidEmail, ValidPost},
};

// ###################################
// ->   RECORDS
// ###################################
/// The current time at the precision Postgres `timestamptz` keeps, so a freshly built record
/// equals the one read back from the store.
fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A newsletter sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

impl Subscriber {
    pub fn new(email: ValidEmail) -> Self {
        Subscriber {
            id: Uuid::new_v4(),
            email: email.into(),
            subscribed_at: stored_now(),
        }
    }
}

/// A published article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(post: ValidPost) -> Self {
        let ValidPost {
            title,
            content,
            author,
        } = post;

        Post {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            author,
            created_at: stored_now(),
        }
    }
}

// ###################################
// ->   STORE
// ###################################
/// The document store holding the `subscribers` and `posts` collections.
///
/// Implementations must reject a subscriber whose email is already stored with
/// `Error::Conflict`, atomically, so concurrent inserts of the same email let exactly one through.
/// Listings are ordered newest first.
#[async_trait::async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<()>;
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>>;

    async fn insert_post(&self, post: &Post) -> Result<()>;
    async fn list_posts(&self) -> Result<Vec<Post>>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>>;

    /// Releases the underlying connections. Called once, after the server stopped serving.
    async fn close(&self);
}

#[derive(Clone, Debug)]
pub struct ModelManager {
    store: Arc<dyn Store>,
}

impl ModelManager {
    /// Connects to Postgres and, if configured to, runs the migrations.
    pub async fn init(db_config: &DbConfig) -> Result<Self> {
        let store = PgStore::init(db_config).await?;
        if db_config.migrate_on_startup {
            info!("{:<20} - Running migrations", "init_db");
            store.migrate().await?;
        }

        Ok(Self::new(store))
    }

    pub fn new(store: impl Store + 'static) -> Self {
        ModelManager {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<dyn Store>) -> Self {
        ModelManager { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("record violates a uniqueness constraint")]
    Conflict,
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(String),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}
