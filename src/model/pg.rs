use sqlx::{
    postgres::{PgDatabaseError, PgPoolOptions, PgQueryResult},
    PgPool,
};
use tracing::{info, Instrument};
use uuid::Uuid;

use super::{Error, Post, Result, Store, Subscriber};
use crate::config::DbConfig;

/// SQLSTATE raised by Postgres when a UNIQUE constraint is violated.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone, Debug)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn init(db_config: &DbConfig) -> Result<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let db_pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(db_config.acquire_timeout())
            .connect_with(db_config.connection_options())
            .await
            .map_err(|ex| Error::FailToCreatePool(ex.to_string()))?;

        Ok(Self::from_pool(db_pool))
    }

    pub fn from_pool(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<()> {
        let q_span = tracing::info_span!("Adding subscriber to the database");
        let query_result = sqlx::query(
            r#"
            INSERT INTO subscribers (id, email, subscribed_at)
            VALUES ($1, $2, $3)
        "#,
        )
        .bind(subscriber.id)
        .bind(&subscriber.email)
        .bind(subscriber.subscribed_at)
        .execute(&self.db)
        .instrument(q_span)
        .await;

        unique_or_conflict(query_result)
    }

    async fn list_subscribers(&self) -> Result<Vec<Subscriber>> {
        let subscribers = sqlx::query_as::<_, Subscriber>(
            r#"
            SELECT id, email, subscribed_at FROM subscribers
            ORDER BY subscribed_at DESC
        "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(subscribers)
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        let q_span = tracing::info_span!("Adding post to the database");
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, author, created_at)
            VALUES ($1, $2, $3, $4, $5)
        "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author.as_deref())
        .bind(post.created_at)
        .execute(&self.db)
        .instrument(q_span)
        .await?;

        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, author, created_at FROM posts
            ORDER BY created_at DESC
        "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(posts)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, author, created_at FROM posts
            WHERE id = $1
        "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(post)
    }

    async fn close(&self) {
        info!("{:<20} - Closing the DB pool", "close_db");
        self.db.close().await;
    }
}

// ###################################
// ->   HELPERS
// ###################################

/// Turns a unique violation into `Error::Conflict`, propagates every other error.
fn unique_or_conflict(
    query_result: std::result::Result<PgQueryResult, sqlx::Error>,
) -> Result<()> {
    let is_unique_violation_err = |er: Option<&PgDatabaseError>| {
        er.is_some_and(|er| er.code() == UNIQUE_VIOLATION)
    };

    match query_result {
        Err(sqlx::Error::Database(er))
            if is_unique_violation_err(er.try_downcast_ref::<PgDatabaseError>()) =>
        {
            Err(Error::Conflict)
        }
        Err(error) => Err(error.into()),
        Ok(_) => Ok(()),
    }
}
