use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use uuid::Uuid;

use super::{Error, Post, Result, Store, Subscriber};

/// A `Store` that keeps both collections in memory.
/// Each operation holds the lock for its whole duration, which makes the email uniqueness
/// check and the insert a single atomic step.
#[derive(Debug, Default)]
pub struct MemStore {
    collections: Mutex<Collections>,
    closed: AtomicBool,
}

#[derive(Debug, Default)]
struct Collections {
    subscribers: Vec<Subscriber>,
    posts: Vec<Post>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once `Store::close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn collections(&self) -> MutexGuard<'_, Collections> {
        // Nothing panics while holding the lock, but don't take the store down if it did.
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Newest first. Records created in the same instant come out in reverse insertion order.
fn newest_first<T: Clone, K: Ord>(records: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut records: Vec<T> = records.iter().rev().cloned().collect();
    records.sort_by(|a, b| key(b).cmp(&key(a)));
    records
}

#[async_trait::async_trait]
impl Store for MemStore {
    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<()> {
        let mut collections = self.collections();
        if collections
            .subscribers
            .iter()
            .any(|s| s.email == subscriber.email)
        {
            return Err(Error::Conflict);
        }
        collections.subscribers.push(subscriber.clone());

        Ok(())
    }

    async fn list_subscribers(&self) -> Result<Vec<Subscriber>> {
        let collections = self.collections();
        Ok(newest_first(&collections.subscribers, |s| s.subscribed_at))
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        self.collections().posts.push(post.clone());
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let collections = self.collections();
        Ok(newest_first(&collections.posts, |p| p.created_at))
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        let collections = self.collections();
        Ok(collections.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
