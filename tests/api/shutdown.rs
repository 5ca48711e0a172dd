use std::{sync::Arc, time::Duration};

use anyhow::Result;
use mailwave::model::MemStore;
use reqwest::StatusCode;
use tokio::sync::oneshot;

use crate::helpers::{build_test_app, spawn_with_signal};

#[tokio::test]
async fn shutdown_stops_serving_and_closes_store() -> Result<()> {
    let store = Arc::new(MemStore::new());
    let (app, addr) = build_test_app(store.clone()).await?;

    let (tx, rx) = oneshot::channel::<()>();
    let server = spawn_with_signal(app, async {
        let _ = rx.await;
    });

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/api/health"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!store.is_closed());

    let _ = tx.send(());
    tokio::time::timeout(Duration::from_secs(5), server).await???;

    assert!(store.is_closed());

    // Nothing is listening anymore.
    let fresh_client = reqwest::Client::new();
    assert!(fresh_client
        .get(format!("http://{addr}/api/health"))
        .send()
        .await
        .is_err());

    Ok(())
}
