//! The client UI, with `wiremock` standing in for the backend.

use std::time::Duration;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use mailwave::{
    model::Post,
    templ_manager::TemplateManager,
    ui::{self, UiApp, UiState},
    ApiClient,
};
use reqwest::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::helpers::{init_test_subscriber, TEST_SOCK_ADDR};

struct TestUi {
    base: String,
    backend: MockServer,
    http_client: reqwest::Client,
}

async fn spawn_ui() -> Result<TestUi> {
    init_test_subscriber();

    let backend = MockServer::start().await;
    let api_client = ApiClient::new(
        format!("{}/api", backend.uri()),
        Duration::from_millis(500),
    )?;
    let ui_state = UiState::new(api_client, TemplateManager::init()?);

    let listener = TcpListener::bind(TEST_SOCK_ADDR).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(ui::serve_with_shutdown(
        UiApp::new(ui_state, listener),
        std::future::pending(),
    ));

    Ok(TestUi {
        base: format!("http://{addr}"),
        backend,
        http_client: reqwest::Client::new(),
    })
}

fn sample_post(title: &str, author: Option<&str>) -> Post {
    Post {
        id: Uuid::new_v4(),
        title: title.into(),
        content: format!("{title} content"),
        author: author.map(Into::into),
        created_at: Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn ui_health_check_ok() -> Result<()> {
    let ui = spawn_ui().await?;

    let res = ui
        .http_client
        .get(format!("{}/health-check", ui.base))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn ui_home_renders_posts() -> Result<()> {
    let ui = spawn_ui().await?;

    let posts = vec![
        sample_post("Newer", Some("Ann")),
        sample_post("Older", None),
    ];
    Mock::given(path("/api/posts"))
        .and(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&posts))
        .expect(1)
        .mount(&ui.backend)
        .await;

    let res = ui.http_client.get(&ui.base).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let page = res.text().await?;

    assert!(page.contains("MailWave"));
    let newer = page.find("Newer").ok_or_else(|| anyhow::anyhow!("missing post"))?;
    let older = page.find("Older").ok_or_else(|| anyhow::anyhow!("missing post"))?;
    assert!(newer < older, "posts keep the backend's order");
    assert!(page.contains("By Ann"));
    assert!(page.contains("March 7, 2024"));
    assert!(!page.contains("No posts yet"));

    Ok(())
}

#[tokio::test]
async fn ui_home_backend_down_shows_empty_list() -> Result<()> {
    let ui = spawn_ui().await?;

    Mock::given(path("/api/posts"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "Failed to fetch posts" })))
        .mount(&ui.backend)
        .await;

    let res = ui.http_client.get(&ui.base).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await?.contains("No posts yet. Check back soon!"));

    Ok(())
}

#[tokio::test]
async fn ui_subscribe_success_message() -> Result<()> {
    let ui = spawn_ui().await?;

    Mock::given(path("/api/subscribe"))
        .and(method("POST"))
        .and(body_json(json!({ "email": "ann@example.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Subscribed successfully",
            "email": "ann@example.com",
        })))
        .expect(1)
        .mount(&ui.backend)
        .await;
    Mock::given(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&ui.backend)
        .await;

    let res = ui
        .http_client
        .post(&ui.base)
        .form(&[("email", "ann@example.com")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await?.contains("Successfully subscribed!"));

    Ok(())
}

#[tokio::test]
async fn ui_subscribe_shows_server_error() -> Result<()> {
    let ui = spawn_ui().await?;

    Mock::given(path("/api/subscribe"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Email already subscribed" })),
        )
        .expect(1)
        .mount(&ui.backend)
        .await;
    Mock::given(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&ui.backend)
        .await;

    let res = ui
        .http_client
        .post(&ui.base)
        .form(&[("email", "ann@example.com")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let page = res.text().await?;
    assert!(page.contains("Email already subscribed"));
    assert!(!page.contains("Successfully subscribed!"));

    Ok(())
}
