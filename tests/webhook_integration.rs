//! Integration tests for the webhook server.
//!
//! Each test spins up a mock GroupMe API and the bot router on random ports,
//! then drives the bot over real HTTP with reqwest.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{TimeZone, Weekday};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use bingo_bot::channels::GroupMeChannel;
use bingo_bot::config::{GroupMeConfig, TriggerConfig};
use bingo_bot::error::RenderError;
use bingo_bot::pipeline::{MessageProcessor, ProcessorSettings, RulesEngine};
use bingo_bot::render::{CardRenderer, PNG_SIGNATURE};
use bingo_bot::routes::{HEALTH_TEXT, bot_routes};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

const TOKEN: &str = "secret-token";
const BOT_ID: &str = "bot-123";
const LINK_USER: &str = "777";
const PICTURE_URL: &str = "https://i.groupme.com/1024x1024.png.abc";

/// Renderer that returns a fixed PNG and remembers the last HTML it saw.
#[derive(Default)]
struct StubRenderer {
    last_html: Mutex<Option<String>>,
}

#[async_trait]
impl CardRenderer for StubRenderer {
    async fn render_png(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        *self.last_html.lock().unwrap() = Some(html.to_string());
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(b"stub");
        Ok(png)
    }
}

/// What the mock GroupMe API has received.
#[derive(Default)]
struct MockGroupMe {
    fail_upload: bool,
    uploads: Mutex<Vec<(Option<String>, Vec<u8>)>>,
    posts: Mutex<Vec<Value>>,
}

async fn mock_upload(
    State(mock): State<Arc<MockGroupMe>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let token = headers
        .get("X-Access-Token")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    mock.uploads.lock().unwrap().push((token, body.to_vec()));

    if mock.fail_upload {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"meta": {"code": 500}})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"payload": {"url": PICTURE_URL, "picture_url": PICTURE_URL}})),
    )
}

async fn mock_post(State(mock): State<Arc<MockGroupMe>>, Json(body): Json<Value>) -> StatusCode {
    mock.posts.lock().unwrap().push(body);
    StatusCode::ACCEPTED
}

/// Start the mock GroupMe API, return its base URL.
async fn start_mock(mock: Arc<MockGroupMe>) -> String {
    let app = Router::new()
        .route("/pictures", post(mock_upload))
        .route("/v3/bots/post", post(mock_post))
        .with_state(mock);
    serve(app).await
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}

struct Harness {
    bot_url: String,
    mock: Arc<MockGroupMe>,
    renderer: Arc<StubRenderer>,
}

async fn start(mock: MockGroupMe) -> Harness {
    let mock = Arc::new(mock);
    let groupme_url = start_mock(Arc::clone(&mock)).await;

    let chat = GroupMeChannel::new(GroupMeConfig {
        access_token: SecretString::from(TOKEN),
        bot_id: BOT_ID.into(),
        api_url: groupme_url.clone(),
        image_url: groupme_url,
    });

    let triggers = TriggerConfig {
        call_phrase: "Bingo me".into(),
        link_user_id: LINK_USER.into(),
        link_callwords: vec!["send".into()],
        link_weekday: Weekday::Wed,
        timezone: chrono_tz::America::Chicago,
        keeper_call_phrase: Some("keepers?".into()),
    };

    let renderer = Arc::new(StubRenderer::default());
    let processor = MessageProcessor::new(
        RulesEngine::new(triggers),
        ProcessorSettings {
            terms: ('A'..='Z').map(|c| c.to_string()).collect(),
            free_space: "FREE SPACE".into(),
            link_responses: vec!["https://zoom.us/j/1".into(), "https://zoom.us/j/2".into()],
            keeper_response: "The keepers are Ann and Bo.".into(),
        },
        renderer.clone(),
        Arc::new(chat),
    );

    let bot_url = serve(bot_routes(Arc::new(processor))).await;
    Harness {
        bot_url,
        mock,
        renderer,
    }
}

async fn callback(h: &Harness, body: Value) -> (StatusCode, String) {
    let resp = reqwest::Client::new()
        .post(format!("{}/", h.bot_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.text().await.unwrap())
}

fn wednesday_noon_chicago() -> i64 {
    chrono_tz::America::Chicago
        .with_ymd_and_hms(2024, 5, 15, 12, 0, 0)
        .unwrap()
        .timestamp()
}

#[tokio::test]
async fn health_check_returns_greeting() {
    timeout(TEST_TIMEOUT, async {
        let h = start(MockGroupMe::default()).await;
        let text = reqwest::get(format!("{}/", h.bot_url))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(text, HEALTH_TEXT);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn call_phrase_uploads_and_posts_card() {
    timeout(TEST_TIMEOUT, async {
        let h = start(MockGroupMe::default()).await;

        let (status, text) = callback(
            &h,
            json!({"text": "  BINGO me ", "sender_id": "1", "created_at": 1715792400, "name": "Sam"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Success: photo!");

        let uploads = h.mock.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0.as_deref(), Some(TOKEN));
        assert!(uploads[0].1.starts_with(PNG_SIGNATURE));

        let posts = h.mock.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["bot_id"], BOT_ID);
        assert_eq!(posts[0]["picture_url"], PICTURE_URL);
        assert_eq!(posts[0]["text"], "Here's your bingo card!");

        let html = h.renderer.last_html.lock().unwrap().clone().unwrap();
        assert!(html.contains("<table id=\"bingocard\">"));
        assert_eq!(html.matches("<td>").count(), 25);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn generate_endpoint_runs_pipeline() {
    timeout(TEST_TIMEOUT, async {
        let h = start(MockGroupMe::default()).await;
        let resp = reqwest::get(format!("{}/generate", h.bot_url)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), "Success: photo!");
        assert_eq!(h.mock.posts.lock().unwrap().len(), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn failed_upload_reports_error_and_skips_post() {
    timeout(TEST_TIMEOUT, async {
        let h = start(MockGroupMe {
            fail_upload: true,
            ..Default::default()
        })
        .await;

        let (status, text) = callback(&h, json!({"text": "Bingo me"})).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(text, "There was an error while uploading the image.");
        assert_eq!(h.mock.uploads.lock().unwrap().len(), 1);
        assert!(h.mock.posts.lock().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn link_request_posts_a_configured_response() {
    timeout(TEST_TIMEOUT, async {
        let h = start(MockGroupMe::default()).await;

        let (status, text) = callback(
            &h,
            json!({"text": "Can you SEND the link", "sender_id": LINK_USER, "created_at": wednesday_noon_chicago()}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Success: link!");

        let posts = h.mock.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        let posted = posts[0]["text"].as_str().unwrap();
        assert!(posted == "https://zoom.us/j/1" || posted == "https://zoom.us/j/2");
        assert!(posts[0].get("picture_url").is_none());
        assert!(h.mock.uploads.lock().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn link_request_on_wrong_day_is_ignored() {
    timeout(TEST_TIMEOUT, async {
        let h = start(MockGroupMe::default()).await;

        let friday = wednesday_noon_chicago() + 2 * 24 * 3600;
        let (_, text) = callback(
            &h,
            json!({"text": "send the link", "sender_id": LINK_USER, "created_at": friday}),
        )
        .await;
        assert_eq!(text, "No data to process.");
        assert!(h.mock.posts.lock().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn keeper_phrase_posts_keeper_text() {
    timeout(TEST_TIMEOUT, async {
        let h = start(MockGroupMe::default()).await;

        let (_, text) = callback(&h, json!({"text": "KEEPERS?", "sender_id": "5"})).await;
        assert_eq!(text, "Success: keepers!");

        let posts = h.mock.posts.lock().unwrap();
        assert_eq!(posts[0]["text"], "The keepers are Ann and Bo.");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn call_phrase_with_loosely_typed_fields_still_posts_card() {
    timeout(TEST_TIMEOUT, async {
        let h = start(MockGroupMe::default()).await;

        let (status, text) =
            callback(&h, json!({"text": "Bingo me", "created_at": 1715792400.5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Success: photo!");

        let (status, text) = callback(
            &h,
            json!({"text": "Bingo me", "sender_id": 12345, "created_at": "1715792400"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Success: photo!");

        let (status, text) = callback(&h, json!({"text": null, "sender_id": null})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "No data to process.");

        assert_eq!(h.mock.posts.lock().unwrap().len(), 2);
    })
    .await
    .expect("test timed out");
}
