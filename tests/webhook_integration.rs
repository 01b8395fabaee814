//! Integration tests for the WhatsApp webhook HTTP surface.
//!
//! Each test builds the full Axum app over an in-memory database and drives
//! it with `tower::ServiceExt::oneshot`, exercising the real form / TwiML
//! contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tokio::time::timeout;
use tower::ServiceExt;

use smartbiz::business::Business;
use smartbiz::config::RouterConfig;
use smartbiz::error::LlmError;
use smartbiz::llm::FallbackResponder;
use smartbiz::store::{Database, LibSqlBackend};
use smartbiz::templates::{FixedSelector, ResponseEngine};
use smartbiz::webhook::{self, MessageRouter};

/// Maximum time any request is allowed to take before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

const FROM: &str = "whatsapp:+2348012345678";
const PHONE: &str = "+2348012345678";

/// Stub fallback (no real API calls).
struct StubFallback;

#[async_trait]
impl FallbackResponder for StubFallback {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn reply(&self, business: &Business, _message: &str) -> Result<String, LlmError> {
        Ok(format!("stub reply for {}", business.name))
    }
}

async fn test_app() -> (Router, Arc<LibSqlBackend>) {
    let db = Arc::new(LibSqlBackend::new_memory().await.unwrap());
    let router = MessageRouter::new(db.clone(), RouterConfig::default())
        .with_engine(ResponseEngine::new(Arc::new(FixedSelector(0))))
        .with_fallback(Arc::new(StubFallback));
    let app = webhook::app(Arc::new(router), db.clone());
    (app, db)
}

/// POST a Twilio-style form and return (status, content-type, body).
async fn post_message(app: &Router, from: &str, body: &str) -> (StatusCode, String, String) {
    let form = format!(
        "From={}&Body={}",
        urlencoding::encode(from),
        urlencoding::encode(body)
    );
    let request = Request::builder()
        .method("POST")
        .uri("/webhook/whatsapp")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    let response = timeout(TEST_TIMEOUT, app.clone().oneshot(request))
        .await
        .expect("request timed out")
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn onboard(app: &Router) {
    for answer in ["hi", "2", "Lagos Food Palace", "C", "N", "2"] {
        let (status, _, _) = post_message(app, FROM, answer).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn first_message_gets_twiml_with_first_question() {
    let (app, _db) = test_app().await;
    let (status, content_type, body) = post_message(&app, FROM, "Hello there").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/xml");
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<Response><Message><Body>"));
    assert!(body.contains("What type of business do you run?"));
}

#[tokio::test]
async fn full_onboarding_then_customer_replies() {
    let (app, db) = test_app().await;
    onboard(&app).await;

    let business = db.get_business(PHONE).await.unwrap().expect("business created");
    assert_eq!(business.name, "Lagos Food Palace");
    assert_eq!(business.product_category, "Fast food");
    assert!(!business.has_delivery);
    assert_eq!(business.hours, "9am - 8pm");

    // Greeting default from the restaurant template.
    let (_, _, body) = post_message(&app, FROM, "Hello").await;
    assert!(body.contains("Welcome to Lagos Food Palace!"));

    // No delivery: pickup-only sentence.
    let (_, _, body) = post_message(&app, FROM, "Can you deliver to Ikeja").await;
    assert!(body.contains("Pickup only at our location."));

    // Nothing matches: stub fallback.
    let (_, _, body) = post_message(&app, FROM, "Is parking available?").await;
    assert!(body.contains("stub reply for Lagos Food Palace"));
}

#[tokio::test]
async fn onboarding_status_endpoint_tracks_progress() {
    let (app, _db) = test_app().await;

    let (status, _) = get_json(&app, "/api/onboarding/%2B2348012345678").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    post_message(&app, FROM, "hi").await;
    post_message(&app, FROM, "1").await;

    let (status, json) = get_json(&app, "/api/onboarding/%2B2348012345678").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["onboarding_completed"], false);
    assert_eq!(json["step"], 2);
    assert_eq!(json["progress"], "📊 Setup Progress: 40% (2/5)");
}

#[tokio::test]
async fn pause_command_silences_customer_replies() {
    let (app, _db) = test_app().await;
    onboard(&app).await;

    let (_, _, body) = post_message(&app, FROM, "PAUSE").await;
    assert!(body.contains("AI Assistant paused."));

    let (_, _, body) = post_message(&app, FROM, "Hello").await;
    assert!(body.contains("We&apos;re temporarily unavailable."));
}

#[tokio::test]
async fn missing_sender_still_gets_error_twiml() {
    let (app, _db) = test_app().await;
    let (status, _, body) = post_message(&app, "", "hello").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Error occurred. Try again."));
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _db) = test_app().await;
    let (status, json) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}
