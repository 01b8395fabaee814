//! Twilio WhatsApp webhook endpoint.
//!
//! Twilio posts `application/x-www-form-urlencoded` with `From` and `Body`
//! and expects TwiML back. The endpoint always answers 200 so Twilio never
//! retries or drops the conversation.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use super::router::{ERROR_REPLY, MessageRouter};
use crate::error::ChannelError;

/// Inbound form fields we use from a Twilio webhook.
#[derive(Debug, Deserialize)]
pub struct TwilioInbound {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
}

/// Strip the `whatsapp:` channel prefix from a Twilio address.
pub fn normalize_phone(from: &str) -> &str {
    let from = from.trim();
    from.strip_prefix("whatsapp:").unwrap_or(from).trim()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// TwiML document carrying a single reply message.
pub fn twiml(reply: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message><Body>{}</Body></Message></Response>",
        escape_xml(reply)
    )
}

fn twiml_response(reply: &str) -> Response {
    ([(header::CONTENT_TYPE, "text/xml")], twiml(reply)).into_response()
}

/// Validate a decoded webhook form into `(phone, body)`.
fn parse_inbound(
    form: Result<Form<TwilioInbound>, FormRejection>,
) -> Result<(String, String), ChannelError> {
    let Form(inbound) = form.map_err(|e| ChannelError::InvalidMessage(e.body_text()))?;
    let phone = normalize_phone(&inbound.from);
    if phone.is_empty() {
        return Err(ChannelError::InvalidMessage("missing From".to_string()));
    }
    Ok((phone.to_string(), inbound.body))
}

/// POST /webhook/whatsapp
async fn whatsapp_webhook(
    State(router): State<Arc<MessageRouter>>,
    form: Result<Form<TwilioInbound>, FormRejection>,
) -> Response {
    let (phone, body) = match parse_inbound(form) {
        Ok(inbound) => inbound,
        Err(e) => {
            warn!(error = %e, "Rejected webhook payload");
            return twiml_response(ERROR_REPLY);
        }
    };

    info!(phone = %phone, route = "whatsapp", "Inbound message");
    let reply = router.handle(&phone, &body).await;
    twiml_response(&reply)
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "smartbiz",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Build the webhook and health routes.
pub fn webhook_routes(router: Arc<MessageRouter>) -> Router {
    Router::new()
        .route("/webhook/whatsapp", post(whatsapp_webhook))
        .route("/health", get(health))
        .with_state(router)
}
