//! Webhook adapter — connects the messaging channel to the onboarding
//! interview, admin commands, and the template responder.

pub mod locks;
pub mod router;
pub mod twilio;

pub use locks::PhoneLocks;
pub use router::{ERROR_REPLY, EXPIRED_NOTICE, GENERIC_REPLY, MessageRouter, PAUSED_NOTICE};
pub use twilio::{normalize_phone, twiml, webhook_routes};

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::onboarding::{OnboardingRouteState, onboarding_routes};
use crate::store::Database;

/// The full HTTP application: webhook, health, and onboarding status routes.
pub fn app(router: Arc<MessageRouter>, db: Arc<dyn Database>) -> Router {
    Router::new()
        .merge(webhook_routes(router))
        .merge(onboarding_routes(OnboardingRouteState { db }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
