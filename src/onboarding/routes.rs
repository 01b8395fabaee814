//! REST endpoint for onboarding progress.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::error;

use super::prompts::progress_message;
use super::state::OnboardingState;
use crate::business::Business;
use crate::error::DatabaseError;
use crate::store::Database;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub db: Arc<dyn Database>,
}

/// Onboarding status for one phone.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatus {
    pub phone: String,
    pub onboarding_completed: bool,
    /// Current step, absent once completed.
    pub step: Option<u8>,
    pub progress: String,
    pub state: Option<OnboardingState>,
    pub business: Option<Business>,
}

impl OnboardingStatus {
    async fn load(db: &dyn Database, phone: &str) -> Result<Option<Self>, DatabaseError> {
        if let Some(business) = db.get_business(phone).await? {
            return Ok(Some(Self {
                phone: phone.to_string(),
                onboarding_completed: true,
                step: None,
                progress: progress_message(5),
                state: None,
                business: Some(business),
            }));
        }

        Ok(db.get_onboarding_state(phone).await?.map(|state| Self {
            phone: phone.to_string(),
            onboarding_completed: false,
            step: Some(state.current_step),
            progress: progress_message(state.current_step),
            state: Some(state),
            business: None,
        }))
    }
}

/// GET /api/onboarding/{phone}
///
/// Returns the phone's onboarding progress and, once complete, its
/// business record. 404 if the phone has never messaged.
async fn get_status(
    State(state): State<OnboardingRouteState>,
    Path(phone): Path<String>,
) -> Response {
    match OnboardingStatus::load(state.db.as_ref(), &phone).await {
        Ok(Some(status)) => Json(status).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No onboarding record for this phone"})),
        )
            .into_response(),
        Err(e) => {
            error!(phone = %phone, error = %e, "Failed to load onboarding status");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Storage error"})),
            )
                .into_response()
        }
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/{phone}", get(get_status))
        .with_state(state)
}
