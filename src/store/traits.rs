//! `Database` trait — the storage boundary of the message router.
//!
//! Everything is keyed by the sender's phone number.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::business::{Business, BusinessStatus};
use crate::error::DatabaseError;
use crate::onboarding::OnboardingState;

/// Delivery status of an outbound message record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    Pending,
    Sent,
    Failed,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// An outbound reply recorded for delivery bookkeeping.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub id: Uuid,
    pub phone: String,
    pub message: String,
    pub status: QueueStatus,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl OutboundMessage {
    /// A reply delivered inline in the webhook response.
    pub fn sent(phone: &str, message: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone: phone.to_string(),
            message: message.to_string(),
            status: QueueStatus::Sent,
            retry_count: 0,
            created_at: now,
            processed_at: Some(now),
        }
    }
}

/// Backend-agnostic storage for businesses, onboarding progress, the
/// fallback response cache, and the outbound message log.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    // ── Businesses ──────────────────────────────────────────────────

    /// Get the business owned by `phone`.
    async fn get_business(&self, phone: &str) -> Result<Option<Business>, DatabaseError>;

    /// Change a business's lifecycle status. Returns false if no such business.
    async fn update_business_status(
        &self,
        phone: &str,
        status: BusinessStatus,
    ) -> Result<bool, DatabaseError>;

    // ── Onboarding ──────────────────────────────────────────────────

    /// Get the in-progress onboarding state for `phone`.
    async fn get_onboarding_state(
        &self,
        phone: &str,
    ) -> Result<Option<OnboardingState>, DatabaseError>;

    /// Insert a new onboarding state. Fails if one already exists.
    async fn create_onboarding_state(&self, state: &OnboardingState) -> Result<(), DatabaseError>;

    /// Overwrite the onboarding state only if its stored step still equals
    /// `expected_step`; otherwise `DatabaseError::StaleWrite`.
    async fn update_onboarding_state(
        &self,
        state: &OnboardingState,
        expected_step: u8,
    ) -> Result<(), DatabaseError>;

    /// Atomically create the business and remove the onboarding state,
    /// provided the state is still at `expected_step`.
    async fn complete_onboarding(
        &self,
        business: &Business,
        expected_step: u8,
    ) -> Result<(), DatabaseError>;

    // ── Response cache ──────────────────────────────────────────────

    /// Cached fallback answer for a normalized question.
    async fn get_cached_response(
        &self,
        phone: &str,
        question_key: &str,
    ) -> Result<Option<String>, DatabaseError>;

    /// Store (or replace) a fallback answer.
    async fn cache_response(
        &self,
        phone: &str,
        question_key: &str,
        response: &str,
    ) -> Result<(), DatabaseError>;

    // ── Message queue ───────────────────────────────────────────────

    /// Record an outbound message. Write-only from the router's side.
    async fn enqueue_outbound(&self, message: &OutboundMessage) -> Result<(), DatabaseError>;
}
