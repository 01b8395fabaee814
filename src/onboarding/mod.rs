//! Onboarding system — the five-question business interview.
//!
//! A new phone number is walked through business type, name, product
//! category, delivery, and hours. The final answer produces a
//! `BusinessDraft` that the caller turns into a `Business` record.

pub mod manager;
pub mod prompts;
pub mod routes;
pub mod state;

pub use manager::{OnboardingManager, OnboardingResponse};
pub use prompts::progress_message;
pub use routes::{OnboardingRouteState, OnboardingStatus, onboarding_routes};
pub use state::{OnboardingState, OnboardingStep};
