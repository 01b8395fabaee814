//! OnboardingManager — turns one inbound reply into the next interview step.
//!
//! The manager performs no I/O. It receives the persisted state (if any) and
//! returns both the reply text and the state the caller should persist.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::prompts::{
    RESTART_PREFIX, business_name_question, business_type_question, completion_message,
    delivery_question, hours_question, invalid_input_prefix, is_valid_input,
    product_category_question, question_for,
};
use super::state::{OnboardingState, OnboardingStep};
use crate::business::{BusinessDraft, business_type, hours_preset, resolve_category};
use crate::error::TemplateError;

/// Result of processing one message during onboarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingResponse {
    /// Reply to send back.
    pub message: String,
    /// True exactly once: when the hours answer finishes the interview.
    pub is_complete: bool,
    /// Step the phone is on after this message; `None` once complete.
    pub next_step: Option<u8>,
    /// The finished profile, present only when `is_complete`.
    pub business_data: Option<BusinessDraft>,
    /// State to persist; `None` once complete (the state is removed).
    pub state: Option<OnboardingState>,
}

impl OnboardingResponse {
    fn in_progress(message: String, state: OnboardingState) -> Self {
        Self {
            message,
            is_complete: false,
            next_step: Some(state.current_step),
            business_data: None,
            state: Some(state),
        }
    }
}

/// Drives the five-question onboarding interview.
#[derive(Debug, Clone)]
pub struct OnboardingManager {
    assistant_number: String,
    trial_days: i64,
}

impl OnboardingManager {
    /// `assistant_number` and `trial_days` are quoted in the welcome summary.
    pub fn new(assistant_number: impl Into<String>, trial_days: i64) -> Self {
        Self {
            assistant_number: assistant_number.into(),
            trial_days,
        }
    }

    /// Process one inbound message.
    ///
    /// With no existing state the message content is ignored: the first
    /// question is returned along with a fresh state at step 1. Invalid
    /// input re-asks the current question and never advances the step. A
    /// corrupted state restarts the interview.
    pub fn process_message(
        &self,
        current: Option<&OnboardingState>,
        input: &str,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<OnboardingResponse, TemplateError> {
        let Some(current) = current else {
            info!(phone, "Starting onboarding");
            return Ok(OnboardingResponse::in_progress(
                business_type_question().to_string(),
                OnboardingState::new(phone, now),
            ));
        };

        let Some(step) = current.step() else {
            warn!(
                phone,
                step = current.current_step,
                "Corrupted onboarding step, restarting"
            );
            return Ok(restart(current, now));
        };

        if !is_valid_input(step, input) {
            debug!(phone, %step, "Invalid onboarding input");
            return reask(current, step);
        }

        let input = input.trim();
        let mut next = current.clone();
        next.updated_at = now;

        let response = match step {
            OnboardingStep::BusinessType => {
                let Some(info) = business_type(input) else {
                    return reask(current, step);
                };
                next.business_type = Some(info.code.to_string());
                advance(&mut next, step);
                OnboardingResponse::in_progress(business_name_question(info.name)?, next)
            }
            OnboardingStep::BusinessName => {
                let Some(type_code) = current.business_type.as_deref() else {
                    return Ok(missing_answer(current, step, now));
                };
                let message = product_category_question(type_code, input)?;
                next.business_name = Some(input.to_string());
                advance(&mut next, step);
                OnboardingResponse::in_progress(message, next)
            }
            OnboardingStep::ProductCategory => {
                let Some(type_code) = current.business_type.as_deref() else {
                    return Ok(missing_answer(current, step, now));
                };
                let categories = business_type(type_code)
                    .map(|t| t.categories)
                    .unwrap_or_default();
                let Some(category) = resolve_category(categories, &input.to_uppercase()) else {
                    return reask(current, step);
                };
                let message = delivery_question(&category)?;
                next.product_category = Some(category);
                advance(&mut next, step);
                OnboardingResponse::in_progress(message, next)
            }
            OnboardingStep::Delivery => {
                next.has_delivery = Some(input.to_uppercase() == "Y");
                advance(&mut next, step);
                OnboardingResponse::in_progress(hours_question().to_string(), next)
            }
            OnboardingStep::Hours => {
                let Some(hours) = hours_preset(input) else {
                    return reask(current, step);
                };
                let (Some(business_type), Some(name), Some(category), Some(has_delivery)) = (
                    current.business_type.clone(),
                    current.business_name.clone(),
                    current.product_category.clone(),
                    current.has_delivery,
                ) else {
                    return Ok(missing_answer(current, step, now));
                };

                let draft = BusinessDraft {
                    business_type,
                    name,
                    category,
                    has_delivery,
                    hours: hours.to_string(),
                };
                let message = completion_message(&draft, &self.assistant_number, self.trial_days)?;
                info!(phone, business = %draft.name, "Onboarding complete");
                OnboardingResponse {
                    message,
                    is_complete: true,
                    next_step: None,
                    business_data: Some(draft),
                    state: None,
                }
            }
        };

        Ok(response)
    }
}

/// Re-ask the current question without advancing.
fn reask(
    current: &OnboardingState,
    step: OnboardingStep,
) -> Result<OnboardingResponse, TemplateError> {
    let question = question_for(
        step,
        current.business_type.as_deref(),
        current.business_name.as_deref(),
        current.product_category.as_deref(),
    )?;
    Ok(OnboardingResponse::in_progress(
        format!("{}{question}", invalid_input_prefix(step)),
        current.clone(),
    ))
}

fn advance(state: &mut OnboardingState, from: OnboardingStep) {
    if let Some(next) = from.next() {
        state.current_step = next.counter();
    }
}

fn restart(current: &OnboardingState, now: DateTime<Utc>) -> OnboardingResponse {
    let mut state = current.clone();
    state.restart();
    state.updated_at = now;
    OnboardingResponse::in_progress(
        format!("{RESTART_PREFIX}{}", business_type_question()),
        state,
    )
}

fn missing_answer(
    current: &OnboardingState,
    step: OnboardingStep,
    now: DateTime<Utc>,
) -> OnboardingResponse {
    warn!(
        phone = %current.phone,
        %step,
        "Onboarding state is missing an earlier answer, restarting"
    );
    restart(current, now)
}
