//! Onboarding state machine — which interview question a phone is on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The five interview questions, in order.
///
/// The persisted form is a plain step counter (`1..=5`); converting it into
/// this enum is where a corrupted counter is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    BusinessType,
    BusinessName,
    ProductCategory,
    Delivery,
    Hours,
}

impl OnboardingStep {
    /// Total number of interview questions.
    pub const COUNT: u8 = 5;

    /// Parse a persisted step counter. `None` for anything outside `1..=5`.
    pub fn from_counter(step: u8) -> Option<Self> {
        use OnboardingStep::*;
        match step {
            1 => Some(BusinessType),
            2 => Some(BusinessName),
            3 => Some(ProductCategory),
            4 => Some(Delivery),
            5 => Some(Hours),
            _ => None,
        }
    }

    /// The persisted step counter for this step.
    pub fn counter(&self) -> u8 {
        use OnboardingStep::*;
        match self {
            BusinessType => 1,
            BusinessName => 2,
            ProductCategory => 3,
            Delivery => 4,
            Hours => 5,
        }
    }

    /// The following step, or `None` after the last question.
    pub fn next(&self) -> Option<OnboardingStep> {
        Self::from_counter(self.counter() + 1)
    }

    /// Whether answering this step finishes the interview.
    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BusinessType => "business_type",
            Self::BusinessName => "business_name",
            Self::ProductCategory => "product_category",
            Self::Delivery => "delivery",
            Self::Hours => "hours",
        };
        write!(f, "{s}")
    }
}

/// Persisted onboarding progress for one phone.
///
/// Hours are not stored: the hours answer finishes the interview and goes
/// straight into the business record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingState {
    pub phone: String,
    /// Raw step counter; may be corrupted in storage.
    pub current_step: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_delivery: Option<bool>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OnboardingState {
    /// Fresh state at the first question.
    pub fn new(phone: &str, now: DateTime<Utc>) -> Self {
        Self {
            phone: phone.to_string(),
            current_step: OnboardingStep::BusinessType.counter(),
            business_type: None,
            business_name: None,
            product_category: None,
            has_delivery: None,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The current step, or `None` if the counter is corrupted.
    pub fn step(&self) -> Option<OnboardingStep> {
        OnboardingStep::from_counter(self.current_step)
    }

    /// Clear collected answers and go back to the first question.
    pub fn restart(&mut self) {
        self.current_step = OnboardingStep::BusinessType.counter();
        self.business_type = None;
        self.business_name = None;
        self.product_category = None;
        self.has_delivery = None;
        self.completed = false;
    }
}
