//! Template response engine — answers common customer questions without a
//! language model.
//!
//! Matching order, first hit wins:
//! 1. catalog-specific Q&A entries
//! 2. greeting (anchored at the start of the message)
//! 3. hours inquiry
//! 4. delivery inquiry (pickup-only sentence when the business doesn't deliver)
//! 5. pricing inquiry
//! 6. order inquiry
//!
//! `Ok(None)` means nothing matched and the caller should use the fallback.

use std::sync::{Arc, LazyLock};

use rand::Rng;
use regex::Regex;
use tracing::debug;

use super::catalog::BusinessTemplate;
use super::placeholder::fill;
use crate::business::Business;
use crate::error::TemplateError;

/// Reply sent on a delivery inquiry when the business has no delivery.
pub const PICKUP_ONLY_REPLY: &str = "Sorry, we don't offer delivery. Pickup only at our location.";

static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(hi|hello|hey|good morning|good afternoon|good evening)").expect("greeting regex")
});
static HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"hours|time|open|close|when").expect("hours regex"));
static DELIVERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"deliver|shipping|send|location").expect("delivery regex"));
static PRICING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"price|cost|money|pay|cheap|expensive").expect("pricing regex")
});
static ORDERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"order|buy|purchase|want|need").expect("orders regex"));

/// Chooses one of several interchangeable replies.
pub trait ReplySelector: Send + Sync {
    /// Return an index in `0..len`. `len` is never zero.
    fn select(&self, len: usize) -> usize;
}

/// Uniformly random selection (production).
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl ReplySelector for RandomSelector {
    fn select(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same index, clamped to the list length.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl ReplySelector for FixedSelector {
    fn select(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

/// The profile fields a reply can depend on.
#[derive(Debug, Clone, Copy)]
pub struct ResponseProfile<'a> {
    pub name: &'a str,
    pub hours: &'a str,
    pub has_delivery: bool,
}

impl<'a> From<&'a Business> for ResponseProfile<'a> {
    fn from(business: &'a Business) -> Self {
        Self {
            name: &business.name,
            hours: &business.hours,
            has_delivery: business.has_delivery,
        }
    }
}

/// Pattern-matching responder over a business template.
#[derive(Clone)]
pub struct ResponseEngine {
    selector: Arc<dyn ReplySelector>,
}

impl Default for ResponseEngine {
    fn default() -> Self {
        Self::new(Arc::new(RandomSelector))
    }
}

impl ResponseEngine {
    pub fn new(selector: Arc<dyn ReplySelector>) -> Self {
        Self { selector }
    }

    /// Produce a canned reply for `message`, or `None` if nothing matched.
    pub fn generate_response(
        &self,
        template: &BusinessTemplate,
        message: &str,
        profile: ResponseProfile<'_>,
    ) -> Result<Option<String>, TemplateError> {
        let message = message.trim().to_lowercase();
        let vars = [("BUSINESS_NAME", profile.name), ("BUSINESS_HOURS", profile.hours)];

        for qna in &template.common_questions {
            if qna.responses.is_empty() || !qna.pattern.is_match(&message) {
                continue;
            }
            let index = self.selector.select(qna.responses.len());
            let reply = qna.responses.get(index).copied().unwrap_or(qna.responses[0]);
            debug!(pattern = %qna.pattern, index, "Catalog entry matched");
            return fill(reply, &vars).map(Some);
        }

        let defaults = &template.defaults;
        let reply = if GREETING.is_match(&message) {
            defaults.greeting
        } else if HOURS.is_match(&message) {
            defaults.hours
        } else if DELIVERY.is_match(&message) {
            if profile.has_delivery {
                defaults.delivery
            } else {
                PICKUP_ONLY_REPLY
            }
        } else if PRICING.is_match(&message) {
            defaults.pricing
        } else if ORDERS.is_match(&message) {
            defaults.orders
        } else {
            return Ok(None);
        };

        fill(reply, &vars).map(Some)
    }
}
