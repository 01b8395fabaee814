//! The fallback seam and its rig-core implementation.

use std::time::Duration;

use async_trait::async_trait;
use rig::agent::AgentBuilder;
use rig::completion::{CompletionModel, Prompt};

use crate::business::{Business, business_type, persona_for};
use crate::error::LlmError;
use crate::llm::LlmBackend;

/// Answers a customer message on behalf of a business.
#[async_trait]
pub trait FallbackResponder: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    async fn reply(&self, business: &Business, message: &str) -> Result<String, LlmError>;
}

/// Normalize a customer question into a cache key: lower-cased, whitespace
/// collapsed, trailing punctuation dropped.
pub fn question_key(message: &str) -> String {
    let collapsed = message
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    collapsed
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim_end()
        .to_string()
}

/// System prompt describing the business the assistant speaks for.
pub fn build_preamble(business: &Business) -> String {
    let kind = business_type(&business.business_type)
        .map(|info| info.name)
        .unwrap_or("Small business");
    let persona = persona_for(Some(&business.business_type));
    let delivery = if business.has_delivery {
        "Delivery is available."
    } else {
        "Pickup only, no delivery."
    };
    format!(
        "You are {persona}, the WhatsApp customer service assistant for {name}, a {kind} \
         in Nigeria selling {category}.\n\
         Opening hours: {hours}. {delivery}\n\
         Reply in one or two short, friendly sentences. Never invent prices or stock levels; \
         if you don't know, say the team will confirm shortly.",
        name = business.name,
        category = business.product_category,
        hours = business.hours,
    )
}

/// Fallback backed by any rig completion model.
pub struct RigFallback<M: CompletionModel> {
    model: M,
    backend: LlmBackend,
    model_name: String,
    timeout: Duration,
}

impl<M: CompletionModel> RigFallback<M> {
    pub fn new(model: M, backend: LlmBackend, model_name: &str, timeout: Duration) -> Self {
        Self {
            model,
            backend,
            model_name: model_name.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl<M> FallbackResponder for RigFallback<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn reply(&self, business: &Business, message: &str) -> Result<String, LlmError> {
        let provider = self.backend.as_str();
        let preamble = build_preamble(business);
        let agent = AgentBuilder::new(self.model.clone())
            .preamble(&preamble)
            .max_tokens(300)
            .build();

        let answer = tokio::time::timeout(self.timeout, agent.prompt(message))
            .await
            .map_err(|_| LlmError::Timeout {
                provider: provider.to_string(),
                timeout: self.timeout,
            })?
            .map_err(|e| LlmError::RequestFailed {
                provider: provider.to_string(),
                reason: e.to_string(),
            })?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: provider.to_string(),
                reason: "empty completion".to_string(),
            });
        }
        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::business::BusinessDraft;

    fn business(code: &str, has_delivery: bool) -> Business {
        Business::from_draft(
            "2348000000000",
            BusinessDraft {
                business_type: code.into(),
                name: "Mama Nkechi Boutique".into(),
                category: "Women's clothing".into(),
                has_delivery,
                hours: "8am - 6pm".into(),
            },
            Utc::now(),
            7,
        )
    }

    #[test]
    fn question_key_normalizes() {
        assert_eq!(question_key("  Do you sell   SHOES?? "), "do you sell shoes");
        assert_eq!(question_key("Do you sell shoes"), "do you sell shoes");
        assert_eq!(question_key("?!"), "");
    }

    #[test]
    fn preamble_describes_business() {
        let preamble = build_preamble(&business("1", true));
        assert!(preamble.contains("Lexi"));
        assert!(preamble.contains("Mama Nkechi Boutique"));
        assert!(preamble.contains("Fashion/Boutique"));
        assert!(preamble.contains("8am - 6pm"));
        assert!(preamble.contains("Delivery is available."));
    }

    #[test]
    fn preamble_unknown_type_and_pickup() {
        let preamble = build_preamble(&business("42", false));
        assert!(preamble.contains("Small business"));
        assert!(preamble.contains("Pickup only"));
    }
}
