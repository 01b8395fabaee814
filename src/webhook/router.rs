//! MessageRouter — decides what an inbound message is and who answers it.
//!
//! Order: admin command, then customer reply for an existing business,
//! otherwise the onboarding interview. Every message gets a reply.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::locks::PhoneLocks;
use crate::admin::{AdminCommand, process_admin_command};
use crate::business::{Business, BusinessStatus};
use crate::config::RouterConfig;
use crate::error::Result;
use crate::llm::{FallbackResponder, question_key};
use crate::onboarding::OnboardingManager;
use crate::store::{Database, OutboundMessage};
use crate::templates::{ResponseEngine, template_for};

/// Reply for any internal failure.
pub const ERROR_REPLY: &str = "Error occurred. Try again.";

/// Customer-facing reply while the owner has paused the assistant.
pub const PAUSED_NOTICE: &str = "We're temporarily unavailable. We'll respond soon!";

/// Customer-facing reply once the free trial has run out.
pub const EXPIRED_NOTICE: &str = "⌛ This assistant's free trial has ended.\n\nPlease contact the business directly. Owner: renew your plan to reactivate 24/7 replies.";

/// Reply when no template matched and no fallback answer is available.
pub const GENERIC_REPLY: &str = "Thanks for your message! 🙏 We've received it and will get back to you shortly.";

/// Routes inbound messages for all phones.
pub struct MessageRouter {
    db: Arc<dyn Database>,
    onboarding: OnboardingManager,
    engine: ResponseEngine,
    fallback: Option<Arc<dyn FallbackResponder>>,
    config: RouterConfig,
    locks: PhoneLocks,
}

impl MessageRouter {
    pub fn new(db: Arc<dyn Database>, config: RouterConfig) -> Self {
        Self {
            db,
            onboarding: OnboardingManager::new(config.assistant_number.clone(), config.trial_days),
            engine: ResponseEngine::default(),
            fallback: None,
            config,
            locks: PhoneLocks::new(),
        }
    }

    /// Replace the response engine (e.g. with a fixed reply selector).
    pub fn with_engine(mut self, engine: ResponseEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Answer unmatched customer questions with a language model.
    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackResponder>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Handle one inbound message and return the reply text.
    ///
    /// Never fails: errors are logged and turned into `ERROR_REPLY`. The
    /// reply is recorded in the outbound message log.
    pub async fn handle(&self, phone: &str, body: &str) -> String {
        let _guard = self.locks.acquire(phone).await;

        let reply = match self.route(phone, body).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(phone, error = %e, "Failed to process message");
                ERROR_REPLY.to_string()
            }
        };

        if let Err(e) = self
            .db
            .enqueue_outbound(&OutboundMessage::sent(phone, &reply))
            .await
        {
            error!(phone, error = %e, "Failed to record outbound message");
        }
        reply
    }

    async fn route(&self, phone: &str, body: &str) -> Result<String> {
        let text = body.trim();
        let business = match self.db.get_business(phone).await? {
            Some(business) => Some(self.expire_if_due(business).await?),
            None => None,
        };

        if let Some(command) = AdminCommand::parse(text) {
            return self.admin(command, business).await;
        }

        match business {
            Some(business) => self.answer_customer(&business, text).await,
            None => self.onboard(phone, text).await,
        }
    }

    /// Move a trial past its end date to `expired`.
    async fn expire_if_due(&self, mut business: Business) -> Result<Business> {
        if business.trial_expired(Utc::now()) {
            self.db
                .update_business_status(&business.phone, BusinessStatus::Expired)
                .await?;
            info!(phone = %business.phone, "Trial expired");
            business.status = BusinessStatus::Expired;
        }
        Ok(business)
    }

    async fn admin(&self, command: AdminCommand, business: Option<Business>) -> Result<String> {
        info!(%command, registered = business.is_some(), "Admin command");

        let Some(mut business) = business else {
            return Ok(process_admin_command(command.as_str(), None));
        };

        let target = match command {
            AdminCommand::Pause => Some(BusinessStatus::Paused),
            AdminCommand::Resume => Some(BusinessStatus::Active),
            _ => None,
        };
        if let Some(status) = target {
            if business.status == BusinessStatus::Expired {
                return Ok(EXPIRED_NOTICE.to_string());
            }
            self.db.update_business_status(&business.phone, status).await?;
            business.status = status;
        }

        Ok(process_admin_command(command.as_str(), Some(&business)))
    }

    async fn answer_customer(&self, business: &Business, text: &str) -> Result<String> {
        match business.status {
            BusinessStatus::Paused => return Ok(PAUSED_NOTICE.to_string()),
            BusinessStatus::Expired => return Ok(EXPIRED_NOTICE.to_string()),
            BusinessStatus::Trial | BusinessStatus::Active => {}
        }

        if let Some(template) = template_for(&business.business_type) {
            if let Some(reply) = self
                .engine
                .generate_response(template, text, business.into())?
            {
                debug!(phone = %business.phone, "Template reply");
                return Ok(reply);
            }
        }

        let key = question_key(text);
        if !key.is_empty() {
            if let Some(cached) = self.db.get_cached_response(&business.phone, &key).await? {
                debug!(phone = %business.phone, "Cached fallback reply");
                return Ok(cached);
            }
        }

        let Some(fallback) = &self.fallback else {
            return Ok(GENERIC_REPLY.to_string());
        };

        match fallback.reply(business, text).await {
            Ok(answer) => {
                if !key.is_empty() {
                    self.db
                        .cache_response(&business.phone, &key, &answer)
                        .await?;
                }
                Ok(answer)
            }
            Err(e) => {
                warn!(
                    phone = %business.phone,
                    model = fallback.model_name(),
                    error = %e,
                    "Fallback failed"
                );
                Ok(GENERIC_REPLY.to_string())
            }
        }
    }

    async fn onboard(&self, phone: &str, text: &str) -> Result<String> {
        let now = Utc::now();
        let current = self.db.get_onboarding_state(phone).await?;
        let response = self
            .onboarding
            .process_message(current.as_ref(), text, phone, now)?;

        match (current.as_ref(), response.state.as_ref(), response.business_data) {
            (Some(prev), None, Some(draft)) => {
                let business = Business::from_draft(phone, draft, now, self.config.trial_days);
                self.db
                    .complete_onboarding(&business, prev.current_step)
                    .await?;
                info!(phone, name = %business.name, "Onboarding complete");
            }
            (Some(prev), Some(next), _) if next != prev => {
                self.db
                    .update_onboarding_state(next, prev.current_step)
                    .await?;
            }
            (None, Some(next), _) => {
                self.db.create_onboarding_state(next).await?;
            }
            _ => {}
        }

        Ok(response.message)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;

    use super::*;
    use crate::business::BusinessDraft;
    use crate::error::LlmError;
    use crate::store::LibSqlBackend;
    use crate::templates::FixedSelector;

    const PHONE: &str = "2348012345678";

    struct EchoFallback;

    #[async_trait]
    impl FallbackResponder for EchoFallback {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn reply(
            &self,
            business: &Business,
            message: &str,
        ) -> std::result::Result<String, LlmError> {
            Ok(format!("{} says: {message}", business.name))
        }
    }

    struct FailingFallback;

    #[async_trait]
    impl FallbackResponder for FailingFallback {
        fn model_name(&self) -> &str {
            "failing"
        }

        async fn reply(&self, _: &Business, _: &str) -> std::result::Result<String, LlmError> {
            Err(LlmError::RequestFailed {
                provider: "test".into(),
                reason: "offline".into(),
            })
        }
    }

    async fn setup() -> (Arc<LibSqlBackend>, MessageRouter) {
        let db = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let router = MessageRouter::new(db.clone(), RouterConfig::default())
            .with_engine(ResponseEngine::new(Arc::new(FixedSelector(0))));
        (db, router)
    }

    async fn register(db: &LibSqlBackend, business_type: &str) -> Business {
        register_at(db, business_type, Utc::now()).await
    }

    async fn register_at(
        db: &LibSqlBackend,
        business_type: &str,
        created: chrono::DateTime<Utc>,
    ) -> Business {
        let mut state = crate::onboarding::OnboardingState::new(PHONE, Utc::now());
        state.current_step = 5;
        db.create_onboarding_state(&state).await.unwrap();
        let business = Business::from_draft(
            PHONE,
            BusinessDraft {
                business_type: business_type.into(),
                name: "Mama Nkechi Boutique".into(),
                category: "Women's clothing".into(),
                has_delivery: true,
                hours: "8am - 6pm".into(),
            },
            created,
            7,
        );
        db.complete_onboarding(&business, 5).await.unwrap();
        business
    }

    #[tokio::test]
    async fn onboarding_walkthrough_creates_business() {
        let (db, router) = setup().await;

        let reply = router.handle(PHONE, "hello").await;
        assert!(reply.contains("What type of business"));

        router.handle(PHONE, "1").await;
        router.handle(PHONE, "Mama Nkechi Boutique").await;
        router.handle(PHONE, "a").await;
        let reply = router.handle(PHONE, "Y").await;
        assert!(reply.contains("hours"));

        let reply = router.handle(PHONE, "1").await;
        assert!(reply.contains("Mama Nkechi Boutique"));
        assert!(reply.contains("07012345678"));

        let business = db.get_business(PHONE).await.unwrap().unwrap();
        assert_eq!(business.status, BusinessStatus::Trial);
        assert_eq!(business.product_category, "Women's clothing");
        assert!(business.has_delivery);
        assert!(db.get_onboarding_state(PHONE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn configured_trial_length_reaches_owner_replies() {
        let db = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let router = MessageRouter::new(
            db.clone(),
            RouterConfig {
                trial_days: 14,
                ..RouterConfig::default()
            },
        );

        for answer in ["hi", "1", "Mama Nkechi Boutique", "A", "Y"] {
            router.handle(PHONE, answer).await;
        }
        let summary = router.handle(PHONE, "1").await;
        assert!(summary.contains("Your 14-day FREE trial starts now"));
        assert!(!summary.contains("7-day"));

        let business = db.get_business(PHONE).await.unwrap().unwrap();
        assert_eq!(business.trial_days_left(Utc::now()), 14);

        let status = router.handle(PHONE, "STATUS").await;
        assert!(status.contains("🎯 Plan: 14-day FREE trial"));
        assert!(status.contains("14 days left"));
    }

    #[tokio::test]
    async fn invalid_onboarding_input_keeps_step() {
        let (db, router) = setup().await;
        router.handle(PHONE, "hi").await;

        let reply = router.handle(PHONE, "99").await;
        assert!(reply.starts_with("❌"));
        let state = db.get_onboarding_state(PHONE).await.unwrap().unwrap();
        assert_eq!(state.current_step, 1);
    }

    #[tokio::test]
    async fn template_reply_for_registered_business() {
        let (db, router) = setup().await;
        register(&db, "1").await;

        let reply = router.handle(PHONE, "What time do you open?").await;
        assert!(reply.contains("8am - 6pm"));
    }

    #[tokio::test]
    async fn pause_and_resume_persist_status() {
        let (db, router) = setup().await;
        register(&db, "1").await;

        let reply = router.handle(PHONE, " pause ").await;
        assert!(reply.starts_with("⏸️"));
        assert_eq!(
            db.get_business(PHONE).await.unwrap().unwrap().status,
            BusinessStatus::Paused
        );
        assert_eq!(router.handle(PHONE, "hello").await, PAUSED_NOTICE);

        router.handle(PHONE, "RESUME").await;
        assert_eq!(
            db.get_business(PHONE).await.unwrap().unwrap().status,
            BusinessStatus::Active
        );
    }

    #[tokio::test]
    async fn admin_without_business_is_canned() {
        let (db, router) = setup().await;
        let reply = router.handle(PHONE, "HELP").await;
        assert!(reply.contains("HELP & SUPPORT"));
        assert!(db.get_onboarding_state(PHONE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_trial_transitions_on_next_message() {
        let (db, router) = setup().await;
        register_at(&db, "1", Utc::now() - Duration::days(8)).await;

        assert_eq!(router.handle(PHONE, "hello").await, EXPIRED_NOTICE);
        assert_eq!(
            db.get_business(PHONE).await.unwrap().unwrap().status,
            BusinessStatus::Expired
        );

        // An expired business can't be resumed from chat.
        assert_eq!(router.handle(PHONE, "RESUME").await, EXPIRED_NOTICE);
        let reply = router.handle(PHONE, "STATUS").await;
        assert!(reply.contains("Expired"));
    }

    #[tokio::test]
    async fn unmatched_goes_to_fallback_and_is_cached() {
        let (db, router) = setup().await;
        let router = router.with_fallback(Arc::new(EchoFallback));
        register(&db, "5").await;

        let first = router.handle(PHONE, "Do you fix phones?").await;
        assert_eq!(first, "Mama Nkechi Boutique says: Do you fix phones?");
        let cached = db
            .get_cached_response(PHONE, "do you fix phones")
            .await
            .unwrap();
        assert_eq!(cached.as_deref(), Some(first.as_str()));

        let second = router.handle(PHONE, "do you fix   phones").await;
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn fallback_failure_gives_generic_reply() {
        let (db, router) = setup().await;
        let router = router.with_fallback(Arc::new(FailingFallback));
        register(&db, "5").await;
        assert_eq!(router.handle(PHONE, "Anything?").await, GENERIC_REPLY);
    }

    #[tokio::test]
    async fn no_fallback_gives_generic_reply() {
        let (db, router) = setup().await;
        register(&db, "1").await;
        assert_eq!(router.handle(PHONE, "Tell me a joke").await, GENERIC_REPLY);
    }
}
