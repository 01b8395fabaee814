//! Template-based auto-responder.
//!
//! A business's canned-answer catalog is matched against each customer
//! message before any language-model call is considered.

pub mod catalog;
pub mod engine;
pub mod placeholder;

pub use catalog::{BusinessTemplate, DefaultResponses, QnaEntry, template_for};
pub use engine::{
    FixedSelector, PICKUP_ONLY_REPLY, RandomSelector, ReplySelector, ResponseEngine,
    ResponseProfile,
};
pub use placeholder::fill;
