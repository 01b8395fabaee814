//! SmartBiz — WhatsApp onboarding and template auto-responder for small
//! businesses.

pub mod admin;
pub mod business;
pub mod config;
pub mod error;
pub mod llm;
pub mod onboarding;
pub mod store;
pub mod templates;
pub mod webhook;
