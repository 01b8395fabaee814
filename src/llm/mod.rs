//! Language-model fallback for customer questions the templates can't answer.
//!
//! Supports:
//! - **Anthropic**: Direct API access via rig-core
//! - **OpenAI**: Direct API access via rig-core

mod fallback;

pub use fallback::{FallbackResponder, RigFallback, build_preamble, question_key};

use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::config::FallbackConfig;
use crate::error::LlmError;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Anthropic,
    OpenAi,
}

impl LlmBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }
}

/// Create the fallback responder from configuration.
pub fn create_fallback(config: &FallbackConfig) -> Result<Arc<dyn FallbackResponder>, LlmError> {
    match config.backend {
        LlmBackend::Anthropic => create_anthropic_fallback(config),
        LlmBackend::OpenAi => create_openai_fallback(config),
    }
}

fn create_anthropic_fallback(
    config: &FallbackConfig,
) -> Result<Arc<dyn FallbackResponder>, LlmError> {
    use rig::providers::anthropic;

    let client: rig::client::Client<anthropic::client::AnthropicExt> =
        anthropic::Client::new(config.api_key.expose_secret()).map_err(|e| {
            LlmError::RequestFailed {
                provider: "anthropic".to_string(),
                reason: format!("Failed to create Anthropic client: {}", e),
            }
        })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Fallback using Anthropic (model: {})", config.model);
    Ok(Arc::new(RigFallback::new(
        model,
        LlmBackend::Anthropic,
        &config.model,
        config.timeout,
    )))
}

fn create_openai_fallback(config: &FallbackConfig) -> Result<Arc<dyn FallbackResponder>, LlmError> {
    use rig::providers::openai;

    let client: rig::client::Client<openai::client::OpenAIResponsesExt> =
        openai::Client::new(config.api_key.expose_secret()).map_err(|e| {
            LlmError::RequestFailed {
                provider: "openai".to_string(),
                reason: format!("Failed to create OpenAI client: {}", e),
            }
        })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Fallback using OpenAI (model: {})", config.model);
    Ok(Arc::new(RigFallback::new(
        model,
        LlmBackend::OpenAi,
        &config.model,
        config.timeout,
    )))
}
