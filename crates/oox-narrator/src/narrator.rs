//! Core Narrator implementation

use crate::config::NarratorConfig;
use crate::error::NarratorError;
use crate::parser::parse_narrative;
use crate::prompt::NarrativePromptBuilder;
use crate::types::{Narrative, NarrativeRequest};
use oox_domain::traits::LlmProvider;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// The Narrator turns a ranking result into a short narrative
pub struct Narrator<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: NarratorConfig,
}

impl<L> Clone for Narrator<L>
where
    L: LlmProvider,
{
    fn clone(&self) -> Self {
        Self {
            llm_provider: Arc::clone(&self.llm_provider),
            config: self.config.clone(),
        }
    }
}

impl<L> Narrator<L>
where
    L: LlmProvider,
{
    /// Create a new Narrator
    pub fn new(llm_provider: L, config: NarratorConfig) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            config,
        }
    }

    /// Create a Narrator with default configuration
    pub fn with_defaults(llm_provider: L) -> Self {
        Self::new(llm_provider, NarratorConfig::default())
    }

    /// Configuration in use
    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }

    /// Generate a narrative
    ///
    /// # Errors
    ///
    /// Fails if the request is empty, the provider errors, or the call exceeds
    /// the configured timeout. Malformed model output is not an error; see
    /// [`parse_narrative`].
    pub async fn describe(&self, request: &NarrativeRequest) -> Result<Narrative, NarratorError> {
        request.validate().map_err(NarratorError::InvalidRequest)?;

        let prompt = NarrativePromptBuilder::new(request)
            .with_config(&self.config)
            .build()?;

        info!(
            provider = self.llm_provider.name(),
            elements = request.final_order.len(),
            "Generating narrative"
        );
        debug!("Prompt length: {} chars", prompt.len());

        let response = timeout(
            self.config.generation_timeout(),
            self.llm_provider.generate(&prompt),
        )
        .await
        .map_err(|_| NarratorError::Timeout(self.config.generation_timeout_secs))?
        .map_err(|e| NarratorError::Llm(e.to_string()))?;

        debug!("LLM response length: {} chars", response.len());

        Ok(parse_narrative(&response))
    }

    /// Generate a narrative, substituting the placeholder on any failure
    pub async fn describe_or_placeholder(&self, request: &NarrativeRequest) -> Narrative {
        match self.describe(request).await {
            Ok(narrative) => narrative,
            Err(e) => {
                error!("Narrative generation failed: {}", e);
                Narrative::placeholder()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oox_domain::{CategoryCode, OrderElement};
    use oox_llm::{LlmError, MockProvider};
    use std::future::Future;
    use std::time::Duration;

    fn request() -> NarrativeRequest {
        NarrativeRequest::new(vec![OrderElement::Single(CategoryCode::new("Ni").unwrap())])
    }

    /// Provider that never answers in time
    struct SlowProvider;

    impl LlmProvider for SlowProvider {
        type Error = LlmError;

        fn generate(&self, _prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_describe_parses_response() {
        let provider = MockProvider::new("# Title\nSeer\n\n# Description\nYou look ahead.");
        let narrator = Narrator::with_defaults(provider.clone());

        let narrative = narrator.describe(&request()).await.unwrap();
        assert_eq!(narrative, Narrative::new("Seer", "You look ahead."));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_describe_rejects_empty_order() {
        let provider = MockProvider::default();
        let narrator = Narrator::with_defaults(provider.clone());

        let result = narrator.describe(&NarrativeRequest::new(Vec::new())).await;
        assert!(matches!(result, Err(NarratorError::InvalidRequest(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_surfaces() {
        let narrator = Narrator::with_defaults(MockProvider::failing());
        let result = narrator.describe(&request()).await;
        assert!(matches!(result, Err(NarratorError::Llm(_))));
    }

    #[tokio::test]
    async fn test_placeholder_on_failure() {
        let narrator = Narrator::with_defaults(MockProvider::failing());
        let narrative = narrator.describe_or_placeholder(&request()).await;
        assert!(narrative.is_placeholder());
    }

    #[tokio::test]
    async fn test_timeout() {
        let config = NarratorConfig {
            generation_timeout_secs: 1,
            ..Default::default()
        };
        let narrator = Narrator::new(SlowProvider, config);
        let result = narrator.describe(&request()).await;
        assert!(matches!(result, Err(NarratorError::Timeout(1))));
    }
}
