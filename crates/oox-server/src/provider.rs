//! Provider selection from configuration

use crate::config::{ConfigError, LlmConfig, ProviderKind};
use oox_domain::traits::LlmProvider;
use oox_llm::{GeminiProvider, LlmError, MockProvider};

/// The provider chosen by `[llm] provider`
#[derive(Debug, Clone)]
pub enum ConfiguredProvider {
    /// Google Gemini
    Gemini(GeminiProvider),
    /// Canned responses
    Mock(MockProvider),
}

impl ConfiguredProvider {
    /// Build the provider named in `config`
    ///
    /// The Gemini provider needs its API key in the environment.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        match config.provider {
            ProviderKind::Mock => Ok(Self::Mock(MockProvider::new(config.mock_response.clone()))),
            ProviderKind::Gemini => {
                let api_key = config.api_key()?;
                let provider = GeminiProvider::with_timeout(
                    config.endpoint.clone(),
                    config.model.clone(),
                    api_key,
                    config.timeout(),
                )
                .map_err(|e| ConfigError::Invalid(e.to_string()))?
                .with_max_retries(config.max_retries);
                Ok(Self::Gemini(provider))
            }
        }
    }
}

impl LlmProvider for ConfiguredProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            Self::Gemini(provider) => provider.generate_text(prompt).await,
            Self::Mock(provider) => provider.generate(prompt).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Gemini(provider) => provider.name(),
            Self::Mock(provider) => provider.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_from_config() {
        let config = LlmConfig {
            provider: ProviderKind::Mock,
            mock_response: "canned".to_string(),
            ..Default::default()
        };
        let provider = ConfiguredProvider::from_config(&config).unwrap();
        assert_eq!(provider.name(), "mock");
        assert_eq!(provider.generate("anything").await.unwrap(), "canned");
    }

    #[test]
    fn test_gemini_requires_key() {
        let config = LlmConfig {
            api_key_env: "OOX_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let result = ConfiguredProvider::from_config(&config);
        assert!(matches!(result, Err(ConfigError::MissingField(_))));
    }
}
