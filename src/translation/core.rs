/*!
 * Core translation service implementation.
 *
 * `TranslationService` builds the configured backend client and wraps every
 * call in a timeout and a bounded retry loop. It is itself a
 * `TranslationClient`, so the pipeline cannot tell it apart from a bare one.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;
use crate::providers::anthropic::Anthropic;
use crate::providers::ollama::Ollama;
use crate::providers::openai::OpenAI;
use crate::providers::{BatchRequest, TranslationClient};

/// Normalize an endpoint string into a URL, assuming http when no scheme is given
fn parse_endpoint(endpoint: &str) -> Result<Url> {
    if endpoint.trim().is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(url)
}

/// How hard to try before a batch is given up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub retry_count: u32,

    /// Base delay, doubled after every failed attempt
    pub backoff: Duration,

    /// Upper bound for a single attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 2,
            backoff: Duration::from_millis(1000),
            timeout: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Retrying, timeout-bounded translation client
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Backend doing the actual work
    client: Arc<dyn TranslationClient>,

    /// Retry and timeout settings
    policy: RetryPolicy,
}

impl TranslationService {
    /// Build the backend selected in `config`
    ///
    /// Credentials, base URL and model all come from `config`; nothing is read
    /// from process-wide state.
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let endpoint = parse_endpoint(&config.get_endpoint())?;
        let endpoint = endpoint.as_str().trim_end_matches('/').to_string();
        let model = config.get_model();
        let api_key = config.get_api_key();
        let temperature = config.common.temperature;
        let timeout_secs = config.get_timeout_secs();

        let client: Arc<dyn TranslationClient> = match config.provider {
            TranslationProvider::OpenAI => {
                Arc::new(OpenAI::new(api_key, endpoint, model, temperature, timeout_secs))
            }
            TranslationProvider::Ollama => {
                Arc::new(Ollama::new(endpoint, model, temperature, timeout_secs))
            }
            TranslationProvider::Anthropic => {
                Arc::new(Anthropic::new(api_key, endpoint, model, temperature, timeout_secs))
            }
        };

        let policy = RetryPolicy {
            retry_count: config.common.retry_count,
            backoff: Duration::from_millis(config.common.retry_backoff_ms),
            timeout: Duration::from_secs(timeout_secs),
        };

        debug!(
            "Translation service using {} model {} (retries: {}, timeout: {:?})",
            config.provider.display_name(),
            config.get_model(),
            policy.retry_count,
            policy.timeout
        );

        Ok(Self::with_client(client, policy))
    }

    /// Wrap an existing client
    pub fn with_client(client: Arc<dyn TranslationClient>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn attempt(&self, request: &BatchRequest) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.policy.timeout, self.client.translate(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.policy.timeout.as_secs())),
        }
    }
}

#[async_trait]
impl TranslationClient for TranslationService {
    async fn translate(&self, request: &BatchRequest) -> Result<String, ProviderError> {
        let mut attempt = 0;

        loop {
            match self.attempt(request).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.policy.retry_count && e.is_retryable() => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "{} request failed (attempt {} of {}): {}. Retrying in {:?}",
                        self.client.name(),
                        attempt + 1,
                        self.policy.retry_count + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        self.client.name()
    }
}
