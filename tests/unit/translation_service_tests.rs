/*!
 * Tests for the retrying translation service
 */

use std::sync::Arc;
use std::time::Duration;

use srtbatch::app_config::{TranslationConfig, TranslationProvider};
use srtbatch::errors::ProviderError;
use srtbatch::providers::{BatchRequest, TranslationClient};
use srtbatch::translation::{RetryPolicy, TranslationService};
use crate::common::{MockClient, MockReply};

fn quick_policy(retry_count: u32) -> RetryPolicy {
    RetryPolicy {
        retry_count,
        backoff: Duration::from_millis(1),
        timeout: Duration::from_millis(500),
    }
}

/// Test that the configured provider is the one wrapped
#[test]
fn test_new_withEachProvider_shouldSelectMatchingClient() {
    for (provider, name) in [
        (TranslationProvider::OpenAI, "openai"),
        (TranslationProvider::Ollama, "ollama"),
        (TranslationProvider::Anthropic, "anthropic"),
    ] {
        let mut config = TranslationConfig::default();
        config.provider = provider;

        let service = TranslationService::new(&config).unwrap();
        assert_eq!(service.name(), name);
    }
}

/// Test that an unusable endpoint is rejected up front
#[test]
fn test_new_withBlankEndpoint_shouldFail() {
    let mut config = TranslationConfig::default();
    config.active_provider_config_mut().endpoint = "http://".to_string();

    assert!(TranslationService::new(&config).is_err());
}

/// Test that authentication failures are not retried
#[test]
fn test_translate_withAuthenticationError_shouldNotRetry() {
    #[derive(Debug, Default)]
    struct Unauthorized {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TranslationClient for Unauthorized {
        async fn translate(&self, _request: &BatchRequest) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(ProviderError::AuthenticationError("invalid key".into()))
        }

        fn name(&self) -> &str {
            "unauthorized"
        }
    }

    let client = Arc::new(Unauthorized::default());
    let service = TranslationService::with_client(client.clone(), quick_policy(3));
    let request = BatchRequest::new("prompt", vec!["hola".into()]);

    let result = tokio_test::block_on(service.translate(&request));

    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
    assert_eq!(client.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

/// Test that transient failures are retried and the response passed through
#[tokio::test]
async fn test_translate_withTransientFailure_shouldReturnRawResponse() {
    let mock = MockClient::scripted(vec![
        MockReply::Fail("connection reset".into()),
        MockReply::Text("Sure!\n1. Hello".into()),
    ]);
    let service = TranslationService::with_client(Arc::new(mock.clone()), quick_policy(2));
    let request = BatchRequest::new("prompt", vec!["Hola".into()]);

    let raw = service.translate(&request).await.unwrap();

    assert_eq!(raw, "Sure!\n1. Hello");
    assert_eq!(mock.call_count(), 2);
    assert_eq!(mock.requests()[1], request);
}
