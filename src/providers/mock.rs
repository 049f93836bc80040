/*!
 * Mock translation client for testing.
 *
 * This module provides a client that simulates different backend behaviors:
 * - `MockClient::working()` - answers every line, numbered
 * - `MockClient::unnumbered()` - answers every line without numbering
 * - `MockClient::dropping_last(n)` - omits the last `n` lines
 * - `MockClient::failing()` - always fails with an error
 * - `MockClient::scripted(..)` - replays a fixed list of outcomes
 *
 * Every request is recorded so tests can check what was (or was not) sent.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use super::{BatchRequest, TranslationClient};

/// Behavior mode for the mock client
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns `"{n}. [T] {text}"` for every text
    Working,
    /// Returns `"[T] {text}"` lines without numbering
    Unnumbered,
    /// Numbered, but the last `count` lines are missing
    DropLast { count: usize },
    /// Always fails with a connection error
    Failing,
    /// Numbered answer after a delay
    Slow { delay_ms: u64 },
}

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Raw response text
    Text(String),
    /// Fail with a connection error carrying this message
    Fail(String),
}

/// Mock client for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockClient {
    /// Behavior once the script is exhausted
    behavior: MockBehavior,
    /// Outcomes consumed in order before falling back to `behavior`
    script: Arc<Mutex<VecDeque<MockReply>>>,
    /// Every request received
    requests: Arc<Mutex<Vec<BatchRequest>>>,
}

impl MockClient {
    /// Create a new mock client with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn unnumbered() -> Self {
        Self::new(MockBehavior::Unnumbered)
    }

    pub fn dropping_last(count: usize) -> Self {
        Self::new(MockBehavior::DropLast { count })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Replay `replies` in order, then behave like `working()`
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        let client = Self::working();
        client.script.lock().extend(replies);
        client
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<BatchRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// The translation `working()` produces for `text`
    pub fn translated(text: &str) -> String {
        format!("[T] {}", text)
    }

    fn numbered_response(texts: &[String]) -> String {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| format!("{}. {}", i + 1, Self::translated(text)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl TranslationClient for MockClient {
    async fn translate(&self, request: &BatchRequest) -> Result<String, ProviderError> {
        self.requests.lock().push(request.clone());

        let scripted = self.script.lock().pop_front();
        if let Some(reply) = scripted {
            return match reply {
                MockReply::Text(text) => Ok(text),
                MockReply::Fail(message) => Err(ProviderError::ConnectionError(message)),
            };
        }

        match self.behavior {
            MockBehavior::Working => Ok(Self::numbered_response(&request.texts)),
            MockBehavior::Unnumbered => Ok(request
                .texts
                .iter()
                .map(|text| Self::translated(text))
                .collect::<Vec<_>>()
                .join("\n")),
            MockBehavior::DropLast { count } => {
                let keep = request.texts.len().saturating_sub(count);
                Ok(Self::numbered_response(&request.texts[..keep]))
            }
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "mock backend unavailable".to_string(),
            )),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(Self::numbered_response(&request.texts))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
