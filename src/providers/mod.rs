/*!
 * Translation backends.
 *
 * The pipeline only knows the `TranslationClient` capability defined here. It is
 * handed an implementation at construction time and never resolves one itself.
 *
 * - `openai`: any OpenAI-compatible chat-completions endpoint
 * - `ollama`: local Ollama server
 * - `anthropic`: Anthropic messages API
 * - `mock`: scripted client for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One batch worth of texts to translate
///
/// Texts carry no identifiers. Position is identity: `texts[i]` belongs to the
/// i-th segment of the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    /// System prompt describing the language pair and output format
    pub prompt_template: String,

    /// Source texts in batch order
    pub texts: Vec<String>,
}

impl BatchRequest {
    pub fn new(prompt_template: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            prompt_template: prompt_template.into(),
            texts,
        }
    }

    /// User message body: one `"{n}. {text}"` line per text, numbered from 1
    pub fn numbered_input(&self) -> String {
        self.texts
            .iter()
            .enumerate()
            .map(|(i, text)| format!("{}. {}", i + 1, text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Request/response boundary to a translation backend
///
/// Implementations return the backend's raw text. The caller treats it as
/// untrusted: it may hold fewer lines than requested, extra numbering, or
/// nothing useful at all.
#[async_trait]
pub trait TranslationClient: Send + Sync + Debug {
    /// Send one batch and return the raw response text
    async fn translate(&self, request: &BatchRequest) -> Result<String, ProviderError>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;
