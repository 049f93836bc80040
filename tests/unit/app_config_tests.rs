/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;

use srtbatch::app_config::{Config, LogLevel, PipelineConfig, ProviderConfig, TranslationProvider};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "es");
    assert_eq!(config.target_language, "zh");
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.translation.get_model(), "gpt-4o-mini");
    assert_eq!(config.translation.get_endpoint(), "https://api.openai.com/v1");
    assert_eq!(config.translation.get_timeout_secs(), 120);
    assert!((config.translation.common.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(config.pipeline.batch_size, 20);
    assert_eq!(config.pipeline.concurrent_batches, 1);
    assert_eq!(config.pipeline.ledger_suffix, "_temp_progress");
    assert!(config.pipeline.output_dir.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    // OpenAI needs a key
    assert!(config.validate().is_err());
    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());

    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "es".to_string();

    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "zh".to_string();

    config.pipeline.concurrent_batches = 0;
    assert!(config.validate().is_err());
    config.pipeline.concurrent_batches = 4;
    assert!(config.validate().is_ok());
}

/// Test that a saved config loads back with the same values
#[test]
fn test_config_serialization_withCustomValues_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.active_provider_config_mut().model = "llama3".to_string();
    config.pipeline = PipelineConfig {
        batch_size: 30,
        concurrent_batches: 2,
        ledger_suffix: "_progress".to_string(),
        output_dir: Some(temp_dir.path().join("out")),
    };

    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config)?)?;
    let loaded: Config = serde_json::from_str(&std::fs::read_to_string(&path)?)?;

    assert_eq!(loaded.translation.provider, TranslationProvider::Ollama);
    assert_eq!(loaded.translation.get_model(), "llama3");
    assert_eq!(loaded.pipeline.batch_size, 30);
    assert_eq!(loaded.pipeline.ledger_suffix, "_progress");
    assert_eq!(loaded.pipeline.output_dir, config.pipeline.output_dir);
    Ok(())
}

/// Test that a provider block missing from the list falls back to defaults
#[test]
fn test_translation_config_withMissingProviderBlock_shouldUseDefaults() {
    let mut config = Config::default();
    config.translation.available_providers = vec![ProviderConfig::new(TranslationProvider::OpenAI)];
    config.translation.provider = TranslationProvider::Anthropic;

    assert!(config.translation.get_active_provider_config().is_none());
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert!(config.translation.get_api_key().is_empty());
}

/// Test provider parsing from strings
#[test]
fn test_translation_provider_fromStr_shouldParseKnownNames() {
    assert_eq!("OpenAI".parse::<TranslationProvider>().unwrap(), TranslationProvider::OpenAI);
    assert_eq!("ollama".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert!("lmstudio".parse::<TranslationProvider>().is_err());
}

/// Test the rendered prompt keeps the numbering instruction
#[test]
fn test_render_prompt_withLanguagePair_shouldNameBothLanguages() -> Result<()> {
    let mut config = Config::default();
    config.source_language = "en".to_string();
    config.target_language = "fr".to_string();

    let prompt = config.render_prompt()?;

    assert!(prompt.contains("English"));
    assert!(prompt.contains("French"));
    assert!(prompt.contains("1. "));
    Ok(())
}
