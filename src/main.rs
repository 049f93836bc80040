// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use srtbatch::app_config::{self, Config, TranslationProvider};
use srtbatch::app_controller::{Controller, RunFlags};
use srtbatch::errors::AppError;
use srtbatch::file_utils::FileManager;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a subtitle file (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for srtbatch
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Subtitle file to translate
    #[arg(value_name = "INPUT")]
    input_path: PathBuf,

    /// Source language code (e.g., 'es', 'en', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'zh', 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Number of subtitles sent per request
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Number of batches translated at the same time
    #[arg(short = 'j', long)]
    concurrent_batches: Option<usize>,

    /// Directory for the translated file and the progress ledger
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of an existing translated file
    #[arg(short, long, visible_alias = "force")]
    force_overwrite: bool,

    /// Ignore and delete previous progress before starting
    #[arg(long)]
    fresh: bool,
}

/// srtbatch - resumable batch subtitle translation
///
/// Translates SRT subtitle files in batches through an LLM backend, recording
/// progress after every batch so an interrupted run picks up where it stopped.
#[derive(Parser, Debug)]
#[command(name = "srtbatch")]
#[command(version)]
#[command(about = "Resumable batch subtitle translation")]
#[command(long_about = "srtbatch translates SRT subtitle files through an LLM backend, one batch at a time.

Progress is appended to <name>_temp_progress.srt after every batch. Running the same
command again after an interruption only translates what is still missing.

EXAMPLES:
    srtbatch movie.srt                          # Translate using default config
    srtbatch -s en -t fr movie.srt              # Translate from English to French
    srtbatch -p ollama -m qwen3:8b movie.srt    # Use a local Ollama model
    srtbatch -b 30 -j 4 movie.srt               # Larger batches, four at a time
    srtbatch -f --fresh movie.srt               # Start over and overwrite the output
    srtbatch completions bash > srtbatch.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    openai    - Any OpenAI-compatible chat completions endpoint (requires API key)
    ollama    - Local Ollama server
    anthropic - Anthropic Claude API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file to translate
    #[arg(value_name = "INPUT")]
    input_path: Option<PathBuf>,

    /// Source language code (e.g., 'es', 'en', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'zh', 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Number of subtitles sent per request
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Number of batches translated at the same time
    #[arg(short = 'j', long)]
    concurrent_batches: Option<usize>,

    /// Directory for the translated file and the progress ledger
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of an existing translated file
    #[arg(short, long, visible_alias = "force")]
    force_overwrite: bool,

    /// Ignore and delete previous progress before starting
    #[arg(long)]
    fresh: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The filter itself is driven by log::max_level so it can change after config load
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(AppError::from(e).exit_code());
    }
}

async fn run() -> Result<()> {
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtbatch", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior: top-level args act as the translate command
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_path,
                source_language: cli.source_language,
                target_language: cli.target_language,
                provider: cli.provider,
                model: cli.model,
                batch_size: cli.batch_size,
                concurrent_batches: cli.concurrent_batches,
                output_dir: cli.output_dir,
                config_path: cli.config_path,
                log_level: cli.log_level,
                force_overwrite: cli.force_overwrite,
                fresh: cli.fresh,
            };
            run_translate(translate_args).await
        }
    }
}

/// Load the config file, writing a default one when it does not exist
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let content = FileManager::read_to_string(config_path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

/// Apply command line overrides on top of the loaded config
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(batch_size) = options.batch_size {
        config.pipeline.batch_size = batch_size;
    }

    if let Some(concurrent_batches) = options.concurrent_batches {
        config.pipeline.concurrent_batches = concurrent_batches;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // Apply the command line level before the config is read
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let mut config = load_or_create_config(&options.config_path)?;
    apply_overrides(&mut config, &options);
    log::set_max_level(config.log_level.into());

    config.validate().context("Configuration validation failed")?;

    if !options.input_path.is_file() {
        return Err(anyhow!("Input file does not exist: {:?}", options.input_path));
    }

    let controller = Controller::with_config(config)?;
    let flags = RunFlags {
        force_overwrite: options.force_overwrite,
        fresh: options.fresh,
    };

    if let Some(report) = controller
        .run(options.input_path.clone(), options.output_dir.clone(), flags)
        .await?
    {
        info!(
            "Translated: {}, failed: {}, missing: {}, total: {} ({:.1}% complete)",
            report.translated,
            report.failed,
            report.missing,
            report.total,
            report.completeness_ratio() * 100.0
        );
        if report.shortfall_batches > 0 {
            warn!(
                "{} batches returned fewer lines than requested ({} positions padded)",
                report.shortfall_batches, report.padded_positions
            );
        }
    }

    Ok(())
}
