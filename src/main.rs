// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use eduspeak::app_config::{self, Config, TranslationProvider, TranslationStrategy};
use eduspeak::app_controller::{Controller, DocumentStatus};
use eduspeak::file_utils::FileManager;
use eduspeak::language_utils::TargetLanguage;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for TranslationStrategy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationStrategy {
    /// Prompt the configured LLM provider
    Llm,
    /// Google Cloud Translation
    Direct,
}

impl From<CliTranslationStrategy> for TranslationStrategy {
    fn from(cli_strategy: CliTranslationStrategy) -> Self {
        match cli_strategy {
            CliTranslationStrategy::Llm => TranslationStrategy::Llm,
            CliTranslationStrategy::Direct => TranslationStrategy::Direct,
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
    /// Summarize, translate and speak a PDF (or every PDF in a directory)
    Process(ProcessArgs),

    /// List the supported target languages
    Languages,

    /// Generate shell completions for eduspeak
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input PDF file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Target language code (ta, kn, hi, te, ml)
    #[arg(short, long)]
    target_language: Option<String>,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Translation strategy
    #[arg(long, value_enum)]
    strategy: Option<CliTranslationStrategy>,

    /// LLM provider for prompted translation
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name for the LLM provider
    #[arg(short, long)]
    model: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// API key for the active LLM provider
    #[arg(long, env = "EDUSPEAK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API key for the direct translation service
    #[arg(long, env = "EDUSPEAK_TRANSLATION_API_KEY", hide_env_values = true)]
    translation_api_key: Option<String>,

    /// API token for the summarization service
    #[arg(long, env = "EDUSPEAK_SUMMARIZATION_API_KEY", hide_env_values = true)]
    summarization_api_key: Option<String>,
}

/// EduSpeak - listen to your documents in your own language
///
/// Extracts the text of a PDF, summarizes it, translates the summary into an
/// Indian regional language and reads it out as MP3.
#[derive(Parser, Debug)]
#[command(name = "eduspeak")]
#[command(version)]
#[command(about = "Summarize, translate and speak PDF documents")]
#[command(long_about = "EduSpeak turns a PDF into a spoken summary in Tamil, Kannada, Hindi, Telugu or Malayalam.

EXAMPLES:
    eduspeak process lecture.pdf                  # Tamil, using conf.json
    eduspeak process -t hi lecture.pdf            # Hindi
    eduspeak process --strategy direct notes.pdf  # Google Cloud Translation
    eduspeak process -p ollama -m llama3 docs/    # Every PDF under docs/
    eduspeak languages                            # List target languages
    eduspeak completions bash > eduspeak.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

OUTPUTS:
    <name>.summary.txt, <name>.<lang>.txt and <name>.<lang>.mp3")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation, filtered by `log::max_level()`
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Level is lowered or raised once the config is known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "eduspeak", &mut std::io::stdout());
            Ok(())
        }
        Commands::Languages => {
            for language in TargetLanguage::ALL {
                match language.native_name() {
                    Some(native) => println!("{}  {:<10} {}", language.code(), language.english_name(), native),
                    None => println!("{}  {}", language.code(), language.english_name()),
                }
            }
            Ok(())
        }
        Commands::Process(args) => run_process(args).await,
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &ProcessArgs) -> Result<()> {
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.parse()?;
    }

    if let Some(strategy) = &options.strategy {
        config.translation.strategy = strategy.clone().into();
    }

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }

    if let Some(api_key) = &options.api_key {
        config.translation.active_provider_config_mut().api_key = api_key.clone();
    }

    if let Some(api_key) = &options.translation_api_key {
        config.translation.direct.api_key = api_key.clone();
    }

    if let Some(api_key) = &options.summarization_api_key {
        config.summarization.api_key = api_key.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(())
}

async fn run_process(options: ProcessArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(LevelFilter::from(&level));
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options)?;
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(LevelFilter::from(&config.log_level));

    info!(
        "Target language: {} ({}), translation: {}",
        config.target_language.english_name(),
        config.target_language,
        config.translation.strategy
    );

    let controller = Controller::with_config(config)?;
    let input_path = &options.input_path;

    if FileManager::file_exists(input_path) {
        let output_dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| input_path.parent().unwrap_or(Path::new(".")).to_path_buf());
        let status = controller
            .run(input_path.clone(), output_dir, options.force_overwrite)
            .await?;
        if status == DocumentStatus::Aborted {
            return Err(anyhow!("No text could be extracted from {:?}", input_path));
        }
    } else if FileManager::dir_exists(input_path) {
        let output_root = options.output_dir.clone().unwrap_or_else(|| input_path.clone());
        controller
            .run_folder(input_path.clone(), output_root, options.force_overwrite)
            .await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
