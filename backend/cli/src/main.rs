mod models_cmd;
mod repl;
mod terminal_output;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use groqchat_config::{
    config_dir, config_file_path, load_and_prepare, load_dotenv, GroqChatConfig, API_KEY_ENV,
};
use groqchat_core::{ChatError, ChatSettings, LlmProvider};
use groqchat_invoker::providers::{GroqProvider, MockProvider};
use groqchat_invoker::{ChatSession, CompletionInvoker, CycleOutcome};
use groqchat_logging::{init_logger, redact_sensitive_data, LogOptions};

use repl::Repl;
use terminal_output::{error_line, supports_color, warn_line};

#[derive(Parser)]
#[command(name = "groqchat")]
#[command(about = "Chat with Groq-hosted language models from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Model to use (see `groqchat models`)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Number of recent turns shown by /history (1-10)
    #[arg(long, global = true)]
    memory_length: Option<usize>,

    /// Number of prior turns sent to the model as context (1-10)
    #[arg(long, global = true)]
    context_window: Option<usize>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Echo replies locally instead of calling the API
    #[arg(long, global = true)]
    offline: bool,

    /// Also print logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat (default)
    Chat,
    /// Ask a single question and print the reply
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// List available models
    Models,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let color = supports_color() && std::io::stdout().is_terminal();

    load_dotenv();
    let config_dir = config_dir();
    let config_path = resolve_config_path(cli.config.as_deref(), &config_dir)?;
    let (config, warnings) = load_and_prepare(&config_path).await?;

    let log_options = LogOptions {
        dir: config.log_dir(&config_dir),
        level: config.log_level().to_string(),
        console: cli.verbose,
    };
    if let Err(e) = init_logger(&log_options) {
        eprintln!("{}", warn_line(&format!("file logging disabled: {e:#}"), color));
    }
    for warning in &warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }

    let settings = resolve_settings(&cli, &config)?;

    info!(
        config = %config_path.display(),
        model = %settings.model(),
        memory_length = settings.memory_length(),
        context_window = settings.context_window(),
        offline = cli.offline,
        "Starting groqchat"
    );

    let command = cli.command.as_ref().unwrap_or(&Commands::Chat);
    if let Commands::Models = command {
        models_cmd::run(settings.model(), color);
        return Ok(ExitCode::SUCCESS);
    }

    let invoker = CompletionInvoker::new(build_provider(cli.offline, config.api_key(), &config)?)
        .with_temperature(config.temperature())
        .with_max_tokens(config.max_tokens());

    match command {
        Commands::Ask { question } => {
            let question = question.join(" ");
            let mut session = ChatSession::new();
            match session.submit(&invoker, &settings, &question).await {
                CycleOutcome::Committed(reply) => println!("{reply}"),
                CycleOutcome::Ignored => {}
                CycleOutcome::RolledBack(e) => {
                    eprintln!("{}", error_line(&redact_sensitive_data(&e.to_string()), color));
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Chat | Commands::Models => {
            let mut repl = Repl::new(invoker, settings, color);
            let stdin = std::io::stdin();
            repl.run(stdin.lock(), &mut std::io::stdout()).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// An explicit `--config` must exist; the default location may be absent on first run.
fn resolve_config_path(explicit: Option<&Path>, config_dir: &Path) -> Result<PathBuf> {
    match explicit {
        Some(path) if !path.exists() => bail!("config file not found: {}", path.display()),
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(config_file_path(config_dir)),
    }
}

/// Config file values, overridden by command-line flags.
fn resolve_settings(cli: &Cli, config: &GroqChatConfig) -> Result<ChatSettings> {
    let mut settings = config.chat_settings()?;
    if let Some(model) = &cli.model {
        settings.set_model(model.parse()?);
    }
    if let Some(n) = cli.memory_length {
        settings.set_memory_length(n)?;
    }
    if let Some(n) = cli.context_window {
        settings.set_context_window(n)?;
    }
    Ok(settings)
}

fn build_provider(
    offline: bool,
    api_key: Option<String>,
    config: &GroqChatConfig,
) -> Result<Arc<dyn LlmProvider>> {
    if offline {
        return Ok(Arc::new(MockProvider::new("offline").echo()));
    }

    let Some(api_key) = api_key else {
        return Err(ChatError::MissingApiKey(API_KEY_ENV.to_string()).into());
    };

    let mut provider = GroqProvider::new(api_key, config.timeout())?;
    if let Some(url) = config.base_url() {
        provider = provider.with_base_url(url);
    }
    info!(provider = provider.name(), "Registered provider");
    Ok(Arc::new(provider))
}
