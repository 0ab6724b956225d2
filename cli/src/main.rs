//! CLI entrypoint for model-arena
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod args;
mod output;

use anyhow::{Context, Result, bail};
use args::{Cli, Command, DmAction, KeysAction, NicknameAction};
use arena_application::{
    AuthContext, NoObserver, NoUsage, RunComparisonUseCase, Timeouts, TurnObserver, TurnRequest,
};
use arena_application::ports::credential_store::CredentialStore;
use arena_domain::{ImageAttachment, ProviderId, TurnMode, catalog};
use arena_infrastructure::{
    BackendClient, ConfigLoader, HttpProviderGateway, JsonCredentialStore,
    config::file_config::FileConfig,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use clap::Parser;
use output::ConsoleObserver;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    let store = JsonCredentialStore::new(credential_path(&config)?);
    let backend = Arc::new(BackendClient::new(
        config.backend.base_url.clone(),
        config.backend.platform.clone(),
    ));

    if let Some(command) = cli.command {
        return run_command(command, &config, &store, &backend).await;
    }

    let Some(question) = cli.question else {
        bail!("A question is required. See --help for subcommands.");
    };

    let providers = if cli.provider.is_empty() {
        config.comparison.providers.clone()
    } else {
        cli.provider
            .iter()
            .map(|s| s.parse::<ProviderId>())
            .collect::<Result<Vec<_>, _>>()?
    };
    let judge = match &cli.judge {
        Some(name) => Some(name.parse::<ProviderId>()?),
        None => Some(config.comparison.judge),
    };

    let auth = auth_context(&config);
    let mode = if cli.local {
        TurnMode::Direct
    } else if cli.mediated {
        TurnMode::Mediated
    } else if auth.is_some() {
        TurnMode::Mediated
    } else {
        TurnMode::Direct
    };
    info!("Running in {} mode", mode);

    // mediated turns are gated on the backend credit balance
    let credits = match (&mode, &auth) {
        (TurnMode::Mediated, Some(auth)) => {
            let session = backend
                .init_session(&auth.user_id, &auth.token)
                .await
                .context("failed to initialize backend session")?;
            info!("Session: {} credits, {} tier", session.credits, session.tier);
            Some(session.credits)
        }
        _ => None,
    };

    let image = cli.image.as_deref().map(load_image).transpose()?;

    let request = TurnRequest {
        query: question,
        image,
        providers,
        mode,
        enable_judge: !cli.no_judge && config.comparison.enable_judge,
        judge,
        auth,
        credits,
    };

    let use_case = RunComparisonUseCase::new(
        Arc::new(HttpProviderGateway::new()),
        backend,
        Arc::new(store),
        Arc::new(NoUsage),
    )
    .with_timeouts(Timeouts {
        direct: Duration::from_secs(config.direct.timeout_secs),
        mediated: Duration::from_secs(config.backend.timeout_secs),
    });

    let console = ConsoleObserver::new();
    let observer: &dyn TurnObserver = if cli.quiet { &NoObserver } else { &console };
    let turn = use_case.execute(request, observer).await?;

    output::print_turn(&turn);
    Ok(())
}

async fn run_command(
    command: Command,
    config: &FileConfig,
    store: &JsonCredentialStore,
    backend: &BackendClient,
) -> Result<()> {
    match command {
        Command::Keys { action } => run_keys(action, store),
        Command::Providers => {
            for info in catalog() {
                println!(
                    "{:<12} {}  [{}]",
                    info.id.as_str(),
                    info.name,
                    info.models.join(", ")
                );
            }
            Ok(())
        }
        Command::Session => {
            let auth = require_auth(config)?;
            let session = backend.init_session(&auth.user_id, &auth.token).await?;
            println!("Credits: {}", session.credits);
            println!("Tier:    {}", session.tier);
            match session.sync_enabled {
                Some(enabled) => println!("Sync:    {}", if enabled { "on" } else { "off" }),
                None => println!("Sync:    not set"),
            }
            Ok(())
        }
        Command::Sync { state } => {
            let enabled = match state.as_str() {
                "on" => true,
                "off" => false,
                other => bail!("expected \"on\" or \"off\", got \"{other}\""),
            };
            let auth = require_auth(config)?;
            backend
                .update_sync_preference(&auth.user_id, &auth.token, enabled)
                .await?;
            println!("Sync {}", if enabled { "enabled" } else { "disabled" });
            Ok(())
        }
        Command::Nickname { action } => run_nickname(action, config, backend).await,
        Command::Dm { action } => run_dm(action, config, backend).await,
    }
}

fn run_keys(action: KeysAction, store: &JsonCredentialStore) -> Result<()> {
    match action {
        KeysAction::Set { provider, key } => {
            let provider: ProviderId = provider.parse()?;
            let key = match key {
                Some(key) => key,
                None => {
                    let mut line = String::new();
                    std::io::stdin().read_line(&mut line)?;
                    line.trim().to_string()
                }
            };
            if key.is_empty() {
                bail!("empty API key");
            }
            let mut credentials = store.load()?;
            credentials.insert(provider, key);
            store.save(&credentials)?;
            println!("Stored key for {provider}");
        }
        KeysAction::Remove { provider } => {
            let provider: ProviderId = provider.parse()?;
            let mut credentials = store.load()?;
            if credentials.remove(&provider).is_none() {
                bail!("no stored key for {provider}");
            }
            store.save(&credentials)?;
            println!("Removed key for {provider}");
        }
        KeysAction::List => {
            let credentials = store.load()?;
            if credentials.is_empty() {
                println!("No stored keys ({})", store.path().display());
                return Ok(());
            }
            let mut providers: Vec<_> = credentials.keys().collect();
            providers.sort();
            for provider in providers {
                println!("{provider}");
            }
        }
    }
    Ok(())
}

async fn run_nickname(
    action: NicknameAction,
    config: &FileConfig,
    backend: &BackendClient,
) -> Result<()> {
    match action {
        NicknameAction::Check { name } => {
            let (available, message) = backend.check_nickname(&name).await?;
            if available {
                println!("\"{name}\" is available");
            } else {
                println!(
                    "\"{name}\" is taken{}",
                    message.map(|m| format!(" ({m})")).unwrap_or_default()
                );
            }
        }
        NicknameAction::Register { name } => {
            let auth = require_auth(config)?;
            let message = backend
                .register_nickname(&auth.user_id, &auth.token, &name)
                .await?;
            println!("{}", message.unwrap_or_else(|| format!("Registered \"{name}\"")));
        }
        NicknameAction::Show => {
            let auth = require_auth(config)?;
            match backend.nickname(&auth.user_id, &auth.token).await? {
                Some(nickname) => println!("{nickname}"),
                None => println!("No nickname registered"),
            }
        }
    }
    Ok(())
}

async fn run_dm(action: DmAction, config: &FileConfig, backend: &BackendClient) -> Result<()> {
    let auth = require_auth(config)?;
    match action {
        DmAction::Send { to, message } => {
            let sent = backend
                .send_direct_message(&auth.user_id, &auth.token, &to, &message)
                .await?;
            match sent.error {
                Some(error) => bail!("send failed: {error}"),
                None => println!(
                    "Sent{}",
                    sent.message_id
                        .map(|id| format!(" (id {id})"))
                        .unwrap_or_default()
                ),
            }
        }
        DmAction::Support { message } => {
            let sent = backend
                .send_support_message(&auth.user_id, &auth.token, &message)
                .await?;
            if let Some(error) = sent.error {
                bail!("send failed: {error}");
            }
            if let Some(reply) = sent.ai_response {
                println!("{reply}");
            } else {
                println!("Sent");
            }
        }
        DmAction::List { limit } => {
            let messages = backend.list_messages(&auth.user_id, &auth.token, limit).await?;
            if messages.is_empty() {
                println!("No messages");
            }
            for message in messages {
                println!(
                    "[{}] {} -> {}: {}",
                    message.timestamp, message.from_nickname, message.to_nickname, message.content
                );
            }
        }
    }
    Ok(())
}

fn credential_path(config: &FileConfig) -> Result<PathBuf> {
    if let Some(path) = &config.credentials.path {
        return Ok(path.clone());
    }
    JsonCredentialStore::default_path().context("could not determine a config directory")
}

fn auth_context(config: &FileConfig) -> Option<AuthContext> {
    let user_id = config.auth.user_id.clone()?;
    let token = std::env::var(&config.auth.token_env).ok()?;
    Some(AuthContext { user_id, token })
}

fn require_auth(config: &FileConfig) -> Result<AuthContext> {
    auth_context(config).with_context(|| {
        format!(
            "backend auth required: set auth.user_id in config and export {}",
            config.auth.token_env
        )
    })
}

fn load_image(path: &Path) -> Result<ImageAttachment> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mime_type = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        other => bail!("unsupported image type: {:?}", other.unwrap_or("none")),
    };
    Ok(ImageAttachment {
        base64: STANDARD.encode(bytes),
        mime_type: mime_type.to_string(),
    })
}
