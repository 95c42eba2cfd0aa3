use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::{ChatBackend, HttpBackend};
use crate::config::{
    ClientConfig, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS, default_download_dir,
    default_quick_questions, default_state_dir,
};
use crate::logging;
use crate::models::ChatRecord;
use crate::transcript::{save_transcript, write_transcript};
use crate::tui::{format_last_active, run_interactive};
use crate::utils::{format_path_with_tilde, strip_ansi_codes};

#[derive(Parser, Debug)]
#[command(name = "medigenius-chat")]
#[command(version)]
#[command(about = "Terminal chat client for the MediGenius medical assistant", long_about = None)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "MEDIGENIUS_SERVER", default_value = DEFAULT_SERVER_URL, global = true)]
    pub server: String,

    /// Directory for preferences and the log file
    #[arg(long, env = "MEDIGENIUS_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Directory chat exports are written to
    #[arg(long, env = "MEDIGENIUS_DOWNLOAD_DIR", global = true)]
    pub download_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,

    /// Welcome-screen question (repeat for more, up to four are bound to F1-F4)
    #[arg(long = "quick-question", value_name = "QUESTION")]
    pub quick_questions: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List saved chat sessions
    Sessions,
    /// Write a session's transcript to a file
    Export {
        /// Session to export
        session_id: String,
        /// Output file (defaults to a timestamped file in the download directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that the backend is up
    Health,
}

impl Cli {
    /// Resolve flags and environment into the runtime configuration
    pub fn config(&self) -> Result<ClientConfig> {
        let state_dir = match &self.state_dir {
            Some(dir) => dir.clone(),
            None => default_state_dir()?,
        };
        let download_dir = match &self.download_dir {
            Some(dir) => dir.clone(),
            None => default_download_dir()?,
        };
        let quick_questions = if self.quick_questions.is_empty() {
            default_quick_questions()
        } else {
            self.quick_questions.clone()
        };

        Ok(ClientConfig {
            server_url: self.server.clone(),
            state_dir,
            download_dir,
            timeout: Duration::from_secs(self.timeout_secs),
            quick_questions,
        })
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;

    if let Err(e) = logging::init(&config.log_path()) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    match &cli.command {
        Some(Commands::Sessions) => list_sessions(&config)?,
        Some(Commands::Export { session_id, output }) => {
            export_session(&config, session_id, output.as_ref())?;
        }
        Some(Commands::Health) => check_health(&config)?,
        None => run_interactive(&config)?,
    }

    Ok(())
}

fn connect(config: &ClientConfig) -> Result<HttpBackend> {
    HttpBackend::new(&config.server_url, config.timeout)
        .with_context(|| format!("Failed to create client for {}", config.server_url))
}

fn list_sessions(config: &ClientConfig) -> Result<()> {
    let backend = connect(config)?;
    let list = backend.list_sessions().context("Failed to load chats")?;
    if !list.success {
        bail!("Failed to load chats");
    }

    if list.sessions.is_empty() {
        println!("No chat history yet");
        return Ok(());
    }

    for session in &list.sessions {
        println!(
            "{}  {:>10}  {}",
            session.session_id,
            format_last_active(session.last_active.as_ref()),
            strip_ansi_codes(session.title())
        );
    }
    Ok(())
}

fn export_session(config: &ClientConfig, session_id: &str, output: Option<&PathBuf>) -> Result<()> {
    let backend = connect(config)?;
    let page = backend
        .session_messages(session_id)
        .with_context(|| format!("Failed to load chat {}", session_id))?;
    if !page.success {
        bail!("Failed to load chat {}", session_id);
    }

    let records: Vec<ChatRecord> = page.messages.into_iter().map(ChatRecord::from).collect();
    if records.is_empty() {
        bail!("No messages to download");
    }

    let path = match output {
        Some(path) => {
            write_transcript(path, &records)?;
            path.clone()
        }
        None => save_transcript(&config.download_dir, &records, Utc::now())?,
    };

    info!(session_id, messages = records.len(), path = %path.display(), "session exported");
    println!("Chat downloaded successfully: {}", format_path_with_tilde(&path));
    Ok(())
}

fn check_health(config: &ClientConfig) -> Result<()> {
    let backend = connect(config)?;
    let health = backend
        .health()
        .with_context(|| format!("Backend at {} is unreachable", config.server_url))?;

    match health.service {
        Some(service) => println!("{} ({})", health.status, service),
        None => println!("{}", health.status),
    }
    Ok(())
}
