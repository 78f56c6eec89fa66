mod activity;
mod api;
mod cart;
mod cli;
mod config;
mod models;
mod render;
mod routes;
mod services;
mod session;
mod storage;
mod theme;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "courtside",
    about = "Book badminton courts and shop for gear from the terminal"
)]
pub struct Args {
    #[arg(short, long, help = "Run one command and exit")]
    pub command: Option<String>,

    #[arg(long, env = "COURTSIDE_API_BASE_URL", help = "Backend API base URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "COURTSIDE_TIMEOUT_MS", help = "Request timeout in milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "COURTSIDE_DATA_DIR", help = "Directory for session, cart and theme")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Do not write the activity log")]
    pub no_activity: bool,

    #[arg(long, help = "Verbose output (print API calls)")]
    pub verbose: bool,

    #[arg(long, help = "Debug output (print settings and session state)")]
    pub debug: bool,
}

impl Args {
    /// Command-line values as the topmost config layer
    fn as_config(&self) -> config::Config {
        let mut cfg = config::Config::default();
        cfg.api.base_url = self.base_url.clone();
        cfg.api.timeout_ms = self.timeout_ms;
        cfg.storage.data_dir = self.data_dir.clone();
        if self.no_activity {
            cfg.activity.enabled = Some(false);
        }
        cfg
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: ignoring config files: {:#}", e);
            config::Config::default()
        })
    };
    cfg.merge(args.as_config());

    if let Err(errors) = cfg.validate() {
        for error in &errors {
            eprintln!("Config error {}", error);
        }
        anyhow::bail!("Invalid configuration ({} error(s))", errors.len());
    }

    let data_dir = cfg.data_dir();
    let storage = storage::Storage::open(&data_dir)?;

    if args.debug {
        eprintln!("[DEBUG] Timeout: {:?}", cfg.timeout());
        eprintln!("[DEBUG] Data dir: {}", data_dir.display());
    }

    let session_id = uuid::Uuid::new_v4().to_string();
    let transport = api::UreqTransport::new(cfg.timeout());
    let mut client = api::ApiClient::new(cfg.base_url(), Box::new(transport), storage.clone())
        .with_verbose(args.verbose);
    if args.debug {
        eprintln!("[DEBUG] Base URL: {}", client.base_url());
    }

    if cfg.activity_enabled() {
        let dir = cfg.activity_dir();
        let path = dir.join(format!("{}.jsonl", session_id));
        match activity::ActivityLog::new(&path, &session_id) {
            Ok(log) => {
                if args.debug {
                    eprintln!("[DEBUG] Activity log: {}", path.display());
                }
                client = client.with_activity(log.shared());
            }
            Err(e) => eprintln!("Warning: activity log disabled: {:#}", e),
        }
        match activity::prune(&dir, cfg.activity_keep_sessions()) {
            Ok(removed) if args.debug && removed > 0 => {
                eprintln!("[DEBUG] Pruned {} old activity log(s)", removed);
            }
            Ok(_) => {}
            Err(e) => eprintln!("Warning: could not prune activity logs: {:#}", e),
        }
    }

    let sessions = session::SessionStore::new(storage);
    let had_token = sessions.token().is_some();
    let snapshot = sessions.restore(Utc::now())?;
    if had_token && !snapshot.is_authenticated() {
        if let Some(log) = client.activity() {
            if let Err(e) = log.borrow_mut().session_cleared("expired") {
                eprintln!("Warning: activity log write failed: {}", e);
            }
        }
        eprintln!("Your saved session has expired, please log in again");
    }
    if args.debug {
        eprintln!(
            "[DEBUG] Session: {}",
            match (&snapshot.user, snapshot.role()) {
                (Some(user), Some(role)) => format!("{} ({})", user.email, role),
                _ => "anonymous".to_string(),
            }
        );
    }

    let mut ctx = cli::Context::new(client, &session_id);
    ctx.history_path = Some(data_dir.join("history.txt"));

    if let Some(command) = &args.command {
        cli::run_once(&ctx, command)
    } else {
        cli::run_repl(ctx)
    }
}
