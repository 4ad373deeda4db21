use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use serde::Deserialize;
use teloxide::prelude::*;
use teloxide::types::{
    AllowedUpdate, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, UpdateKind,
};
use tokio::sync::Mutex;

mod archive;
mod callback_handlers;
mod helpers;
mod keyboard;
mod message_handlers;
mod navigation;

const PAGE_SIZE: usize = 5;
const SESSION_TTL_SECS: u64 = 20;
const POLL_TIMEOUT_SECS: u32 = 25;
const POLL_RETRY_SECS: u64 = 5;

#[derive(Debug, Deserialize, Clone)]
struct Config {
    token: String,
    authorized_users: Vec<u64>,
    archive_dir: PathBuf,
    latest_log_path: PathBuf,
    session_timeout_seconds: Option<u64>,
    poll_retry_seconds: Option<u64>,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    config: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Year,
    Month,
    Day,
}

#[derive(Clone, Debug)]
struct Session {
    stage: Stage,
    year: Option<String>,
    month: Option<u32>,
    page: usize,
    last_active: Instant,
}

impl Session {
    fn new() -> Self {
        Session {
            stage: Stage::Year,
            year: None,
            month: None,
            page: 0,
            last_active: Instant::now(),
        }
    }

    fn reset(&mut self) {
        *self = Session::new();
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_active.elapsed() > ttl
    }

    /// Pre-evaluation gate: a session idle past `ttl` is reset and the
    /// inbound action discarded (returns true); otherwise the activity
    /// clock is refreshed and the action proceeds.
    fn expire_or_touch(&mut self, ttl: Duration) -> bool {
        if self.is_expired(ttl) {
            self.reset();
            true
        } else {
            self.touch();
            false
        }
    }
}

/// One listing entry: a display label plus the numeric code that selects it.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ArchiveEntry {
    label: String,
    code: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct KeyboardItem {
    label: String,
    value: String,
}

struct AppState {
    config: Config,
    sessions: Mutex<HashMap<i64, Session>>,
}

impl AppState {
    fn is_authorized(&self, user_id: u64) -> bool {
        self.config.authorized_users.contains(&user_id)
    }

    fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.config.session_timeout_seconds.unwrap_or(SESSION_TTL_SECS))
    }

    fn poll_retry(&self) -> Duration {
        Duration::from_secs(self.config.poll_retry_seconds.unwrap_or(POLL_RETRY_SECS))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(&args.config)?;

    let state = Arc::new(AppState {
        config: config.clone(),
        sessions: Mutex::new(HashMap::new()),
    });

    let bot = Bot::new(config.token);
    info!("bot starting");
    run_poll_loop(bot, state).await
}

fn load_config(path: &Path) -> Result<Config> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config: Config = toml::from_str(&contents).context("parse config")?;
    Ok(config)
}

/// Long-poll loop. Owns the update offset: the offset is advanced past every
/// update pulled from a batch, whether or not handling succeeded, so a
/// failing update is consumed instead of redelivered forever.
async fn run_poll_loop(bot: Bot, state: Arc<AppState>) -> Result<()> {
    // One persistent listener: a signal arriving while a handler is running
    // (outside the select) must not be lost.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut offset: i32 = 0;
    loop {
        let batch = tokio::select! {
            _ = &mut ctrl_c => {
                info!("shutdown signal received, exiting");
                return Ok(());
            }
            result = async {
                bot.get_updates()
                    .offset(offset)
                    .timeout(POLL_TIMEOUT_SECS)
                    .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery])
                    .await
            } => result,
        };

        let updates = match batch {
            Ok(updates) => updates,
            Err(err) => {
                error!("get_updates failed: {:#}", err);
                tokio::time::sleep(state.poll_retry()).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.id + 1);
            if let Err(err) = dispatch_update(&bot, &state, update.kind).await {
                error!("update handling failed: {:#}", err);
            }
        }
    }
}

async fn dispatch_update(bot: &Bot, state: &Arc<AppState>, kind: UpdateKind) -> Result<()> {
    match kind {
        UpdateKind::Message(msg) => {
            message_handlers::handle_message(bot.clone(), msg, state.clone()).await
        }
        UpdateKind::CallbackQuery(q) => {
            callback_handlers::handle_callback(bot.clone(), q, state.clone()).await
        }
        _ => Ok(()),
    }
}
