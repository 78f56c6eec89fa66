//! Append-only JSONL activity log.
//!
//! One line per event: API traffic, session changes, cart mutations and
//! command outcomes. Every line carries a timestamp and the client session id.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

/// Activity log shared between the API client and the command layer
pub type SharedActivity = Rc<RefCell<ActivityLog>>;

pub struct ActivityLog {
    pub path: PathBuf,
    session_id: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl ActivityLog {
    pub fn new(path: &Path, session_id: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            session_id: session_id.to_string(),
            file,
        })
    }

    pub fn shared(self) -> SharedActivity {
        Rc::new(RefCell::new(self))
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn api_request(&mut self, method: &str, url: &str, authenticated: bool) -> Result<()> {
        self.log(
            "api_request",
            serde_json::json!({
                "method": method,
                "url": url,
                "authenticated": authenticated,
            }),
        )
    }

    pub fn api_response(
        &mut self,
        method: &str,
        url: &str,
        status: u16,
        duration_ms: u64,
    ) -> Result<()> {
        self.log(
            "api_response",
            serde_json::json!({
                "method": method,
                "url": url,
                "status": status,
                "duration_ms": duration_ms,
            }),
        )
    }

    pub fn api_error(&mut self, method: &str, url: &str, error: &str) -> Result<()> {
        self.log(
            "api_error",
            serde_json::json!({
                "method": method,
                "url": url,
                "error": error,
            }),
        )
    }

    /// Stored credentials were dropped (expired token, 401/403, logout)
    pub fn session_cleared(&mut self, reason: &str) -> Result<()> {
        self.log("session_cleared", serde_json::json!({ "reason": reason }))
    }

    pub fn session_started(&mut self, user_id: i64, role: &str) -> Result<()> {
        self.log(
            "session_started",
            serde_json::json!({ "user_id": user_id, "role": role }),
        )
    }

    pub fn cart_mutation(
        &mut self,
        op: &str,
        product_id: Option<i64>,
        item_count: u64,
        total_amount: f64,
    ) -> Result<()> {
        self.log(
            "cart_mutation",
            serde_json::json!({
                "op": op,
                "product_id": product_id,
                "item_count": item_count,
                "total_amount": total_amount,
            }),
        )
    }

    /// Log the gate outcome and result of a command
    pub fn command(&mut self, name: &str, outcome: &str, ok: bool) -> Result<()> {
        self.log(
            "command",
            serde_json::json!({ "name": name, "outcome": outcome, "ok": ok }),
        )
    }
}

/// Delete all but the `keep` most recently modified session logs in `dir`.
/// Returns how many files were removed.
pub fn prune(dir: &Path, keep: usize) -> Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e).with_context(|| format!("reading {}", dir.display())),
    };

    let mut logs: Vec<(SystemTime, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "jsonl"))
        .filter_map(|path| {
            let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .collect();
    logs.sort_by(|a, b| b.cmp(a));

    let mut removed = 0;
    for (_, path) in logs.into_iter().skip(keep) {
        std::fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}
