//! Plain-text chat export.
//!
//! Layout: a fixed header line, a rule of 50 `=`, a blank line, then one
//! block per message:
//!
//! ```text
//! [09:05 AM] You:
//! I have a headache
//!
//! [09:05 AM] MediGenius:
//! Rest and drink water.
//! Source: Medical Book
//!
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::ChatRecord;

pub const EXPORT_HEADER: &str = "MediGenius Chat Export";
const RULE_WIDTH: usize = 50;

/// Render messages as a transcript, in the order given
pub fn render_transcript(records: &[ChatRecord]) -> String {
    let mut out = String::new();
    out.push_str(EXPORT_HEADER);
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    for record in records {
        out.push_str(&format!("[{}] {}:\n", record.timestamp, record.role.sender_label()));
        out.push_str(&record.content);
        out.push('\n');
        if let Some(source) = &record.source {
            out.push_str(&format!("Source: {}\n", source));
        }
        out.push('\n');
    }

    out
}

/// File name for an export taken at `now`
pub fn transcript_file_name(now: DateTime<Utc>) -> String {
    format!("medigenius-chat-{}.txt", now.timestamp_millis())
}

/// Write a transcript of `records` into `dir` and return the file path.
///
/// Refuses to write an empty history.
pub fn save_transcript(dir: &Path, records: &[ChatRecord], now: DateTime<Utc>) -> Result<PathBuf> {
    if records.is_empty() {
        bail!("No messages to download");
    }
    let path = dir.join(transcript_file_name(now));
    write_transcript(&path, records)?;
    Ok(path)
}

/// Write a transcript to an explicit path, creating parent directories
pub fn write_transcript(path: &Path, records: &[ChatRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, render_transcript(records))
        .with_context(|| format!("Failed to write transcript {}", path.display()))?;
    info!(path = %path.display(), messages = records.len(), "transcript written");
    Ok(())
}
