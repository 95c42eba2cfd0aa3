use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::models::ChatRecord;

/// Maximum clipboard payload (10MB)
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Clipboard sink used by the chat view (mocked in tests)
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard via arboard.
///
/// The handle is opened per copy: holding it for the whole session keeps an
/// X11 selection owner alive on Linux even when nothing was copied.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Cannot copy an empty message");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Message too large for clipboard ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

/// Copy a message's text to the given clipboard.
///
/// # Errors
/// Returns error if the message is blank, larger than 10MB, or the
/// clipboard is unavailable (headless session, locked by another process).
pub fn copy_message(record: &ChatRecord, provider: &mut dyn ClipboardProvider) -> Result<()> {
    let text = record.content.trim();
    validate_clipboard_text(text)?;
    provider.set_text(text)
}
