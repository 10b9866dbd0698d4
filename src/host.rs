// Line-delimited JSON transport between the webview host and the event loop.

use std::io::BufRead;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::error::NavError;
use crate::state::{HostMessage, NavEvent};

/// Parse one input line. Blank lines yield `None`.
pub fn parse_event(line: &str) -> Result<Option<NavEvent>, NavError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

/// Read events from `input` until EOF or until the loop stops listening.
/// Blocking; run it on its own thread.
pub fn read_events<R: BufRead>(input: R, events: mpsc::UnboundedSender<NavEvent>) {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("[Host] Failed to read input: {}", e);
                break;
            }
        };
        match parse_event(&line) {
            Ok(Some(event)) => {
                if events.send(event).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("[Host] Skipping malformed event {:?}: {}", line, e),
        }
    }
    log::debug!("[Host] Input closed");
}

/// Write each message as one JSON line until the sender side is dropped.
pub async fn write_messages<W>(
    mut output: W,
    mut messages: mpsc::UnboundedReceiver<HostMessage>,
) -> Result<(), NavError>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    while let Some(msg) = messages.recv().await {
        let mut line = serde_json::to_string(&msg)?;
        line.push('\n');
        output.write_all(line.as_bytes()).await?;
        output.flush().await?;
    }
    Ok(())
}
