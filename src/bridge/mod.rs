//! Headless host bridge (`pedagent serve`).
//!
//! Reads line-delimited JSON [`HostMessage`]s from stdin and writes
//! line-delimited JSON [`PanelMessage`]s to stdout. Everything runs on one
//! event loop:
//!
//! - [`protocol`]: wire types and panel snapshots
//! - [`session`] : `BridgeSession`, the synchronous state behind the loop
//!
//! Chat requests are delivered on blocking worker threads (the HTTP client is
//! synchronous) and their results are fed back into the loop through a
//! channel, so panel state is only ever touched from the loop itself.

pub mod protocol;
pub mod session;

pub use protocol::{HostAction, HostMessage, PanelMessage, PanelSnapshot};
pub use session::{BridgeSession, PendingChat, Step};

use anyhow::{Context, Result};
use pedagent_chat::ChatBackend;
use pedagent_config::Config;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

type Completion = (PendingChat, Result<String, String>);

/// Serve the bridge on the process's stdin/stdout until stdin closes.
pub async fn run_stdio(backend: Arc<dyn ChatBackend>, config: Config) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_bridge(stdin, stdout, backend, config).await
}

/// Serve the bridge over arbitrary streams.
///
/// Returns once `input` reaches EOF and every outstanding chat request has
/// completed.
pub async fn run_bridge<R, W>(
    input: R,
    mut output: W,
    backend: Arc<dyn ChatBackend>,
    config: Config,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    log::info!("Host bridge started");
    let mut session = BridgeSession::new(config);
    let mut lines = input.lines();
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut input_open = true;
    let mut outstanding = 0usize;

    while input_open || outstanding > 0 {
        let deadline = session.next_deadline();

        let step = tokio::select! {
            line = lines.next_line(), if input_open => {
                match line.context("Failed to read host message")? {
                    Some(line) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        log::trace!("<- {}", trimmed);
                        session.handle_line(trimmed, Instant::now())
                    }
                    None => {
                        log::info!("Host closed input ({} chat request(s) outstanding)", outstanding);
                        input_open = false;
                        continue;
                    }
                }
            }
            Some((pending, result)) = rx.recv() => {
                outstanding = outstanding.saturating_sub(1);
                session.complete_chat(&pending, result)
            }
            _ = wait_until(deadline), if input_open => {
                session.poll(Instant::now())
            }
            else => break,
        };

        for pending in step.chats {
            outstanding += 1;
            spawn_chat(Arc::clone(&backend), pending, tx.clone());
        }
        for message in &step.messages {
            write_message(&mut output, message).await?;
        }
    }

    log::info!("Host bridge stopped");
    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn spawn_chat(backend: Arc<dyn ChatBackend>, pending: PendingChat, tx: mpsc::UnboundedSender<Completion>) {
    tokio::spawn(async move {
        let message = pending.dispatch.request.message.clone();
        let result = match tokio::task::spawn_blocking(move || backend.send(&message)).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(e) => {
                log::error!("Chat worker panicked: {}", e);
                Err("chat worker failed".to_string())
            }
        };
        if tx.send((pending, result)).is_err() {
            log::debug!("Bridge stopped before chat completion was delivered");
        }
    });
}

async fn write_message<W>(output: &mut W, message: &PanelMessage) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(message).context("Failed to encode panel message")?;
    log::trace!("-> {}", line);
    line.push('\n');
    output
        .write_all(line.as_bytes())
        .await
        .context("Failed to write panel message")?;
    output.flush().await.context("Failed to flush output")?;
    Ok(())
}
