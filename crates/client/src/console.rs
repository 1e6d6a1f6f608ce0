//! Line-oriented console loop.
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tower_core::group_paragraphs;
use tower_runtime::{RuntimeHandle, SessionEvent};
use tracing::{debug, warn};

use crate::config::ClientConfig;

const GREETING: &str = "Type start to begin your climb, or help for commands.";
const WELCOME_BACK: &str = "Welcome back.";

/// Split an input line into a lowercase command and its arguments.
///
/// Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<(String, Vec<String>)> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_ascii_lowercase();
    Some((command, words.map(str::to_owned).collect()))
}

/// Drives one player's session from a line source.
pub struct Console {
    handle: RuntimeHandle,
    config: ClientConfig,
}

impl Console {
    pub fn new(handle: RuntimeHandle, config: ClientConfig) -> Self {
        Self { handle, config }
    }

    /// Read commands until end of input or `quit`, writing replies and the
    /// player's timer events to `output`.
    pub async fn run<R, W>(
        &self,
        input: R,
        output: &mut W,
        mut events: broadcast::Receiver<SessionEvent>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.greet(output).await?;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Input closed");
                        break;
                    };
                    let Some((command, args)) = parse_line(&line) else {
                        continue;
                    };
                    if matches!(command.as_str(), "quit" | "exit") {
                        break;
                    }
                    let replies = self
                        .handle
                        .handle(
                            self.config.player_id.as_str(),
                            self.config.player_name.as_str(),
                            command,
                            args,
                            self.config.authority(),
                        )
                        .await?;
                    write_lines(output, &replies).await?;
                }
                event = events.recv() => match event {
                    Ok(event) if event.player_id == self.config.player_id => {
                        write_lines(output, &event.lines).await?;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Console fell behind on session events");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        output.flush().await?;
        Ok(())
    }

    /// Replay the last narration of a saved run, or prompt a new player.
    async fn greet<W>(&self, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let saved = self.handle.snapshot(self.config.player_id.as_str()).await?;
        match saved {
            Some(snapshot) if snapshot.state.name != "start" => {
                let mut lines = vec![WELCOME_BACK.to_owned()];
                lines.extend(snapshot.last_responses);
                write_lines(output, &lines).await
            }
            _ => write_lines(output, &[GREETING.to_owned()]).await,
        }
    }
}

/// Write `lines` one per row, with a blank row between paragraphs.
async fn write_lines<W>(output: &mut W, lines: &[String]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    for (index, paragraph) in group_paragraphs(lines).iter().enumerate() {
        if index > 0 {
            output.write_all(b"\n").await?;
        }
        for line in paragraph {
            output.write_all(line.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }
    }
    output.flush().await?;
    Ok(())
}
