//! Recurring event timer.
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::Command;

/// Send a `Tick` every `period` until the worker goes away.
///
/// The returned task is aborted by the runtime on shutdown.
pub fn spawn_timer(command_tx: mpsc::Sender<Command>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if command_tx.send(Command::Tick { reply: None }).await.is_err() {
                debug!("Event timer stopping: session worker closed");
                break;
            }
        }
    })
}
