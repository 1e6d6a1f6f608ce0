//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker and the event timer, wires up the
//! command/event channels, and exposes a builder-based API for hosts.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tower_core::ContentRegistry;

use crate::api::{Result, RuntimeError, RuntimeHandle, SessionEvent};
use crate::clock::{Clock, SystemClock};
use crate::config::RuntimeConfig;
use crate::repository::{FileSaveRepository, InMemorySaveRepo, SaveRepository};
use crate::scheduler::ParticipationBook;
use crate::workers::{Command, SessionWorker, spawn_timer};

/// Main runtime that hosts every player's session.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    registry: Arc<ContentRegistry>,
    worker_handle: JoinHandle<()>,
    timer_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Content the sessions run against.
    pub fn registry(&self) -> &Arc<ContentRegistry> {
        &self.registry
    }

    /// Subscribe to timer-driven session events
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.handle.subscribe()
    }

    /// Stop the timer, then let the worker drain and exit.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(timer) = self.timer_handle {
            timer.abort();
        }

        self.handle.stop().await?;
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;

        tracing::info!("Runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    registry: Option<Arc<ContentRegistry>>,
    repository: Option<Arc<dyn SaveRepository>>,
    clock: Option<Arc<dyn Clock>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            registry: None,
            repository: None,
            clock: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use already loaded content instead of reading `config.data_dir`.
    pub fn registry(mut self, registry: Arc<ContentRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use a specific save repository instead of the one `config.save_dir`
    /// implies.
    pub fn repository(mut self, repository: impl SaveRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Replace the system clock (tests use [`ManualClock`](crate::ManualClock)).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the runtime and spawn its workers.
    ///
    /// # Errors
    ///
    /// Fails when content cannot be loaded or the save directory cannot be
    /// created.
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;

        let registry = match self.registry {
            Some(registry) => registry,
            None => {
                let registry = tower_content::load_registry(&config.data_dir).map_err(|e| {
                    RuntimeError::Content {
                        path: config.data_dir.clone(),
                        source: e.into(),
                    }
                })?;
                Arc::new(registry)
            }
        };

        let repository: Arc<dyn SaveRepository> = match (self.repository, &config.save_dir) {
            (Some(repository), _) => repository,
            (None, Some(dir)) => {
                tracing::info!("Saving sessions to {}", dir.display());
                Arc::new(FileSaveRepository::new(dir)?)
            }
            (None, None) => {
                tracing::info!("Sessions are kept in memory only");
                Arc::new(InMemorySaveRepo::new())
            }
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let (event_tx, _event_rx) =
            broadcast::channel::<SessionEvent>(config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx.clone(), event_tx.clone());

        let worker = SessionWorker::new(
            Arc::clone(&registry),
            repository,
            clock,
            ParticipationBook::new(config.participation_cooldown),
            command_rx,
            event_tx,
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        let timer_handle = if config.timer_enabled() {
            tracing::info!(
                "Event timer every {}s",
                config.event_interval.as_secs_f32()
            );
            Some(spawn_timer(command_tx, config.event_interval))
        } else {
            tracing::debug!("Event timer disabled");
            None
        };

        Ok(Runtime {
            handle,
            registry,
            worker_handle,
            timer_handle,
        })
    }
}
