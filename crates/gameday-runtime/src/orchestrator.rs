//! Background reload loop.
//!
//! Owns a [`TableManager`] inside a tokio task, polls it on an interval and
//! forwards [`TableUpdate`]s through an `mpsc` channel so the TUI event loop
//! can swap tables without any shared mutable state.

use std::sync::Arc;
use std::time::Duration;

use gameday_core::models::GameTable;
use gameday_data::analysis::LoadMetadata;
use tokio::sync::mpsc;
use tokio::time;

use crate::table_manager::{RefreshOutcome, TableManager};

// ── Public types ──────────────────────────────────────────────────────────────

/// Sent whenever a reload attempt changes what the UI should show.
#[derive(Debug, Clone)]
pub struct TableUpdate {
    /// The table now being served. Unchanged after a failed reload.
    pub table: Arc<GameTable>,
    pub metadata: LoadMetadata,
    /// Set when the latest reload failed.
    pub error: Option<String>,
}

// ── ReloadOrchestrator ────────────────────────────────────────────────────────

pub struct ReloadOrchestrator {
    update_interval: Duration,
    manager: TableManager,
}

impl ReloadOrchestrator {
    pub fn new(update_interval: Duration, manager: TableManager) -> Self {
        Self {
            update_interval,
            manager,
        }
    }

    /// Spawn the reload loop.
    ///
    /// Returns the update receiver and a [`ReloadHandle`] for forcing a
    /// reload or aborting the loop.
    pub fn start(self) -> (mpsc::Receiver<TableUpdate>, ReloadHandle) {
        let (tx, rx) = mpsc::channel(16);
        let (force_tx, force_rx) = mpsc::channel(4);

        let handle = tokio::spawn(async move {
            self.reload_loop(tx, force_rx).await;
        });

        (
            rx,
            ReloadHandle {
                handle,
                force_tx,
            },
        )
    }

    // ── Private implementation ────────────────────────────────────────────

    /// Exits when the update receiver is dropped.
    async fn reload_loop(
        mut self,
        tx: mpsc::Sender<TableUpdate>,
        mut force_rx: mpsc::Receiver<()>,
    ) {
        let mut interval = time::interval(self.update_interval);
        // The first tick fires immediately; the table was loaded by the caller.
        interval.tick().await;

        loop {
            let force = tokio::select! {
                _ = interval.tick() => false,
                Some(()) = force_rx.recv() => true,
            };

            if tx.is_closed() {
                tracing::debug!("reload channel closed; exiting loop");
                break;
            }

            let outcome = self.manager.refresh(force);
            if outcome == RefreshOutcome::Unchanged {
                continue;
            }

            let update = TableUpdate {
                table: self.manager.table(),
                metadata: self.manager.metadata().clone(),
                error: self.manager.last_error().map(str::to_string),
            };
            if let Err(e) = tx.send(update).await {
                tracing::warn!(error = %e, "failed to send table update; receiver dropped");
                break;
            }
        }
    }
}

// ── ReloadHandle ──────────────────────────────────────────────────────────────

pub struct ReloadHandle {
    handle: tokio::task::JoinHandle<()>,
    force_tx: mpsc::Sender<()>,
}

impl ReloadHandle {
    /// Ask the loop to reload now regardless of the file's mtime.
    ///
    /// Non-blocking; a request is dropped if several are already queued.
    pub fn request_reload(&self) {
        if self.force_tx.try_send(()).is_err() {
            tracing::debug!("reload request dropped; queue full or loop stopped");
        }
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
