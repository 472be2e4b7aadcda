use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::SqlitePool;
use tether_core::timing::NOTIFY_WINDOW;

const BROADCAST_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Changed,
}

/// Pool plus a change signal. Bursts of writes collapse into a single
/// `Changed` event per notify window, so observers repaint once instead of
/// once per row.
pub struct StoreHandle {
    pool: SqlitePool,
    dirty_tx: mpsc::UnboundedSender<()>,
    event_tx: broadcast::Sender<StoreEvent>,
    coalescer: JoinHandle<()>,
}

impl StoreHandle {
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        let (dirty_tx, dirty_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let coalescer = tokio::spawn(coalesce(dirty_rx, event_tx.clone()));
        Self {
            pool,
            dirty_tx,
            event_tx,
            coalescer,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Signal that rows changed. Cheap enough to call once per mutation.
    pub fn mark_changed(&self) {
        let _ = self.dirty_tx.send(());
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }
}

impl Drop for StoreHandle {
    fn drop(&mut self) {
        self.coalescer.abort();
    }
}

async fn coalesce(
    mut dirty_rx: mpsc::UnboundedReceiver<()>,
    event_tx: broadcast::Sender<StoreEvent>,
) {
    while dirty_rx.recv().await.is_some() {
        // Absorb everything else that lands inside the window.
        tokio::time::sleep(NOTIFY_WINDOW).await;
        let mut absorbed = 1usize;
        while dirty_rx.try_recv().is_ok() {
            absorbed += 1;
        }
        debug!(absorbed, "store changed");
        let _ = event_tx.send(StoreEvent::Changed);
    }
}
