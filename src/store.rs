// File: src/store.rs
// Process-wide node state: shared snapshot, change broadcast and the
// snapshot file watcher that keeps it current

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

use crate::data_models::{BlockRecord, BlockchainState, Connection, FullNodeState};
use crate::error::DashboardError;

/// Shared node state. Updates replace the whole snapshot and are announced
/// to every subscriber.
#[derive(Clone)]
pub struct NodeStore {
    state: Arc<RwLock<FullNodeState>>,
    updates: broadcast::Sender<FullNodeState>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new(FullNodeState::default())
    }
}

impl NodeStore {
    pub fn new(initial: FullNodeState) -> Self {
        let (updates, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(initial)),
            updates,
        }
    }

    /// Clone of the current snapshot
    pub async fn snapshot(&self) -> FullNodeState {
        self.state.read().await.clone()
    }

    /// Replace the snapshot wholesale and notify subscribers
    pub async fn replace(&self, next: FullNodeState) {
        {
            let mut state = self.state.write().await;
            *state = next.clone();
        }
        // no subscribers is fine
        let receivers = self.updates.send(next).unwrap_or(0);
        debug!(receivers, "node state replaced");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FullNodeState> {
        self.updates.subscribe()
    }
}

pub fn select_blockchain_state(state: &FullNodeState) -> Option<&BlockchainState> {
    state.blockchain_state.as_ref()
}

pub fn select_full_node_connected(state: &FullNodeState) -> bool {
    state.full_node_connected
}

pub fn select_connections(state: &FullNodeState) -> &[Connection] {
    &state.connections
}

pub fn select_open_connection_error(state: &FullNodeState) -> Option<&str> {
    state.open_connection_error.as_deref()
}

pub fn select_latest_blocks(state: &FullNodeState) -> &[BlockRecord] {
    &state.latest_blocks
}

pub fn select_unfinished_block_headers(state: &FullNodeState) -> &[BlockRecord] {
    &state.unfinished_block_headers
}

/// Read and parse a node snapshot file
pub async fn load_snapshot(path: &Path) -> Result<FullNodeState, DashboardError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DashboardError::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&raw).map_err(|source| DashboardError::SnapshotParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the snapshot into the store. On failure the previous state stays.
pub async fn reload_from_file(store: &NodeStore, path: &Path) -> Result<(), DashboardError> {
    let next = load_snapshot(path).await?;
    info!(
        blocks = next.latest_blocks.len(),
        unfinished = next.unfinished_block_headers.len(),
        connections = next.connections.len(),
        "node snapshot loaded"
    );
    store.replace(next).await;
    Ok(())
}

/// Initial load used by every mode. A missing file leaves the store empty,
/// which the status panel shows as loading.
pub async fn initial_load(store: &NodeStore, path: &Path) {
    if !path.exists() {
        warn!(path = %path.display(), "node snapshot does not exist yet, waiting for the daemon");
        return;
    }
    if let Err(e) = reload_from_file(store, path).await {
        error!("{}", e);
    }
}

/// Watch the snapshot file and reload the store when it changes
pub async fn watch_snapshot(store: NodeStore, path: PathBuf) -> Result<(), DashboardError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path.file_name().map(|name| name.to_os_string());

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    // daemons usually write a temp file and rename it over the snapshot, so
    // watch the directory and filter on the file name
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if !(event.kind.is_modify() || event.kind.is_create()) {
                return;
            }
            let touches_snapshot = event
                .paths
                .iter()
                .any(|p| p.file_name().map(|name| name.to_os_string()) == file_name);
            if touches_snapshot {
                if let Err(e) = tx.blocking_send(()) {
                    warn!("failed to forward snapshot change: {}", e);
                }
            }
        }
        Err(e) => warn!("snapshot watch error: {:?}", e),
    })?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!(path = %path.display(), "watching node snapshot");

    let mut debounce_handle: Option<tokio::task::JoinHandle<()>> = None;

    while rx.recv().await.is_some() {
        if let Some(handle) = debounce_handle.take() {
            handle.abort();
        }

        let store = store.clone();
        let path = path.clone();
        debounce_handle = Some(tokio::spawn(async move {
            // let the writer finish
            tokio::time::sleep(Duration::from_millis(500)).await;
            if let Err(e) = reload_from_file(&store, &path).await {
                error!("keeping previous node state: {}", e);
            }
        }));
    }

    drop(watcher);
    Ok(())
}
