// File: src/data_models.rs
// Shared data structures and models for all interfaces

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON snapshot written by the node daemon
    pub snapshot_path: PathBuf,
    /// Route prefix for block links, e.g. `/dashboard`
    pub base_path: String,
    /// Where dispatched connection commands are appended (JSON lines)
    pub command_outbox: Option<PathBuf>,
}

/// Everything the dashboard reads from the node, replaced wholesale on each update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullNodeState {
    pub blockchain_state: Option<BlockchainState>,
    pub full_node_connected: bool,
    pub connections: Vec<Connection>,
    pub open_connection_error: Option<String>,
    pub latest_blocks: Vec<BlockRecord>,
    pub unfinished_block_headers: Vec<BlockRecord>,
}

/// Blockchain state as reported by the full node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockchainState {
    pub sync: SyncState,
    pub peak: Option<Peak>,
    pub difficulty: u64,
    pub sub_slot_iters: u64,
    /// Estimated network space in bytes
    pub space: u128,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncState {
    pub sync_mode: bool,
    pub sync_progress_height: u64,
    pub sync_tip_height: u64,
    pub synced: bool,
}

/// Chain tip currently recognized by the node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Peak {
    pub height: u64,
    pub timestamp: Option<u64>,
    pub total_iters: u64,
}

/// Raw block or unfinished header record. Which one it is gets decided by the
/// list it came from, see [`crate::blocks::concat_rows`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockRecord {
    pub header_hash: Option<String>,
    pub foliage_block: Option<FoliageBlock>,
    pub foliage_sub_block: Option<FoliageSubBlock>,
    pub reward_chain_sub_block: Option<RewardChainSubBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoliageBlock {
    pub timestamp: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoliageSubBlock {
    pub foliage_block_hash: Option<String>,
    pub height: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardChainSubBlock {
    pub height: u64,
}

/// Peer connection descriptor. Only `node_id` carries identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub node_id: String,
    #[serde(rename = "type")]
    pub node_type: u8,
    pub peer_host: String,
    pub peer_port: u16,
    pub peer_server_port: u16,
    pub creation_time: Option<u64>,
    pub last_message_time: Option<u64>,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Commands sent to the node daemon. Fire-and-forget: the dashboard never
/// waits for an answer, results show up in the next snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeCommand {
    OpenConnection { host: String, port: u16 },
    CloseConnection { node_id: String },
}

/// WebSocket message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WebSocketMessage {
    /// Request dashboard data
    GetDashboard,

    /// Dashboard page model
    Dashboard { data: crate::dashboard::DashboardView },

    /// Ask the node to open a peer connection
    OpenConnection { host: String, port: u16 },

    /// Ask the node to drop a peer connection
    CloseConnection { node_id: String },

    /// Submit the block search box
    Search { query: String },

    /// Where the client should navigate to
    Navigate { location: String },

    /// Command accepted (not completed)
    Accepted,

    /// Error response
    Error { message: String },

    /// Ping/Pong for connection health
    Ping,
    Pong,
}
