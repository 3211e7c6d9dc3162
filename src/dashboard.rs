// File: src/dashboard.rs
// Dashboard page model: the four panels composed from one node snapshot

use serde::{Deserialize, Serialize};

use crate::blocks::{concat_rows, BlockRow, HashCell, HeightCell};
use crate::connections::ConnectionsView;
use crate::data_models::FullNodeState;
use crate::status::{build_status_items, StatusItem};
use crate::store::{
    select_blockchain_state, select_connections, select_full_node_connected, select_latest_blocks,
    select_open_connection_error, select_unfinished_block_headers,
};

/// Status panel contents. `Loading` until the node reports a blockchain state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "items", rename_all = "lowercase")]
pub enum StatusPanel {
    Loading,
    Ready(Vec<StatusItem>),
}

/// One rendered row of the blocks table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRowView {
    pub hash: HashCell,
    pub height: HeightCell,
    pub time: String,
    pub state: String,
    pub is_finished: bool,
    /// Block page location when the row is clickable
    pub link: Option<String>,
}

impl BlockRowView {
    pub fn new(row: &BlockRow, base_path: &str) -> Self {
        Self {
            hash: row.hash_cell(),
            height: row.height_cell(),
            time: row.time_cell(),
            state: row.state_label().to_string(),
            is_finished: row.is_finished,
            link: row.click_route().map(|route| route.path(base_path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub status: StatusPanel,
    pub blocks: Vec<BlockRowView>,
    pub connections: ConnectionsView,
}

pub fn status_panel(state: &FullNodeState) -> StatusPanel {
    match select_blockchain_state(state) {
        Some(chain) => StatusPanel::Ready(build_status_items(chain, select_full_node_connected(state))),
        None => StatusPanel::Loading,
    }
}

pub fn block_rows(state: &FullNodeState) -> Vec<BlockRow> {
    concat_rows(select_unfinished_block_headers(state), select_latest_blocks(state))
}

pub fn connections_view(state: &FullNodeState) -> ConnectionsView {
    ConnectionsView::new(select_connections(state), select_open_connection_error(state))
}

impl DashboardView {
    pub fn from_state(state: &FullNodeState, base_path: &str) -> Self {
        Self {
            status: status_panel(state),
            blocks: block_rows(state)
                .iter()
                .map(|row| BlockRowView::new(row, base_path))
                .collect(),
            connections: connections_view(state),
        }
    }
}
