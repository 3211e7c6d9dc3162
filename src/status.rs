// File: src/status.rs
// Status panel items derived from the blockchain state snapshot

use serde::{Deserialize, Serialize};

use crate::data_models::BlockchainState;
use crate::format::{format_bytes, unix_to_short_date};

/// Color a status value is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Orange,
    Red,
    Green,
    Black,
}

/// One label/value cell of the status panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusItem {
    pub label: String,
    pub value: String,
    pub color: StatusColor,
    pub tooltip: Option<String>,
}

impl StatusItem {
    fn new(label: &str, value: impl Into<String>, color: StatusColor) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            color,
            tooltip: None,
        }
    }

    fn with_tooltip(mut self, tooltip: &str) -> Self {
        self.tooltip = Some(tooltip.to_string());
        self
    }
}

/// Build the status panel items in display order: sync status, connection,
/// peak height, peak time, difficulty, sub-slot iterations, total iterations
/// and estimated network space.
pub fn build_status_items(state: &BlockchainState, connected: bool) -> Vec<StatusItem> {
    let mut items = Vec::with_capacity(8);

    items.push(sync_status_item(state));

    if connected {
        items.push(StatusItem::new("Connection Status", "Connected", StatusColor::Green));
    } else {
        items.push(StatusItem::new("Connection Status", "Not connected", StatusColor::Black));
    }

    let (height, timestamp, total_iters) = state
        .peak
        .as_ref()
        .map(|peak| (peak.height, peak.timestamp, peak.total_iters))
        .unwrap_or((0, None, 0));

    items.push(StatusItem::new("Peak Height", height.to_string(), StatusColor::Black));
    items.push(
        StatusItem::new("Peak Time", unix_to_short_date(timestamp), StatusColor::Black)
            .with_tooltip("This is the time of the latest peak sub block."),
    );
    items.push(StatusItem::new("Difficulty", state.difficulty.to_string(), StatusColor::Black));
    items.push(
        StatusItem::new("VDF Sub Slot Iterations", state.sub_slot_iters.to_string(), StatusColor::Black)
            .with_tooltip("Number of VDF iterations in each sub slot of the current epoch."),
    );
    items.push(
        StatusItem::new("Total Iterations", total_iters.to_string(), StatusColor::Black)
            .with_tooltip("Total iterations since the start of the blockchain"),
    );
    items.push(
        StatusItem::new("Estimated Network Space", format_bytes(state.space), StatusColor::Black)
            .with_tooltip("Estimated sum of all the plotted disk space of all farmers in the network"),
    );

    items
}

fn sync_status_item(state: &BlockchainState) -> StatusItem {
    let sync = &state.sync;
    if sync.sync_mode {
        StatusItem::new(
            "Status",
            format!("Syncing {}/{}", sync.sync_progress_height, sync.sync_tip_height),
            StatusColor::Orange,
        )
        .with_tooltip("The node is syncing, which means it is downloading blocks from other nodes, to reach the latest block in the chain")
    } else if !sync.synced {
        StatusItem::new("Status", "Not Synced", StatusColor::Red)
            .with_tooltip("The node is not synced")
    } else {
        StatusItem::new("Status", "Synced", StatusColor::Green)
            .with_tooltip("This node is fully caught up and validating the network")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_models::{Peak, SyncState};

    fn state_with_sync(sync: SyncState) -> BlockchainState {
        BlockchainState {
            sync,
            ..Default::default()
        }
    }

    #[test]
    fn syncing_shows_progress_and_tip() {
        let state = state_with_sync(SyncState {
            sync_mode: true,
            sync_progress_height: 1200,
            sync_tip_height: 5400,
            synced: false,
        });
        let items = build_status_items(&state, true);

        assert!(items[0].value.contains("1200"));
        assert!(items[0].value.contains("5400"));
        assert_eq!(items[0].color, StatusColor::Orange);
    }

    #[test]
    fn sync_mode_wins_over_synced_flag() {
        let state = state_with_sync(SyncState {
            sync_mode: true,
            synced: true,
            ..Default::default()
        });
        let items = build_status_items(&state, true);
        assert_eq!(items[0].color, StatusColor::Orange);
    }

    #[test]
    fn not_synced_is_red() {
        let items = build_status_items(&state_with_sync(SyncState::default()), true);
        assert_eq!(items[0].value, "Not Synced");
        assert_eq!(items[0].color, StatusColor::Red);
    }

    #[test]
    fn synced_is_green() {
        let state = state_with_sync(SyncState {
            synced: true,
            ..Default::default()
        });
        let items = build_status_items(&state, true);
        assert_eq!(items[0].value, "Synced");
        assert_eq!(items[0].color, StatusColor::Green);
    }

    #[test]
    fn exactly_one_connection_item() {
        let state = BlockchainState::default();

        let connected = build_status_items(&state, true);
        let connected_items: Vec<_> = connected
            .iter()
            .filter(|item| item.value == "Connected" || item.value == "Not connected")
            .collect();
        assert_eq!(connected_items.len(), 1);
        assert_eq!(connected_items[0].value, "Connected");
        assert_eq!(connected_items[0].color, StatusColor::Green);

        let offline = build_status_items(&state, false);
        let offline_items: Vec<_> = offline
            .iter()
            .filter(|item| item.value == "Connected" || item.value == "Not connected")
            .collect();
        assert_eq!(offline_items.len(), 1);
        assert_eq!(offline_items[0].value, "Not connected");
        assert_eq!(offline_items[0].color, StatusColor::Black);
    }

    #[test]
    fn items_follow_display_order() {
        let state = BlockchainState {
            sync: SyncState {
                synced: true,
                ..Default::default()
            },
            peak: Some(Peak {
                height: 42,
                timestamp: Some(1_600_000_000),
                total_iters: 987_654,
            }),
            difficulty: 7,
            sub_slot_iters: 134_217_728,
            space: 1536,
        };
        let items = build_status_items(&state, true);
        let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Status",
                "Connection Status",
                "Peak Height",
                "Peak Time",
                "Difficulty",
                "VDF Sub Slot Iterations",
                "Total Iterations",
                "Estimated Network Space",
            ]
        );
        assert_eq!(items[2].value, "42");
        assert_eq!(items[3].value, "2020-09-13 12:26:40");
        assert_eq!(items[4].value, "7");
        assert_eq!(items[5].value, "134217728");
        assert_eq!(items[6].value, "987654");
        assert_eq!(items[7].value, "1.5 KiB");
    }

    #[test]
    fn missing_peak_defaults() {
        let items = build_status_items(&BlockchainState::default(), false);
        assert_eq!(items[2].value, "0");
        assert_eq!(items[3].value, "");
        assert_eq!(items[6].value, "0");
        assert_eq!(items[7].value, "0 B");
    }
}
