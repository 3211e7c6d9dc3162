// File: src/cli_interface.rs
// One-shot CLI print of the dashboard panels

use anyhow::Result;

use crate::blocks::BlockRow;
use crate::connections::ConnectionsView;
use crate::dashboard::{block_rows, connections_view, status_panel, StatusPanel};
use crate::data_models::AppConfig;
use crate::format::truncate_hash;
use crate::store::NodeStore;

/// Execute CLI mode operations
pub async fn run_cli_mode(config: &AppConfig, store: &NodeStore, count: usize) -> Result<()> {
    let state = store.snapshot().await;

    print!("{}", render_status(&status_panel(&state)));

    let rows = block_rows(&state);
    if rows.is_empty() {
        println!("No blocks in the node snapshot.");
    } else {
        print!("{}", render_blocks_table(&rows[..rows.len().min(count)], &config.base_path));
    }

    print!("{}", render_connections(&connections_view(&state)));
    Ok(())
}

/// Status items as `label: value` lines
fn render_status(panel: &StatusPanel) -> String {
    match panel {
        StatusPanel::Loading => "⏳ Loading blockchain state...\n".to_string(),
        StatusPanel::Ready(items) => {
            let mut out = String::from("\n📊 Full Node Status\n");
            for item in items {
                out.push_str(&format!("  {:<24} {}\n", format!("{}:", item.label), item.value));
            }
            out
        }
    }
}

/// Blocks in a formatted table
fn render_blocks_table(rows: &[BlockRow], base_path: &str) -> String {
    let mut out = String::from("\n");
    out.push_str(&format!("╭─{:─<24}─┬─{:─<8}─┬─{:─<19}─┬─{:─<10}─╮\n", "", "", "", ""));
    out.push_str(&format!("│ {:^24} │ {:^8} │ {:^19} │ {:^10} │\n", "Hash", "Height", "Time", "State"));
    out.push_str(&format!("├─{:─<24}─┼─{:─<8}─┼─{:─<19}─┼─{:─<10}─┤\n", "", "", "", ""));

    for row in rows {
        let hash = row.hash_cell();
        let height = row.height_cell();
        let marker = if height.is_italic() { "~" } else { "" };
        out.push_str(&format!(
            "│ {:<24} │ {:>8} │ {:<19} │ {:<10} │\n",
            truncate_hash(&hash.hash, 21),
            format!("{}{}", marker, height.display()),
            row.time_cell(),
            row.state_label()
        ));
    }

    out.push_str(&format!("╰─{:─<24}─┴─{:─<8}─┴─{:─<19}─┴─{:─<10}─╯\n", "", "", "", ""));

    let links: Vec<String> = rows
        .iter()
        .filter_map(BlockRow::click_route)
        .map(|route| route.path(base_path))
        .collect();
    if let Some(first) = links.first() {
        out.push_str(&format!("🔗 Block pages: {} (and {} more)\n", first, links.len() - 1));
    }
    out
}

/// Peer connections and the last open-connection error
fn render_connections(view: &ConnectionsView) -> String {
    let mut out = format!("\n🔌 Connections ({})\n", view.connections.len());
    if let Some(error) = &view.error {
        out.push_str(&format!("  ⚠ Open connection failed: {}\n", error));
    }
    for conn in &view.connections {
        out.push_str(&format!(
            "  {:<13} {:<10} {:<28} ↑{} ↓{}\n",
            conn.short_node_id, conn.node_type, conn.address, conn.uploaded, conn.downloaded
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::concat_rows;
    use crate::data_models::{BlockRecord, BlockchainState, Connection, FoliageSubBlock, RewardChainSubBlock};
    use crate::status::build_status_items;

    #[test]
    fn status_lines() {
        assert!(render_status(&StatusPanel::Loading).contains("Loading"));

        let items = build_status_items(&BlockchainState::default(), false);
        let out = render_status(&StatusPanel::Ready(items));
        assert!(out.contains("Status:"));
        assert!(out.contains("Not Synced"));
        assert!(out.contains("Not connected"));
    }

    #[test]
    fn blocks_table_marks_italic_heights() {
        let rows = concat_rows(
            &[BlockRecord {
                foliage_sub_block: Some(FoliageSubBlock {
                    foliage_block_hash: Some("0xpending".into()),
                    height: Some(8),
                }),
                ..Default::default()
            }],
            &[BlockRecord {
                header_hash: Some("0xabc".into()),
                reward_chain_sub_block: Some(RewardChainSubBlock { height: 7 }),
                ..Default::default()
            }],
        );
        let out = render_blocks_table(&rows, "/dashboard");

        assert!(out.contains("~8"));
        assert!(out.contains("~7"));
        assert!(out.contains("Unfinished"));
        assert!(out.contains("/dashboard/block/0xabc"));
    }

    #[test]
    fn connections_show_error() {
        let view = ConnectionsView::new(
            &[Connection {
                node_id: "ab12".into(),
                node_type: 6,
                ..Default::default()
            }],
            Some("refused"),
        );
        let out = render_connections(&view);
        assert!(out.contains("Connections (1)"));
        assert!(out.contains("Wallet"));
        assert!(out.contains("refused"));
    }
}
