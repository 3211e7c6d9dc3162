// File: src/connections.rs
// Connections panel: peer list rows, last open error and the peer address input

use serde::{Deserialize, Serialize};

use crate::data_models::Connection;
use crate::error::DashboardError;
use crate::format::{format_bytes, truncate_hash, unix_to_short_date};

/// Display row for one peer connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRow {
    pub node_id: String,
    pub short_node_id: String,
    pub node_type: String,
    pub address: String,
    pub uploaded: String,
    pub downloaded: String,
    pub connected_since: String,
    pub last_message: String,
}

/// Everything the connections panel renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsView {
    pub connections: Vec<ConnectionRow>,
    pub error: Option<String>,
}

impl ConnectionsView {
    pub fn new(connections: &[Connection], error: Option<&str>) -> Self {
        Self {
            connections: connections.iter().map(ConnectionRow::from).collect(),
            error: error.map(str::to_string),
        }
    }
}

impl From<&Connection> for ConnectionRow {
    fn from(conn: &Connection) -> Self {
        Self {
            node_id: conn.node_id.clone(),
            short_node_id: truncate_hash(&conn.node_id, 10),
            node_type: node_type_name(conn.node_type).to_string(),
            address: format!("{}:{}/{}", conn.peer_host, conn.peer_port, conn.peer_server_port),
            uploaded: format_bytes(u128::from(conn.bytes_written)),
            downloaded: format_bytes(u128::from(conn.bytes_read)),
            connected_since: unix_to_short_date(conn.creation_time),
            last_message: unix_to_short_date(conn.last_message_time),
        }
    }
}

/// Node kind codes used by the node RPC
pub fn node_type_name(code: u8) -> &'static str {
    match code {
        1 => "Full Node",
        2 => "Harvester",
        3 => "Farmer",
        4 => "Timelord",
        5 => "Introducer",
        6 => "Wallet",
        _ => "Unknown",
    }
}

/// Parse `host:port` as typed into the open-connection field. IPv6 hosts
/// need brackets, e.g. `[::1]:8444`.
pub fn parse_peer_address(input: &str) -> Result<(String, u16), DashboardError> {
    let invalid = || DashboardError::InvalidPeerAddress(input.to_string());
    let trimmed = input.trim();

    let (host, port) = trimmed.rsplit_once(':').ok_or_else(invalid)?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    let port: u16 = port.parse().map_err(|_| invalid())?;

    validate_peer(host, port).map_err(|_| invalid())
}

/// Check an already split peer address before it becomes an open command.
/// Returns the trimmed host.
pub fn validate_peer(host: &str, port: u16) -> Result<(String, u16), DashboardError> {
    let host = host.trim();
    if host.is_empty() || host.contains(char::is_whitespace) || port == 0 {
        return Err(DashboardError::InvalidPeerAddress(format!("{}:{}", host, port)));
    }
    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_formats_peer() {
        let conn = Connection {
            node_id: "0123456789abcdef".into(),
            node_type: 1,
            peer_host: "10.0.0.2".into(),
            peer_port: 58444,
            peer_server_port: 8444,
            creation_time: Some(1_600_000_000),
            last_message_time: None,
            bytes_read: 2048,
            bytes_written: 512,
        };
        let row = ConnectionRow::from(&conn);

        assert_eq!(row.node_id, "0123456789abcdef");
        assert_eq!(row.short_node_id, "0123456789...");
        assert_eq!(row.node_type, "Full Node");
        assert_eq!(row.address, "10.0.0.2:58444/8444");
        assert_eq!(row.uploaded, "512 B");
        assert_eq!(row.downloaded, "2.0 KiB");
        assert_eq!(row.connected_since, "2020-09-13 12:26:40");
        assert_eq!(row.last_message, "");
    }

    #[test]
    fn view_passes_error_through() {
        let view = ConnectionsView::new(&[], Some("connection refused"));
        assert!(view.connections.is_empty());
        assert_eq!(view.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn parses_peer_addresses() {
        assert_eq!(parse_peer_address("node.example.org:8444").unwrap(), ("node.example.org".into(), 8444));
        assert_eq!(parse_peer_address(" 10.0.0.1:8444 ").unwrap(), ("10.0.0.1".into(), 8444));
        assert_eq!(parse_peer_address("[::1]:8444").unwrap(), ("::1".into(), 8444));
    }

    #[test]
    fn rejects_bad_peer_addresses() {
        for input in ["", "node.example.org", ":8444", "host:port", "host:70000", "host:0", "my host:1"] {
            assert!(
                matches!(parse_peer_address(input), Err(DashboardError::InvalidPeerAddress(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn validates_split_peer_address() {
        assert_eq!(validate_peer(" 10.0.0.1 ", 8444).unwrap(), ("10.0.0.1".into(), 8444));
        assert!(validate_peer("", 8444).is_err());
        assert!(validate_peer("10.0.0.1", 0).is_err());
        assert!(validate_peer("my host", 8444).is_err());
    }
}
