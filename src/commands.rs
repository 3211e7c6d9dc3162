// File: src/commands.rs
// Fire-and-forget connection commands and the outbox that hands them to the
// node daemon

use std::path::PathBuf;

use anyhow::Result;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::data_models::NodeCommand;

/// Sending half of the command channel. Dispatch never waits and never
/// reports an outcome; the effect shows up in a later node snapshot.
#[derive(Clone)]
pub struct CommandDispatcher {
    tx: UnboundedSender<NodeCommand>,
}

impl CommandDispatcher {
    pub fn channel() -> (Self, UnboundedReceiver<NodeCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn open_connection(&self, host: &str, port: u16) {
        self.dispatch(NodeCommand::OpenConnection {
            host: host.to_string(),
            port,
        });
    }

    pub fn close_connection(&self, node_id: &str) {
        self.dispatch(NodeCommand::CloseConnection {
            node_id: node_id.to_string(),
        });
    }

    fn dispatch(&self, command: NodeCommand) {
        if let Err(e) = self.tx.send(command) {
            warn!(command = ?e.0, "command outbox is gone, dropping command");
        }
    }
}

/// Drain the command channel, logging each command and appending it as a
/// JSON line to `outbox` when one is configured
pub async fn run_command_outbox(
    mut rx: UnboundedReceiver<NodeCommand>,
    outbox: Option<PathBuf>,
) -> Result<()> {
    while let Some(command) = rx.recv().await {
        info!(?command, "dispatching node command");

        let Some(path) = outbox.as_ref() else {
            continue;
        };

        let line = serde_json::to_string(&command)?;
        let written = async {
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            file.write_all(line.as_bytes()).await?;
            file.write_all(b"\n").await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            warn!(path = %path.display(), "failed to write command outbox: {}", e);
        }
    }

    Ok(())
}
