use bevy::prelude::*;
use std::io::{IsTerminal, Read};

use crate::core::network::Network;
use crate::io::file_io::NetworkSnapshot;
use crate::layout::systems::PendingNetwork;

#[derive(Resource)]
pub struct StdinNetwork(pub NetworkSnapshot);

/// Read a network document from stdin when it is piped. Returns `None` for a
/// terminal, empty input, or unparseable JSON.
pub fn read_stdin_snapshot() -> Option<NetworkSnapshot> {
    if std::io::stdin().is_terminal() {
        return None;
    }
    let mut buf = String::new();
    if std::io::stdin().read_to_string(&mut buf).is_err() {
        return None;
    }
    parse_stdin(&buf)
}

fn parse_stdin(buf: &str) -> Option<NetworkSnapshot> {
    let buf = buf.trim();
    if buf.is_empty() {
        return None;
    }
    match serde_json::from_str::<NetworkSnapshot>(buf) {
        Ok(snap) => Some(snap),
        Err(e) => {
            eprintln!("Failed to parse stdin as JSON: {}", e);
            None
        }
    }
}

pub fn load_stdin_network_system(
    mut commands: Commands,
    snapshot: Option<Res<StdinNetwork>>,
    mut pending: ResMut<PendingNetwork>,
) {
    let Some(snap) = snapshot else {
        return;
    };
    match Network::from_snapshot(snap.0.clone()) {
        Ok(network) => {
            info!(
                "[LOAD] Read {} nodes, {} links from stdin",
                network.nodes().len(),
                network.edges().len()
            );
            pending.0 = Some(network);
        }
        Err(e) => error!("[LOAD] stdin: {}", e),
    }
    commands.remove_resource::<StdinNetwork>();
}
