//! Layout phase state machine, as seen by the app.

use bevy::prelude::*;

/// Mirrors the active scheduler's phase. `Idle` until the first render.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutPhase {
    #[default]
    Idle,
    Positioning,
    Bundling,
}
