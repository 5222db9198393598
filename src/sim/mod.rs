//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (every random draw goes through `GameState::rng`)
//! - Stable iteration order (spawn order, ids ascending)
//! - No drawing or platform dependencies; visuals go through `RenderBinding`

pub mod collision;
pub mod curve;
pub mod population;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Circle, any_overlapping, overlaps};
pub use curve::{ControlPoints, CurveKind, Path, generate_curve, random_curve};
pub use population::{Population, StepReport, WaveReport, WaveTimer};
pub use snapshot::{NpcView, PlayerView, Snapshot};
pub use state::{GameEvent, GamePhase, GameState, Health, Npc, NpcId, Player, Stats, Store};
pub use tick::{TickInput, generate_wave, tick};
