//! Input sources
//!
//! Polled once per frame. Directional keys are held state; `toggle_scan`
//! is an edge and only set on the frame it fires.

use glam::Vec2;

use crate::consts::{TRACK_MAX_X, TRACK_MIN_X};
use crate::distance_squared;
use crate::sim::{GameState, TickInput};

pub trait InputSource {
    fn poll(&mut self, state: &GameState) -> TickInput;
}

/// No keys held
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn poll(&mut self, _state: &GameState) -> TickInput {
        TickInput::default()
    }
}

/// Demo mode: walks toward the store and sidesteps nearby zombies
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Zombies closer than this are avoided
    pub danger_radius: f32,
    /// Dead zone around the target, avoids jitter
    pub tolerance: f32,
    /// Toggle the scanner every N frames (0 = never)
    pub scan_every: u64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            danger_radius: 0.2,
            tolerance: 0.01,
            scan_every: 0,
        }
    }
}

impl Autopilot {
    /// Closest zombie inside the danger radius
    fn threat(&self, state: &GameState) -> Option<Vec2> {
        let pos = state.player.pos;
        let limit = self.danger_radius * self.danger_radius;
        state
            .population
            .iter()
            .filter(|npc| npc.health.is_zombie())
            .map(|npc| npc.position())
            .filter(|p| distance_squared(*p, pos) < limit)
            .min_by(|a, b| {
                distance_squared(*a, pos)
                    .partial_cmp(&distance_squared(*b, pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> TickInput {
        let pos = state.player.pos;
        let mut input = TickInput {
            toggle_scan: self.scan_every > 0 && state.frame % self.scan_every == 0,
            ..Default::default()
        };

        if let Some(zombie) = self.threat(state) {
            // Step sideways away from it; back off if it is coming from above
            if zombie.x >= pos.x {
                input.left = true;
            } else {
                input.right = true;
            }
            input.down = zombie.y > pos.y;
            return input;
        }

        // The store sits outside the track, aim for the nearest track edge
        let target = Vec2::new(
            state.store.center.x.clamp(TRACK_MIN_X, TRACK_MAX_X),
            state.store.center.y,
        );
        input.right = target.x > pos.x + self.tolerance;
        input.left = target.x < pos.x - self.tolerance;
        input.up = target.y > pos.y + self.tolerance;
        input.down = target.y < pos.y - self.tolerance;
        input
    }
}
