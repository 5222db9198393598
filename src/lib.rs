//! Survival Sim - A top-down infection survival scene
//!
//! Core modules:
//! - `sim`: Deterministic simulation (curves, entities, collisions, waves)
//! - `renderer`: Render binding seam (the engine only pushes transforms)
//! - `platform`: Clock and input sources
//! - `config`: Startup parameters and validation
//! - `summary`: End-of-run report

pub mod config;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod summary;

pub use config::{ConfigError, SimConfig};
pub use summary::RunSummary;

/// Scene configuration constants
pub mod consts {
    /// Player spawn position (bottom of the track)
    pub const PLAYER_START: (f32, f32) = (0.0, -0.85);
    /// Player speed per axis (units/s)
    pub const PLAYER_VELOCITY: (f32, f32) = (0.3, 0.2);
    pub const PLAYER_RADIUS: f32 = 0.025;
    pub const PLAYER_SCALE: f32 = 0.08;

    /// Walkable track bounds for the player
    pub const TRACK_MIN_X: f32 = -0.5;
    pub const TRACK_MAX_X: f32 = 0.5;
    pub const TRACK_MIN_Y: f32 = -0.9;
    pub const TRACK_MAX_Y: f32 = 0.9;

    pub const NPC_RADIUS: f32 = 0.04;
    pub const NPC_SCALE: f32 = 0.08;
    /// Path sample count range (inclusive). More samples = slower NPC.
    pub const PATH_LENGTH_MIN: usize = 3000;
    pub const PATH_LENGTH_MAX: usize = 6000;
    /// NPCs above this height are about to leave the track and never convert
    pub const NPC_CONVERSION_MAX_Y: f32 = 0.9;

    /// Store ("tienda") placement; x is mirrored by the store side
    pub const STORE_X: f32 = 0.775;
    pub const STORE_Y: f32 = 0.845;
    pub const STORE_RADIUS: f32 = 0.275;
    pub const STORE_SCALE: f32 = 0.2;

    /// End screen fade step per frame, and its ceiling
    pub const FADE_STEP: f32 = 0.001;
    pub const FADE_MAX: f32 = 0.99;
}

/// Squared distance between two points (no sqrt)
#[inline]
pub fn distance_squared(a: glam::Vec2, b: glam::Vec2) -> f32 {
    let d = a - b;
    d.x * d.x + d.y * d.y
}
