//! Game state and core simulation types
//!
//! Entities (player, NPCs, store), their health state machine, and the
//! top-level `GameState` the orchestrator mutates each frame.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, any_overlapping};
use super::curve::Path;
use super::population::{Population, WaveTimer};
use super::tick::TickInput;
use crate::config::SimConfig;
use crate::consts::*;
use crate::renderer::{EntityId, RenderBinding, VisualHandle, VisualVariant};

/// Infection state shared by the player and NPCs
///
/// Healthy -> Infected on exposure to a carrier, Infected -> Zombie on a
/// successful conversion roll, Healthy -> Zombie directly on a bite.
/// Zombie is terminal and never carries the infection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Health {
    #[default]
    Healthy,
    Infected,
    Zombie,
}

impl Health {
    /// Carrier flag (zombies are not carriers)
    #[inline]
    pub fn is_infected(self) -> bool {
        self == Health::Infected
    }

    #[inline]
    pub fn is_zombie(self) -> bool {
        self == Health::Zombie
    }
}

/// Stable NPC identifier, never reused within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NpcId(pub u32);

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "npc#{}", self.0)
    }
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Speed per axis (units/s)
    pub vel: Vec2,
    pub health: Health,
    pub radius: f32,
    pub scale: f32,
    #[serde(skip)]
    pub visual: Option<VisualHandle>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START.0, PLAYER_START.1),
            vel: Vec2::new(PLAYER_VELOCITY.0, PLAYER_VELOCITY.1),
            health: Health::Healthy,
            radius: PLAYER_RADIUS,
            scale: PLAYER_SCALE,
            visual: None,
        }
    }
}

impl Player {
    #[inline]
    pub fn body(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    /// Move along each held axis. The bound is checked before moving, so a
    /// step that starts inside the track may end slightly past it, and a
    /// step that starts outside is skipped rather than clamped.
    pub fn update_position(&mut self, dt: f32, input: &TickInput) {
        if input.right && self.pos.x < TRACK_MAX_X {
            self.pos.x += self.vel.x * dt;
        }
        if input.left && self.pos.x > TRACK_MIN_X {
            self.pos.x -= self.vel.x * dt;
        }
        if input.up && self.pos.y < TRACK_MAX_Y {
            self.pos.y += self.vel.y * dt;
        }
        if input.down && self.pos.y > TRACK_MIN_Y {
            self.pos.y -= self.vel.y * dt;
        }
    }

    /// Touching any zombie?
    pub fn check_zombie_collision<'a, I>(&self, npcs: I) -> bool
    where
        I: IntoIterator<Item = &'a Npc>,
    {
        let zombies = npcs.into_iter().filter(|npc| npc.health.is_zombie());
        any_overlapping(&self.body(), zombies.map(Npc::body))
    }

    /// Catch the infection from an overlapping carrier.
    /// Returns true only when this call infected a healthy player.
    pub fn check_infection_exposure<'a, I>(&mut self, npcs: I) -> bool
    where
        I: IntoIterator<Item = &'a Npc>,
    {
        if self.health != Health::Healthy {
            return false;
        }
        let carriers = npcs.into_iter().filter(|npc| npc.health.is_infected());
        let exposed = any_overlapping(&self.body(), carriers.map(Npc::body));
        if exposed {
            self.health = Health::Infected;
        }
        exposed
    }

    /// Infected players turn when `probability >= u`, `u ~ U[0, 1)`.
    /// No draw is made for a player who is not infected.
    pub fn roll_zombie_conversion<R>(&mut self, probability: f32, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        if !self.health.is_infected() {
            return false;
        }
        let draw: f32 = rng.random();
        if probability >= draw {
            self.health = Health::Zombie;
            true
        } else {
            false
        }
    }

    pub fn check_reached_store(&self, store: &Store) -> bool {
        self.body().overlaps(&store.body())
    }
}

/// An autonomous character walking a precomputed path
#[derive(Debug, Clone)]
pub struct Npc {
    pub id: NpcId,
    pub health: Health,
    pub radius: f32,
    pub scale: f32,
    pub visual: Option<VisualHandle>,
    path: Path,
    /// Index of the current path point
    pos_a: usize,
    /// Lookahead, always `pos_a + 1`; equals the path length once the
    /// last point has been consumed
    pos_s: usize,
}

impl Npc {
    /// Create an NPC at the start of `path`
    ///
    /// Panics if the path has fewer than two points.
    pub fn new(id: NpcId, health: Health, path: Path) -> Self {
        assert!(path.len() >= 2, "{id} needs at least two path points, got {}", path.len());
        Self {
            id,
            health,
            radius: NPC_RADIUS,
            scale: NPC_SCALE,
            visual: None,
            path,
            pos_a: 0,
            pos_s: 1,
        }
    }

    /// Current point on the path
    #[inline]
    pub fn position(&self) -> Vec2 {
        // pos_a < path.len() holds for the whole lifetime
        self.path.points()[self.pos_a].truncate()
    }

    #[inline]
    pub fn body(&self) -> Circle {
        Circle::new(self.position(), self.radius)
    }

    #[inline]
    pub fn pos_a(&self) -> usize {
        self.pos_a
    }

    #[inline]
    pub fn pos_s(&self) -> usize {
        self.pos_s
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// The last point has been consumed; due for removal
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.pos_s == self.path.len()
    }

    /// One path sample per frame, independent of dt
    ///
    /// Panics when called on an expired NPC: the population must prune it
    /// first.
    pub fn advance_cursor(&mut self) {
        assert!(
            !self.is_expired(),
            "{} advanced past the end of its {}-point path",
            self.id,
            self.path.len()
        );
        self.pos_a += 1;
        self.pos_s += 1;
    }

    /// Interval-gated Infected -> Zombie trial. Never converts an NPC that
    /// is above the conversion line (about to leave the track).
    pub fn roll_zombie_conversion<R: Rng + ?Sized>(&self, probability: f32, rng: &mut R) -> bool {
        if !self.health.is_infected() {
            return false;
        }
        let draw: f32 = rng.random();
        probability >= draw && self.position().y <= NPC_CONVERSION_MAX_Y
    }

    /// Bitten by another zombie?
    pub fn check_zombie_collision<'a, I>(&self, population: I) -> bool
    where
        I: IntoIterator<Item = &'a Npc>,
    {
        let zombies = population
            .into_iter()
            .filter(|other| other.id != self.id && other.health.is_zombie());
        any_overlapping(&self.body(), zombies.map(Npc::body))
    }

    /// Touching another carrier?
    pub fn check_infection_exposure<'a, I>(&self, population: I) -> bool
    where
        I: IntoIterator<Item = &'a Npc>,
    {
        let carriers = population
            .into_iter()
            .filter(|other| other.id != self.id && other.health.is_infected());
        any_overlapping(&self.body(), carriers.map(Npc::body))
    }

    /// Healthy -> Infected. Returns false if the NPC was not healthy.
    pub fn infect(&mut self) -> bool {
        if self.health == Health::Healthy {
            self.health = Health::Infected;
            true
        } else {
            false
        }
    }

    /// Any state -> Zombie. Returns false if it already was one.
    pub fn convert_to_zombie(&mut self) -> bool {
        if self.health.is_zombie() {
            false
        } else {
            self.health = Health::Zombie;
            true
        }
    }

    pub fn variant(&self) -> VisualVariant {
        if self.health.is_zombie() {
            VisualVariant::Zombie
        } else {
            VisualVariant::Human
        }
    }
}

/// The goal: a fixed circle in one of the top corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// +1 = right corner, -1 = left corner
    pub side: f32,
    pub center: Vec2,
    pub radius: f32,
}

impl Store {
    pub fn new(side: f32) -> Self {
        Self {
            side,
            center: Vec2::new(STORE_X * side, STORE_Y),
            radius: STORE_RADIUS,
        }
    }

    /// Left or right with equal odds
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(if rng.random_bool(0.5) { 1.0 } else { -1.0 })
    }

    #[inline]
    pub fn body(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }
}

/// Run phase. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Player reached the store
    Won,
    /// Player was bitten or turned
    Lost,
}

impl GamePhase {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GamePhase::Playing
    }
}

/// Things that happened during the last frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveSpawned { wave: u32, zombies: u32, humans: u32, pre_infected: u32 },
    ScanToggled { on: bool },
    NpcBitten { id: NpcId },
    NpcInfected { id: NpcId },
    NpcConverted { id: NpcId },
    NpcExpired { id: NpcId },
    PlayerInfected,
    PlayerConverted,
    Won,
    Lost,
}

/// Cumulative counters for the run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub waves: u32,
    pub npcs_spawned: u32,
    pub npcs_expired: u32,
    /// Healthy -> Infected by contact
    pub infections: u32,
    /// Healthy -> Zombie by contact
    pub bites: u32,
    /// Infected -> Zombie by conversion roll
    pub conversions: u32,
    pub peak_population: u32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: SimConfig,
    pub phase: GamePhase,
    pub player: Player,
    pub store: Store,
    pub population: Population,
    pub wave_timer: WaveTimer,
    /// Frames simulated
    pub frame: u64,
    /// Accumulated simulation time (seconds)
    pub sim_time: f64,
    /// Scanner view (reveals carriers)
    pub scan: bool,
    /// End screen fade, 0..~1
    pub fade: f32,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub stats: Stats,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let store = Store::random(&mut rng);
        Self {
            seed,
            rng,
            wave_timer: WaveTimer::new(config.wave_interval),
            config,
            phase: GamePhase::Playing,
            player: Player::default(),
            store,
            population: Population::new(),
            frame: 0,
            sim_time: 0.0,
            scan: false,
            fade: 0.0,
            events: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Bind the player and store visuals
    pub fn attach_visuals<R: RenderBinding + ?Sized>(&mut self, render: &mut R) {
        let store = render.bind_visual(EntityId::Store, VisualVariant::Store);
        render.update_transform(store, self.store.center, STORE_SCALE);

        let player = render.bind_visual(EntityId::Player, VisualVariant::Player);
        render.update_transform(player, self.player.pos, self.player.scale);
        self.player.visual = Some(player);
    }
}
