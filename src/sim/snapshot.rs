//! Serializable per-frame view of the scene
//!
//! What a renderer or a trace consumer needs: positions, sprites and the
//! scanner overlay. Infection is only revealed while the scanner is on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState, Health, NpcId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub zombie: bool,
    /// Scanner tint: `Some(infected)` while scanning a live run
    pub scanned_infected: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcView {
    pub id: NpcId,
    pub pos: Vec2,
    pub zombie: bool,
    /// Highlighted carrier (scanner on and infected)
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub scan: bool,
    pub fade: f32,
    pub store: Vec2,
    pub player: PlayerView,
    pub npcs: Vec<NpcView>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let scanned_infected = (self.scan && !self.phase.is_over())
            .then(|| self.player.health != Health::Healthy);

        Snapshot {
            frame: self.frame,
            phase: self.phase,
            scan: self.scan,
            fade: self.fade,
            store: self.store.center,
            player: PlayerView {
                pos: self.player.pos,
                zombie: self.player.health.is_zombie() || self.phase == GamePhase::Lost,
                scanned_infected,
            },
            npcs: self
                .population
                .iter()
                .map(|npc| NpcView {
                    id: npc.id,
                    pos: npc.position(),
                    zombie: npc.health.is_zombie(),
                    highlighted: self.scan && npc.health.is_infected(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::renderer::NullRenderer;
    use crate::sim::curve::Path;
    use crate::sim::state::Npc;
    use glam::Vec3;

    fn state_with_carrier() -> GameState {
        let config = SimConfig::new(0, 0, 10.0, 0.0).unwrap();
        let mut state = GameState::new(config, 11);
        let id = state.population.next_npc_id();
        let path = Path::from_points(vec![Vec3::new(0.3, 0.3, 0.0); 5]);
        state.population.insert(Npc::new(id, Health::Infected, path), &mut NullRenderer::default());
        state
    }

    #[test]
    fn test_carriers_hidden_without_scanner() {
        let state = state_with_carrier();
        let snap = state.snapshot();
        assert_eq!(snap.npcs.len(), 1);
        assert!(!snap.npcs[0].highlighted);
        assert_eq!(snap.player.scanned_infected, None);
    }

    #[test]
    fn test_scanner_reveals_carriers() {
        let mut state = state_with_carrier();
        state.scan = true;
        state.player.health = Health::Infected;
        let snap = state.snapshot();
        assert!(snap.npcs[0].highlighted);
        assert_eq!(snap.player.scanned_infected, Some(true));

        state.phase = GamePhase::Won;
        assert_eq!(state.snapshot().player.scanned_infected, None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_string(&state_with_carrier().snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        assert!(json.contains("\"highlighted\":false"));
    }
}
