//! Render binding
//!
//! The simulation never draws. It binds one visual per entity, pushes
//! transforms every frame, swaps the visual variant on conversion and
//! releases the visual when the entity leaves. Whatever draws the scene
//! implements `RenderBinding` and owns the mapping from handles to its own
//! resources.

pub mod scene;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::NpcId;

pub use scene::{NullRenderer, SceneRegistry, Visual};

/// Opaque handle issued by the render collaborator. Stale after
/// `remove_visual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Which entity a visual belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Player,
    Store,
    Npc(NpcId),
}

/// Sprite selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualVariant {
    Human,
    Zombie,
    Player,
    Store,
}

pub trait RenderBinding {
    fn bind_visual(&mut self, entity: EntityId, variant: VisualVariant) -> VisualHandle;
    fn update_transform(&mut self, handle: VisualHandle, position: Vec2, scale: f32);
    fn remove_visual(&mut self, handle: VisualHandle);
    fn set_visual_variant(&mut self, handle: VisualHandle, variant: VisualVariant);
}
