//! Headless render bindings

use std::collections::HashMap;

use glam::Vec2;

use super::{EntityId, RenderBinding, VisualHandle, VisualVariant};

/// Last known state of a bound visual
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub entity: EntityId,
    pub variant: VisualVariant,
    pub position: Vec2,
    pub scale: f32,
}

/// Keeps every live visual in memory
///
/// Handles are never reused. Updates aimed at a removed handle are logged
/// and dropped.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    visuals: HashMap<VisualHandle, Visual>,
    next_handle: u64,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live visual count
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&Visual> {
        self.visuals.get(&handle)
    }

    /// Look a visual up by its entity
    pub fn find(&self, entity: EntityId) -> Option<(VisualHandle, &Visual)> {
        self.visuals
            .iter()
            .find(|(_, v)| v.entity == entity)
            .map(|(h, v)| (*h, v))
    }

    pub fn count_variant(&self, variant: VisualVariant) -> usize {
        self.visuals.values().filter(|v| v.variant == variant).count()
    }
}

impl RenderBinding for SceneRegistry {
    fn bind_visual(&mut self, entity: EntityId, variant: VisualVariant) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.visuals.insert(
            handle,
            Visual {
                entity,
                variant,
                position: Vec2::ZERO,
                scale: 1.0,
            },
        );
        handle
    }

    fn update_transform(&mut self, handle: VisualHandle, position: Vec2, scale: f32) {
        match self.visuals.get_mut(&handle) {
            Some(visual) => {
                visual.position = position;
                visual.scale = scale;
            }
            None => log::warn!("Transform for stale visual {:?}", handle),
        }
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_none() {
            log::warn!("Removing unknown visual {:?}", handle);
        }
    }

    fn set_visual_variant(&mut self, handle: VisualHandle, variant: VisualVariant) {
        match self.visuals.get_mut(&handle) {
            Some(visual) => visual.variant = variant,
            None => log::warn!("Variant swap for stale visual {:?}", handle),
        }
    }
}

/// Issues handles and ignores everything else
#[derive(Debug, Default)]
pub struct NullRenderer {
    next_handle: u64,
}

impl RenderBinding for NullRenderer {
    fn bind_visual(&mut self, _entity: EntityId, _variant: VisualVariant) -> VisualHandle {
        self.next_handle += 1;
        VisualHandle(self.next_handle)
    }

    fn update_transform(&mut self, _handle: VisualHandle, _position: Vec2, _scale: f32) {}

    fn remove_visual(&mut self, _handle: VisualHandle) {}

    fn set_visual_variant(&mut self, _handle: VisualHandle, _variant: VisualVariant) {}
}
