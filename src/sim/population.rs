//! NPC population lifecycle
//!
//! The population is a vector in spawn order (ids ascending). The per-frame
//! pass walks it by index and only mutates the NPC at the current index, so
//! every NPC sees the others in a well-defined state. Expired NPCs are
//! removed by a single sweep after the pass, never mid-iteration.

use rand::Rng;

use super::curve::random_curve;
use super::state::{Health, Npc, NpcId};
use crate::consts::{PATH_LENGTH_MAX, PATH_LENGTH_MIN};
use crate::renderer::{EntityId, RenderBinding, VisualVariant};

/// Soft wave deadline accumulated across frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveTimer {
    pub interval: f32,
    pub elapsed: f32,
}

impl WaveTimer {
    pub fn new(interval: f32) -> Self {
        Self { interval, elapsed: 0.0 }
    }

    /// Accumulate `dt`. Once past the interval the accumulator resets to
    /// zero (the overshoot is dropped) and a wave is due.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed > self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

/// What a wave produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveReport {
    pub ids: Vec<NpcId>,
    pub zombies: u32,
    pub humans: u32,
    pub pre_infected: u32,
}

/// Contact transitions from one movement pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Healthy/Infected -> Zombie by contact with a zombie
    pub bitten: Vec<NpcId>,
    /// Healthy -> Infected by contact with a carrier
    pub infected: Vec<NpcId>,
}

#[derive(Debug, Clone)]
pub struct Population {
    npcs: Vec<Npc>,
    next_id: u32,
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}

impl Population {
    pub fn new() -> Self {
        Self {
            npcs: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new NPC id
    pub fn next_npc_id(&mut self) -> NpcId {
        let id = NpcId(self.next_id);
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Npc> {
        self.npcs.iter()
    }

    pub fn as_slice(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn get(&self, id: NpcId) -> Option<&Npc> {
        // Sorted by id, spawn order is preserved by the sweep
        self.npcs
            .binary_search_by_key(&id, |npc| npc.id)
            .ok()
            .map(|i| &self.npcs[i])
    }

    pub fn count(&self, health: Health) -> usize {
        self.npcs.iter().filter(|npc| npc.health == health).count()
    }

    /// Insert an already-built NPC and bind its visual.
    ///
    /// Ids must arrive in ascending order; lookups rely on it.
    pub fn insert<R: RenderBinding + ?Sized>(&mut self, mut npc: Npc, render: &mut R) -> NpcId {
        if let Some(last) = self.npcs.last() {
            assert!(npc.id > last.id, "{} inserted after {}", npc.id, last.id);
        }
        let handle = render.bind_visual(EntityId::Npc(npc.id), npc.variant());
        render.update_transform(handle, npc.position(), npc.scale);
        npc.visual = Some(handle);
        let id = npc.id;
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
        self.npcs.push(npc);
        id
    }

    /// Spawn one NPC with a fresh random path
    pub fn spawn_npc<G, R>(&mut self, health: Health, rng: &mut G, render: &mut R) -> NpcId
    where
        G: Rng + ?Sized,
        R: RenderBinding + ?Sized,
    {
        let id = self.next_npc_id();
        let path_len = rng.random_range(PATH_LENGTH_MIN..=PATH_LENGTH_MAX);
        let path = random_curve(path_len, rng);
        self.insert(Npc::new(id, health, path), render)
    }

    /// Spawn `zombies` zombies and then `humans` humans. Each human starts
    /// infected with probability `infection_probability`.
    pub fn spawn_wave<G, R>(
        &mut self,
        zombies: u32,
        humans: u32,
        infection_probability: f32,
        rng: &mut G,
        render: &mut R,
    ) -> WaveReport
    where
        G: Rng + ?Sized,
        R: RenderBinding + ?Sized,
    {
        let mut report = WaveReport {
            ids: Vec::with_capacity((zombies + humans) as usize),
            zombies,
            humans,
            pre_infected: 0,
        };

        for _ in 0..zombies {
            report.ids.push(self.spawn_npc(Health::Zombie, rng, render));
        }
        for _ in 0..humans {
            let draw: f32 = rng.random();
            let health = if infection_probability >= draw {
                report.pre_infected += 1;
                Health::Infected
            } else {
                Health::Healthy
            };
            report.ids.push(self.spawn_npc(health, rng, render));
        }

        report
    }

    /// Conversion roll for every infected NPC. Converted NPCs switch to the
    /// zombie visual.
    pub fn conversion_pass<G, R>(
        &mut self,
        probability: f32,
        rng: &mut G,
        render: &mut R,
    ) -> Vec<NpcId>
    where
        G: Rng + ?Sized,
        R: RenderBinding + ?Sized,
    {
        let mut converted = Vec::new();
        for npc in self.npcs.iter_mut().filter(|npc| npc.health.is_infected()) {
            if npc.roll_zombie_conversion(probability, rng) {
                npc.convert_to_zombie();
                if let Some(handle) = npc.visual {
                    render.set_visual_variant(handle, VisualVariant::Zombie);
                }
                converted.push(npc.id);
            }
        }
        converted
    }

    /// Movement and contact pass, in population order
    ///
    /// Each NPC advances one path sample, then (if not a zombie) a zombie
    /// contact turns it, otherwise a healthy NPC touching a carrier catches
    /// the infection. NPCs later in the order see the updated state of those
    /// before them.
    pub fn advance<R: RenderBinding + ?Sized>(&mut self, render: &mut R) -> StepReport {
        let mut report = StepReport::default();

        for i in 0..self.npcs.len() {
            self.npcs[i].advance_cursor();

            let (bitten, exposed) = {
                let npc = &self.npcs[i];
                match npc.health {
                    Health::Zombie => (false, false),
                    Health::Infected => (npc.check_zombie_collision(&self.npcs), false),
                    Health::Healthy => {
                        let bitten = npc.check_zombie_collision(&self.npcs);
                        (bitten, !bitten && npc.check_infection_exposure(&self.npcs))
                    }
                }
            };

            let npc = &mut self.npcs[i];
            if bitten {
                npc.convert_to_zombie();
                if let Some(handle) = npc.visual {
                    render.set_visual_variant(handle, VisualVariant::Zombie);
                }
                report.bitten.push(npc.id);
            } else if exposed {
                npc.infect();
                report.infected.push(npc.id);
            }

            if let Some(handle) = npc.visual {
                render.update_transform(handle, npc.position(), npc.scale);
            }
        }

        report
    }

    /// Remove every NPC that consumed its last path point and release its
    /// visual. Calling it again without advancing removes nothing.
    pub fn prune_expired<R: RenderBinding + ?Sized>(&mut self, render: &mut R) -> Vec<NpcId> {
        let mut removed = Vec::new();
        self.npcs.retain(|npc| {
            if !npc.is_expired() {
                return true;
            }
            if let Some(handle) = npc.visual {
                render.remove_visual(handle);
            }
            removed.push(npc.id);
            false
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{NullRenderer, SceneRegistry};
    use crate::sim::curve::Path;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fixed_npc(id: u32, health: Health, x: f32, len: usize) -> Npc {
        Npc::new(NpcId(id), health, Path::from_points(vec![Vec3::new(x, 0.0, 0.0); len]))
    }

    #[test]
    fn test_wave_timer_resets_to_zero() {
        let mut timer = WaveTimer::new(1.0);
        assert!(!timer.advance(0.6));
        assert!(!timer.advance(0.4)); // exactly 1.0 is not past the interval
        assert!(timer.advance(0.3));
        assert_eq!(timer.elapsed, 0.0);
        assert!(!timer.advance(0.9));
    }

    #[test]
    fn test_spawn_wave_counts_and_order() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut render = SceneRegistry::new();
        let mut pop = Population::new();

        let report = pop.spawn_wave(2, 3, 0.0, &mut rng, &mut render);
        assert_eq!(report.ids.len(), 5);
        assert_eq!(report.pre_infected, 0);
        assert_eq!(pop.count(Health::Zombie), 2);
        assert_eq!(pop.count(Health::Healthy), 3);
        // Zombies first, ids ascending
        assert!(pop.as_slice()[..2].iter().all(|n| n.health.is_zombie()));
        assert!(pop.as_slice().windows(2).all(|w| w[0].id < w[1].id));
        assert!(pop.iter().all(|n| (PATH_LENGTH_MIN..=PATH_LENGTH_MAX).contains(&n.path_len())));
        assert_eq!(render.len(), 5);
    }

    #[test]
    fn test_spawn_wave_certain_infection() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pop = Population::new();
        let report = pop.spawn_wave(1, 4, 1.0, &mut rng, &mut NullRenderer::default());
        assert_eq!(report.pre_infected, 4);
        assert_eq!(pop.count(Health::Infected), 4);
        // Zombies are never carriers
        assert_eq!(pop.count(Health::Zombie), 1);
    }

    #[test]
    fn test_advance_bites_and_infects() {
        let mut render = SceneRegistry::new();
        let mut pop = Population::new();
        pop.insert(fixed_npc(1, Health::Zombie, 0.0, 10), &mut render);
        pop.insert(fixed_npc(2, Health::Healthy, 0.0, 10), &mut render);
        pop.insert(fixed_npc(3, Health::Infected, 0.5, 10), &mut render);
        pop.insert(fixed_npc(4, Health::Healthy, 0.55, 10), &mut render);

        let report = pop.advance(&mut render);
        assert_eq!(report.bitten, vec![NpcId(2)]);
        assert_eq!(report.infected, vec![NpcId(4)]);
        assert!(pop.iter().all(|n| !(n.health.is_infected() && n.health.is_zombie())));

        let visual = pop.get(NpcId(2)).and_then(|n| n.visual).unwrap();
        assert_eq!(render.get(visual).map(|v| v.variant), Some(VisualVariant::Zombie));
    }

    #[test]
    fn test_advance_bites_carrier() {
        let mut render = SceneRegistry::new();
        let mut pop = Population::new();
        pop.insert(fixed_npc(1, Health::Zombie, 0.0, 10), &mut render);
        pop.insert(fixed_npc(2, Health::Infected, 0.05, 10), &mut render);

        let report = pop.advance(&mut render);
        assert_eq!(report.bitten, vec![NpcId(2)]);
        assert!(report.infected.is_empty());

        let npc = pop.get(NpcId(2)).unwrap();
        assert_eq!(npc.health, Health::Zombie);
        let visual = npc.visual.unwrap();
        assert_eq!(render.get(visual).map(|v| v.variant), Some(VisualVariant::Zombie));
    }

    #[test]
    fn test_get_finds_every_inserted_npc() {
        let mut render = NullRenderer::default();
        let mut pop = Population::new();
        pop.insert(fixed_npc(2, Health::Healthy, 0.0, 4), &mut render);
        pop.insert(fixed_npc(5, Health::Healthy, 0.3, 4), &mut render);
        let id = pop.next_npc_id();
        assert_eq!(id, NpcId(6));
        pop.insert(fixed_npc(id.0, Health::Zombie, -0.3, 4), &mut render);

        for id in [2, 5, 6] {
            assert!(pop.get(NpcId(id)).is_some(), "npc#{} missing", id);
        }
    }

    #[test]
    #[should_panic(expected = "npc#2 inserted after npc#5")]
    fn test_insert_rejects_out_of_order_id() {
        let mut render = NullRenderer::default();
        let mut pop = Population::new();
        pop.insert(fixed_npc(5, Health::Healthy, 0.0, 4), &mut render);
        pop.insert(fixed_npc(2, Health::Healthy, 0.3, 4), &mut render);
    }

    #[test]
    fn test_later_npcs_see_earlier_transitions() {
        // 2 is bitten by 1, then 3 is bitten by the freshly turned 2
        let mut pop = Population::new();
        let mut render = NullRenderer::default();
        pop.insert(fixed_npc(1, Health::Zombie, 0.0, 10), &mut render);
        pop.insert(fixed_npc(2, Health::Healthy, 0.07, 10), &mut render);
        pop.insert(fixed_npc(3, Health::Healthy, 0.14, 10), &mut render);

        let report = pop.advance(&mut render);
        assert_eq!(report.bitten, vec![NpcId(2), NpcId(3)]);
    }

    #[test]
    fn test_prune_expired_is_idempotent() {
        let mut render = SceneRegistry::new();
        let mut pop = Population::new();
        pop.insert(fixed_npc(1, Health::Healthy, 0.0, 2), &mut render);
        pop.insert(fixed_npc(2, Health::Healthy, 0.3, 5), &mut render);

        pop.advance(&mut render);
        let removed = pop.prune_expired(&mut render);
        assert_eq!(removed, vec![NpcId(1)]);
        assert_eq!(pop.len(), 1);
        assert_eq!(render.len(), 1);

        assert!(pop.prune_expired(&mut render).is_empty());
        assert_eq!(pop.len(), 1);
    }

    #[test]
    fn test_npc_visits_every_point_then_leaves() {
        let mut render = NullRenderer::default();
        let mut pop = Population::new();
        pop.insert(fixed_npc(1, Health::Healthy, 0.0, 4), &mut render);

        for frame in 1..4 {
            pop.advance(&mut render);
            let npc = pop.get(NpcId(1)).unwrap();
            assert_eq!(npc.pos_a(), frame);
            assert!(npc.pos_a() < npc.path_len());
            pop.prune_expired(&mut render);
        }
        assert!(pop.is_empty());
    }

    #[test]
    fn test_conversion_pass() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut render = SceneRegistry::new();
        let mut pop = Population::new();
        pop.insert(fixed_npc(1, Health::Infected, 0.0, 4), &mut render);
        pop.insert(fixed_npc(2, Health::Healthy, 0.3, 4), &mut render);

        assert!(pop.conversion_pass(0.0 - f32::EPSILON, &mut rng, &mut render).is_empty());
        let converted = pop.conversion_pass(1.0, &mut rng, &mut render);
        assert_eq!(converted, vec![NpcId(1)]);
        assert_eq!(pop.count(Health::Zombie), 1);
        assert_eq!(pop.count(Health::Healthy), 1);
    }
}
