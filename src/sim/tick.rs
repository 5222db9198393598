//! Per-frame simulation tick
//!
//! Frame order matters and is fixed:
//! 1. scanner toggle
//! 2. wave timer: spawn a wave, then roll conversions (NPCs, then player)
//! 3. NPC pass in population order: advance, bite, infect, push transform
//! 4. sweep expired NPCs
//! 5. player exposure, lose check, store check, end fade
//! 6. player movement

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::{FADE_MAX, FADE_STEP};
use crate::renderer::{RenderBinding, VisualVariant};

/// Input for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Edge signal: flip the scanner view this frame
    pub toggle_scan: bool,
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick<R>(state: &mut GameState, input: &TickInput, dt: f32, render: &mut R)
where
    R: RenderBinding + ?Sized,
{
    state.events.clear();
    state.frame += 1;
    state.sim_time += dt as f64;

    if input.toggle_scan {
        state.scan = !state.scan;
        state.events.push(GameEvent::ScanToggled { on: state.scan });
    }

    if state.wave_timer.advance(dt) {
        generate_wave(state, render);
    }

    // NPC movement and contact
    let step = state.population.advance(render);
    for id in step.bitten {
        log::debug!("{} was bitten", id);
        state.stats.bites += 1;
        state.events.push(GameEvent::NpcBitten { id });
    }
    for id in step.infected {
        log::debug!("{} caught the infection", id);
        state.stats.infections += 1;
        state.events.push(GameEvent::NpcInfected { id });
    }

    for id in state.population.prune_expired(render) {
        state.stats.npcs_expired += 1;
        state.events.push(GameEvent::NpcExpired { id });
    }

    if state.player.check_infection_exposure(state.population.iter()) {
        log::info!("Player infected at frame {}", state.frame);
        state.events.push(GameEvent::PlayerInfected);
    }

    // End states are terminal: once won or lost, nothing flips it back
    let caught = state.player.health.is_zombie()
        || state.player.check_zombie_collision(state.population.iter());
    if state.phase == GamePhase::Playing && caught {
        state.phase = GamePhase::Lost;
        if let Some(handle) = state.player.visual {
            render.set_visual_variant(handle, VisualVariant::Zombie);
        }
        log::info!("Run lost at frame {} ({:.2}s)", state.frame, state.sim_time);
        state.events.push(GameEvent::Lost);
    }

    if state.phase == GamePhase::Playing && state.player.check_reached_store(&state.store) {
        state.phase = GamePhase::Won;
        log::info!("Run won at frame {} ({:.2}s)", state.frame, state.sim_time);
        state.events.push(GameEvent::Won);
    }

    if state.phase.is_over() && state.fade <= FADE_MAX {
        state.fade += FADE_STEP;
    }

    state.player.update_position(dt, input);
    if let Some(handle) = state.player.visual {
        render.update_transform(handle, state.player.pos, state.player.scale);
    }

    let population = state.population.len() as u32;
    state.stats.peak_population = state.stats.peak_population.max(population);
}

/// Spawn the configured wave, then run the interval-gated conversion rolls
pub fn generate_wave<R: RenderBinding + ?Sized>(state: &mut GameState, render: &mut R) {
    let config = &state.config;
    let (zombies, humans, probability) = (
        config.zombies_per_wave,
        config.humans_per_wave,
        config.conversion_probability,
    );

    let report = state
        .population
        .spawn_wave(zombies, humans, probability, &mut state.rng, render);
    state.stats.waves += 1;
    state.stats.npcs_spawned += report.ids.len() as u32;
    log::info!(
        "Wave {}: {} zombies, {} humans ({} carriers), population {}",
        state.stats.waves,
        report.zombies,
        report.humans,
        report.pre_infected,
        state.population.len()
    );
    state.events.push(GameEvent::WaveSpawned {
        wave: state.stats.waves,
        zombies: report.zombies,
        humans: report.humans,
        pre_infected: report.pre_infected,
    });

    for id in state.population.conversion_pass(probability, &mut state.rng, render) {
        log::debug!("{} turned", id);
        state.stats.conversions += 1;
        state.events.push(GameEvent::NpcConverted { id });
    }

    if state.player.roll_zombie_conversion(probability, &mut state.rng) {
        log::info!("Player turned at frame {}", state.frame);
        state.events.push(GameEvent::PlayerConverted);
    }
}
