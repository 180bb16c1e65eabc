//! One discrete simulation step
//!
//! Phases run strictly in order over the live token list:
//! actor -> locomotion -> resolution -> overlap forces -> reset.
//! Each loop is sequential in insertion order so the outcome is reproducible.

use glam::Vec2;

use super::player::ActorView;
use super::state::{SimPhase, SimState};
use super::token::{Removals, Resolution, Token, settle_intersections};

/// What happened during a single step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Step number (1-based)
    pub step: u64,
    /// Nudges applied in the actor phase
    pub nudges: usize,
    /// Lost contacts, in resolution order
    pub resolutions: Vec<Resolution>,
    /// Tokens removed in the resolution phase
    pub removed: usize,
}

/// Advance the simulation by one step.
///
/// Returns `None` (and changes nothing) while the simulation is stopped.
pub fn step(state: &mut SimState) -> Option<StepReport> {
    if state.phase != SimPhase::Running {
        return None;
    }

    state.step_count += 1;
    let mut report = StepReport {
        step: state.step_count,
        ..Default::default()
    };

    report.nudges = actor_phase(state);
    locomotion_phase(state);
    let (resolutions, removed) = resolution_phase(state);
    report.resolutions = resolutions;
    report.removed = removed;
    overlap_force_phase(state);
    reset_phase(state);

    Some(report)
}

/// Every player picks nudges, applied before the next player decides
fn actor_phase(state: &mut SimState) -> usize {
    let SimState {
        players,
        tokens,
        rng,
        settings,
        ..
    } = state;

    let mut applied = 0;
    for player in players.iter() {
        let view = ActorView {
            tokens: tokens.as_slice(),
            settings,
        };
        let nudges = player.decide(settings.actions_per_step, &view, &mut *rng);
        for nudge in nudges {
            // Players only return ids of tokens they can see, but stay tolerant
            if let Some(token) = tokens.iter_mut().find(|t| t.id == nudge.token) {
                token.act(nudge.direction, settings.nudge_force);
                applied += 1;
            }
        }
    }
    applied
}

fn locomotion_phase(state: &mut SimState) {
    let SimState { tokens, settings, .. } = state;
    for token in tokens.iter_mut() {
        token.update_location(settings);
    }
}

/// Settle every token once; removals are compacted after the pass
fn resolution_phase(state: &mut SimState) -> (Vec<Resolution>, usize) {
    let step = state.step_count;
    let tokens = &mut state.tokens;
    let mut removals = Removals::new();
    let mut resolutions = Vec::new();

    for index in 0..tokens.len() {
        if let Some(resolution) = settle_intersections(tokens, index, &mut removals) {
            log::debug!("step {}: {:?}", step, resolution);
            resolutions.push(resolution);
        }
    }

    let removed = removals.len();
    removals.compact(tokens);
    (resolutions, removed)
}

/// Overlap repulsion, computed from phase-start positions then applied
fn overlap_force_phase(state: &mut SimState) {
    let repulsion = state.settings.overlap_repulsion;
    let pushes: Vec<Vec2> = {
        let tokens: &[Token] = &state.tokens;
        tokens.iter().map(|t| t.overlap_force(tokens, repulsion)).collect()
    };
    for (token, push) in state.tokens.iter_mut().zip(pushes) {
        token.forces += push;
    }
}

fn reset_phase(state: &mut SimState) {
    for token in state.tokens.iter_mut() {
        token.end_step();
    }
}
