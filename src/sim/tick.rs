//! Fixed timestep simulation tick
//!
//! Player commands plus the per-tick update: floating scores, lasso, food
//! homing, pruning and spawning, in that order.

use std::collections::HashSet;

use glam::IVec2;

use super::demo;
use super::lasso::LassoState;
use super::spawn::try_spawn;
use super::state::{
    Facing, FloatingScore, FoodState, GameEvent, GamePhase, GameState, MoveDirection,
    PlayerActivity, Viewport,
};
use crate::{step_toward, within_radius};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement keys held this tick, applied in order
    pub moves: Vec<MoveDirection>,
    /// Fire the lasso at this point
    pub fire: Option<IVec2>,
    /// Pause toggle
    pub pause: bool,
    /// Attract mode - the autopilot plays
    pub demo: bool,
}

/// Apply one tick of input and advance the game
pub fn tick(state: &mut GameState, input: &TickInput, viewport: Viewport) {
    state.viewport = viewport;

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::StartScreen => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let autopilot;
    let input = if input.demo {
        autopilot = demo::autopilot(state);
        &autopilot
    } else {
        input
    };

    if input.moves.is_empty() {
        stop_walking(state);
    } else {
        for &direction in &input.moves {
            move_player(state, direction);
        }
    }
    if let Some(target) = input.fire {
        fire_lasso(state, target);
    }

    update(state, viewport);
}

/// Advance the game state by one tick
pub fn update(state: &mut GameState, viewport: Viewport) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.viewport = viewport;
    state.time_ticks += 1;

    state.player.tick_action();
    state.footstep_cooldown = state.footstep_cooldown.saturating_sub(1);

    update_floating_scores(state);
    update_lasso(state);
    update_foods(state);
    try_spawn(state);
}

pub fn pause(state: &mut GameState) {
    if state.phase == GamePhase::Playing {
        state.phase = GamePhase::Paused;
    }
}

pub fn resume(state: &mut GameState) {
    if state.phase == GamePhase::Paused {
        state.phase = GamePhase::Playing;
    }
}

/// Walk one step, then keep the sprite inside the playfield
pub fn move_player(state: &mut GameState, direction: MoveDirection) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    player.activity = PlayerActivity::Walking;
    player.pos += direction.delta(tuning.player_speed);
    match direction {
        MoveDirection::Left => player.facing = Facing::Left,
        MoveDirection::Right => player.facing = Facing::Right,
        MoveDirection::Up | MoveDirection::Down => {}
    }
    player.clamp_to(state.viewport, tuning);

    if state.footstep_cooldown == 0 {
        state.events.push(GameEvent::Footstep);
        state.footstep_cooldown = tuning.footstep_ticks;
    }
}

/// Stop the walk animation; never interrupts eating
pub fn stop_walking(state: &mut GameState) {
    if state.player.activity == PlayerActivity::Walking {
        state.player.activity = PlayerActivity::Idle;
    }
}

/// Throw the lasso from the player's mouth. Ignored unless the lasso is idle.
pub fn fire_lasso(state: &mut GameState, target: IVec2) -> bool {
    let mouth = state.player.mouth(&state.tuning);
    if !state.lasso.fire(mouth, target) {
        return false;
    }
    state
        .player
        .begin_action(PlayerActivity::Eating, state.tuning.eat_ticks);
    state.events.push(GameEvent::LassoFired);
    true
}

fn update_floating_scores(state: &mut GameState) {
    for fs in &mut state.floating_scores {
        fs.update();
    }
    state.floating_scores.retain(|fs| fs.is_alive());
}

fn update_lasso(state: &mut GameState) {
    let mouth = state.player.mouth(&state.tuning);

    if let Some(id) = state.lasso.update(mouth, &mut state.foods) {
        log::debug!("Lasso caught food {}", id);
        state.events.push(GameEvent::FoodCaptured { id });
    }

    // Home: hand the catch to the basket and coil the rope
    if state.lasso.state == LassoState::Retracting
        && state.lasso.tip_within(mouth, state.tuning.retract_done_radius)
    {
        if let Some(id) = state.lasso.caught_food() {
            if let Some(food) = state.foods.iter_mut().find(|f| f.id == id) {
                food.state = FoodState::AnimatingToBasket;
            }
        }
        state.lasso.reset();
    }
}

/// Move food, deliver food that reached the basket, prune strays.
///
/// Removals are collected during the pass and swept afterwards so no
/// neighbour is skipped.
fn update_foods(state: &mut GameState) {
    let anchor = state.viewport.basket_anchor(&state.tuning);
    let mut delivered: Vec<(u32, i32)> = Vec::new();

    for food in &mut state.foods {
        if food.state == FoodState::AnimatingToBasket {
            if within_radius(food.pos, anchor, state.tuning.basket_arrival_radius) {
                delivered.push((food.id, food.value));
            } else {
                food.pos = step_toward(food.pos, anchor, state.tuning.basket_step);
            }
        } else {
            food.move_step();
        }
    }

    for &(id, value) in &delivered {
        state.score += value;
        state.count += 1;
        state
            .floating_scores
            .push(FloatingScore::new(value, anchor, &state.tuning));
        state.events.push(GameEvent::FoodDelivered { id, value });
        log::debug!("Delivered food {} for {:+} (score {})", id, value, state.score);
    }

    let delivered: HashSet<u32> = delivered.into_iter().map(|(id, _)| id).collect();
    let viewport = state.viewport;
    let margin = state.tuning.despawn_margin;
    state
        .foods
        .retain(|f| !delivered.contains(&f.id) && !f.is_offscreen(viewport, margin));
}
