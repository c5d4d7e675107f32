//! Attract-mode autopilot
//!
//! Picks the nearest free food, walks toward its lane and throws the lasso
//! where the food will be when the tip arrives.

use glam::IVec2;

use super::state::{FoodState, GameState, MoveDirection};
use super::tick::TickInput;
use crate::within_radius;

/// How far the autopilot is willing to throw
const THROW_RANGE: f32 = 420.0;

/// Build the input the autopilot would press this tick
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let mouth = state.player.mouth(&state.tuning);

    let Some(food) = state
        .foods
        .iter()
        .filter(|f| f.state == FoodState::Default)
        .min_by_key(|f| (f.pos - mouth).length_squared())
    else {
        return input;
    };

    let dy = food.pos.y - mouth.y;
    if dy.abs() > state.tuning.player_speed {
        input
            .moves
            .push(if dy < 0 { MoveDirection::Up } else { MoveDirection::Down });
    }

    if state.lasso.is_idle() {
        // Lead the target by the tip's flight time
        let flight = mouth.as_vec2().distance(food.pos.as_vec2()) / state.lasso.speed();
        let lead = food.pos + IVec2::new(food.speed * flight.round() as i32, 0);
        if within_radius(mouth, lead, THROW_RANGE) {
            input.fire = Some(lead);
        }
    }

    input
}
