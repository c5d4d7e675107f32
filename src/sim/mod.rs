//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod demo;
pub mod lasso;
pub mod spawn;
pub mod state;
pub mod tick;

pub use lasso::{Lasso, LassoState};
pub use spawn::{FoodSpec, NEGATIVE_POOL, POSITIVE_POOL, spawn_food, try_spawn};
pub use state::{
    Facing, FloatingScore, Food, FoodKind, FoodState, GameEvent, GamePhase, GameState,
    MoveDirection, Player, PlayerActivity, Rgb, Viewport,
};
pub use tick::{TickInput, fire_lasso, move_player, pause, resume, stop_walking, tick, update};
