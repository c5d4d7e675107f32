//! Lasso state machine
//!
//! Idle -> Extending on fire, Extending -> Retracting on a catch or on
//! reaching the target. The lasso never leaves Retracting on its own: the
//! tick loop watches for the tip to get home and calls [`Lasso::reset`].
//!
//! The lasso holds caught food by id only. While it has one, it is the sole
//! writer of that food's position.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::state::{Food, FoodState};
use crate::{step_toward, within_radius};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LassoState {
    Idle,
    Extending,
    Retracting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lasso {
    pub state: LassoState,
    /// Emission point, refreshed from the player every tick
    pub start: IVec2,
    /// Tip
    pub end: IVec2,
    /// Where the lasso was thrown
    pub target: Option<IVec2>,
    caught: Option<u32>,
    speed: f32,
    capture_radius: f32,
}

impl Lasso {
    pub fn new(origin: IVec2, speed: f32, capture_radius: f32) -> Self {
        Self {
            state: LassoState::Idle,
            start: origin,
            end: origin,
            target: None,
            caught: None,
            speed,
            capture_radius,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == LassoState::Idle
    }

    /// Id of the food currently on the rope
    pub fn caught_food(&self) -> Option<u32> {
        self.caught
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Throw toward `target` from `origin`. Ignored unless idle.
    pub fn fire(&mut self, origin: IVec2, target: IVec2) -> bool {
        if self.state != LassoState::Idle {
            return false;
        }
        self.start = origin;
        self.end = origin;
        self.target = Some(target);
        self.state = LassoState::Extending;
        true
    }

    /// Advance one tick.
    ///
    /// Returns the id of a food hooked during this tick, if any.
    pub fn update(&mut self, origin: IVec2, foods: &mut [Food]) -> Option<u32> {
        self.start = origin;

        match self.state {
            LassoState::Idle => None,
            LassoState::Extending => {
                let Some(target) = self.target else {
                    self.state = LassoState::Retracting;
                    return None;
                };
                self.end = step_toward(self.end, target, self.speed);

                // First free food under the tip wins
                if let Some(food) = foods.iter_mut().find(|f| {
                    f.state == FoodState::Default
                        && within_radius(self.end, f.pos, self.capture_radius)
                }) {
                    food.state = FoodState::CapturedByLasso;
                    self.caught = Some(food.id);
                    self.state = LassoState::Retracting;
                    return Some(food.id);
                }

                if within_radius(self.end, target, self.speed) {
                    self.state = LassoState::Retracting;
                }
                None
            }
            LassoState::Retracting => {
                self.end = step_toward(self.end, self.start, self.speed);

                if let Some(id) = self.caught {
                    match foods.iter_mut().find(|f| f.id == id) {
                        Some(food) => food.set_position(self.end),
                        None => self.caught = None,
                    }
                }
                None
            }
        }
    }

    /// True when the tip is strictly within `radius` of `point`
    pub fn tip_within(&self, point: IVec2, radius: f32) -> bool {
        within_radius(self.end, point, radius)
    }

    /// Back to idle with the tip at the emission point.
    ///
    /// Forgets the caught food without touching its state; the caller
    /// decides what happens to it.
    pub fn reset(&mut self) {
        self.state = LassoState::Idle;
        self.end = self.start;
        self.target = None;
        self.caught = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CAPTURE_RADIUS, LASSO_SPEED};

    fn lasso_at(origin: IVec2) -> Lasso {
        Lasso::new(origin, LASSO_SPEED, CAPTURE_RADIUS)
    }

    #[test]
    fn test_fire_only_from_idle() {
        let mut lasso = lasso_at(IVec2::ZERO);
        assert!(lasso.fire(IVec2::ZERO, IVec2::new(200, 0)));
        assert_eq!(lasso.state, LassoState::Extending);

        // Second fire is ignored and leaves the target alone
        assert!(!lasso.fire(IVec2::new(5, 5), IVec2::new(-300, 0)));
        assert_eq!(lasso.state, LassoState::Extending);
        assert_eq!(lasso.target, Some(IVec2::new(200, 0)));
        assert_eq!(lasso.start, IVec2::ZERO);
    }

    #[test]
    fn test_extends_then_retracts_without_food() {
        let mut lasso = lasso_at(IVec2::ZERO);
        lasso.fire(IVec2::ZERO, IVec2::new(100, 0));
        let mut foods: Vec<Food> = Vec::new();

        for step in 1..=4 {
            lasso.update(IVec2::ZERO, &mut foods);
            assert_eq!(lasso.end, IVec2::new(step * 20, 0));
            assert_eq!(lasso.state, LassoState::Extending);
        }
        // Fifth step lands on the target
        lasso.update(IVec2::ZERO, &mut foods);
        assert_eq!(lasso.end, IVec2::new(100, 0));
        assert_eq!(lasso.state, LassoState::Retracting);
        assert_eq!(lasso.caught_food(), None);
    }

    #[test]
    fn test_captures_first_free_food() {
        let mut lasso = lasso_at(IVec2::ZERO);
        let mut foods = vec![
            Food::new(1, "steak", 20, IVec2::new(60, 10), 0),
            Food::new(2, "sushi", 10, IVec2::new(60, -10), 0),
        ];
        lasso.fire(IVec2::ZERO, IVec2::new(200, 0));
        assert_eq!(lasso.update(IVec2::ZERO, &mut foods), None); // tip (20,0)
        assert_eq!(lasso.update(IVec2::ZERO, &mut foods), Some(1)); // tip (40,0)

        assert_eq!(lasso.state, LassoState::Retracting);
        assert_eq!(foods[0].state, FoodState::CapturedByLasso);
        assert_eq!(foods[1].state, FoodState::Default);
    }

    #[test]
    fn test_ignores_food_already_taken() {
        let mut lasso = lasso_at(IVec2::ZERO);
        let mut foods = vec![Food::new(1, "steak", 20, IVec2::new(20, 0), 0)];
        foods[0].state = FoodState::AnimatingToBasket;
        lasso.fire(IVec2::ZERO, IVec2::new(60, 0));
        lasso.update(IVec2::ZERO, &mut foods);
        assert_eq!(lasso.caught_food(), None);
        assert_eq!(foods[0].state, FoodState::AnimatingToBasket);
    }

    #[test]
    fn test_retract_drags_food_and_tracks_moving_origin() {
        let mut lasso = lasso_at(IVec2::ZERO);
        let mut foods = vec![Food::new(7, "hotdog", 20, IVec2::new(20, 0), 2)];
        lasso.fire(IVec2::ZERO, IVec2::new(100, 0));
        assert_eq!(lasso.update(IVec2::ZERO, &mut foods), Some(7));

        // Origin moved down; the tip heads for the new origin
        let origin = IVec2::new(0, 40);
        lasso.update(origin, &mut foods);
        assert_eq!(lasso.start, origin);
        assert_eq!(foods[0].pos, lasso.end);
        let before = IVec2::new(20, 0).as_vec2().distance(origin.as_vec2());
        assert!(lasso.end.as_vec2().distance(origin.as_vec2()) < before);

        // Lasso stays retracting even once home; the caller resets it
        for _ in 0..10 {
            lasso.update(origin, &mut foods);
        }
        assert_eq!(lasso.end, origin);
        assert_eq!(lasso.state, LassoState::Retracting);
    }

    #[test]
    fn test_reset_forgets_food_but_keeps_its_state() {
        let mut lasso = lasso_at(IVec2::ZERO);
        let mut foods = vec![Food::new(3, "corn", -10, IVec2::new(10, 0), 0)];
        lasso.fire(IVec2::ZERO, IVec2::new(100, 0));
        lasso.update(IVec2::ZERO, &mut foods);
        lasso.update(IVec2::new(0, 8), &mut foods);
        lasso.reset();

        assert!(lasso.is_idle());
        assert_eq!(lasso.caught_food(), None);
        assert_eq!(lasso.end, IVec2::new(0, 8));
        assert_eq!(foods[0].state, FoodState::CapturedByLasso);
    }

    #[test]
    fn test_missing_target_retracts() {
        let mut lasso = lasso_at(IVec2::ZERO);
        lasso.state = LassoState::Extending;
        lasso.update(IVec2::ZERO, &mut []);
        assert_eq!(lasso.state, LassoState::Retracting);
    }

    #[test]
    fn test_vanished_caught_food_is_forgotten() {
        let mut lasso = lasso_at(IVec2::ZERO);
        let mut foods = vec![Food::new(4, "pudding", 10, IVec2::new(15, 0), 0)];
        lasso.fire(IVec2::ZERO, IVec2::new(100, 0));
        lasso.update(IVec2::ZERO, &mut foods);
        foods.clear();
        lasso.update(IVec2::ZERO, &mut foods);
        assert_eq!(lasso.caught_food(), None);
    }
}
