//! Browser facade
//!
//! The page owns the canvas, rendering and DOM events; it forwards input here
//! and reads back JSON snapshots each frame.

use glam::IVec2;
use wasm_bindgen::prelude::*;

use super::FixedStep;
use crate::audio::WebAudio;
use crate::persistence::LocalStorageStore;
use crate::session::{SaveStatus, Session};
use crate::settings::Settings;
use crate::sim::{MoveDirection, TickInput, Viewport};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Lasso Feast starting...");
}

/// Map a `KeyboardEvent.key` value to a walking direction
fn key_direction(key: &str) -> Option<MoveDirection> {
    match key {
        "ArrowUp" | "w" | "W" => Some(MoveDirection::Up),
        "ArrowDown" | "s" | "S" => Some(MoveDirection::Down),
        "ArrowLeft" | "a" | "A" => Some(MoveDirection::Left),
        "ArrowRight" | "d" | "D" => Some(MoveDirection::Right),
        _ => None,
    }
}

fn status_name(status: SaveStatus) -> String {
    match status {
        SaveStatus::Saved => "saved",
        SaveStatus::Skipped => "skipped",
        SaveStatus::Deferred => "deferred",
    }
    .to_string()
}

/// Game instance driven by the page's animation loop
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    clock: FixedStep,
    viewport: Viewport,
    last_time: f64,
    /// Held movement keys, in press order
    held: Vec<MoveDirection>,
    // One-shot inputs, consumed by the next tick
    fire: Option<IVec2>,
    pause: bool,
    demo: bool,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: i32, height: i32) -> WebGame {
        let settings = Settings::load();
        let audio = WebAudio::new(&settings);
        Self {
            session: Session::new(
                settings,
                Box::new(audio),
                Box::new(LocalStorageStore::default()),
            ),
            clock: FixedStep::default(),
            viewport: Viewport::new(width, height),
            last_time: 0.0,
            held: Vec::new(),
            fire: None,
            pause: false,
            demo: false,
        }
    }

    /// Start a game; `demo` hands control to the autopilot
    pub fn start(&mut self, username: &str, demo: bool) {
        let seed = js_sys::Date::now() as u64;
        self.session.start_game(username, self.viewport, seed);
        self.demo = demo;
        self.held.clear();
        self.fire = None;
        self.pause = false;
        self.clock.reset();
        self.last_time = 0.0;
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Advance by the time since the previous frame (`requestAnimationFrame` timestamp)
    pub fn frame(&mut self, time_ms: f64) {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            self.clock.step()
        };
        self.last_time = time_ms;

        for _ in 0..self.clock.advance(dt) {
            let input = TickInput {
                moves: self.held.clone(),
                fire: self.fire.take(),
                pause: std::mem::take(&mut self.pause),
                demo: self.demo,
            };
            self.session.tick(&input, self.viewport);
        }
    }

    /// Key down/up. Returns true if the key is a game key.
    pub fn set_key(&mut self, key: &str, down: bool) -> bool {
        let Some(direction) = key_direction(key) else {
            return false;
        };
        self.held.retain(|d| *d != direction);
        if down {
            self.held.push(direction);
        }
        true
    }

    /// Throw the lasso at a playfield point
    pub fn fire(&mut self, x: i32, y: i32) {
        self.fire = Some(IVec2::new(x, y));
    }

    pub fn toggle_pause(&mut self) {
        self.pause = true;
    }

    /// Pause without toggling (window blur)
    pub fn pause(&mut self) {
        self.session.pause();
        self.clock.reset();
    }

    /// End the game and save. Returns "saved", "skipped" or "deferred".
    pub fn quit(&mut self) -> String {
        self.held.clear();
        status_name(self.session.stop_game_and_save())
    }

    pub fn retry_save(&mut self) -> String {
        status_name(self.session.retry_save())
    }

    pub fn has_unsaved(&self) -> bool {
        !self.session.unsaved().is_empty()
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.phase())
    }

    /// Current game as JSON, or `null` before the first game
    pub fn snapshot(&self) -> String {
        match self.session.state() {
            Some(state) => serde_json::to_string(state).unwrap_or_else(|e| {
                log::error!("Snapshot failed: {}", e);
                "null".to_string()
            }),
            None => "null".to_string(),
        }
    }

    /// Ranked records as a JSON array
    pub fn leaderboard(&self) -> String {
        serde_json::to_string(&self.session.leaderboard()).unwrap_or_else(|_| "[]".to_string())
    }
}
