//! Session controller
//!
//! Owns one play-through at a time plus the collaborators the game needs at
//! its boundaries: the audio sink and the score store. Sim events are
//! drained after every command or tick and turned into sounds here.

use glam::IVec2;

use crate::audio::{AudioSink, SoundEffect};
use crate::leaderboard::{Leaderboard, ScoreRecord};
use crate::persistence::ScoreStore;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, GameState, MoveDirection, TickInput, Viewport};

/// Outcome of the end-of-game save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Record written
    Saved,
    /// Nothing worth saving (no username, or no score and no catches)
    Skipped,
    /// Store failed; the record is queued for [`Session::retry_save`]
    Deferred,
}

pub struct Session {
    settings: Settings,
    audio: Box<dyn AudioSink>,
    store: Box<dyn ScoreStore>,
    username: Option<String>,
    /// Current game, or the last finished one while on the start screen
    game: Option<GameState>,
    /// Records whose save failed, oldest first
    unsaved: Vec<ScoreRecord>,
}

impl Session {
    /// Create a session sitting on the start screen
    pub fn new(settings: Settings, audio: Box<dyn AudioSink>, store: Box<dyn ScoreStore>) -> Self {
        let mut session = Self {
            settings: settings.sanitized(),
            audio,
            store,
            username: None,
            game: None,
            unsaved: Vec::new(),
        };
        session.audio.play_loop(SoundEffect::MenuMusic);
        session
    }

    /// Begin a new game. A game already in progress is stopped and saved first.
    pub fn start_game(&mut self, username: &str, viewport: Viewport, seed: u64) {
        if self.is_in_game() {
            self.stop_game_and_save();
        }

        let username = username.trim();
        self.username = if username.is_empty() {
            log::warn!("Starting game without a username; score will not be saved");
            None
        } else {
            if let Err(e) = self.store.create_if_absent(username) {
                log::error!("Could not create score record for {}: {}", username, e);
            }
            Some(username.to_string())
        };

        self.game = Some(GameState::new(seed, viewport, self.settings.tuning.clone()));
        self.audio.stop(SoundEffect::MenuMusic);
        log::info!(
            "Game started for {} (seed {})",
            self.username.as_deref().unwrap_or("<anonymous>"),
            seed
        );
    }

    /// End the game, return to the start screen and save the result once
    pub fn stop_game_and_save(&mut self) -> SaveStatus {
        let Some(game) = self.game.as_mut().filter(|g| g.phase != GamePhase::StartScreen) else {
            return SaveStatus::Skipped;
        };
        game.phase = GamePhase::StartScreen;
        let (score, count) = (game.score, game.count);
        self.flush_events();
        self.audio.play_loop(SoundEffect::MenuMusic);
        log::info!("Game over: score {} count {}", score, count);

        let Some(username) = self.username.clone() else {
            return SaveStatus::Skipped;
        };
        if score == 0 && count == 0 {
            return SaveStatus::Skipped;
        }
        self.save_record(ScoreRecord::new(username, score, count))
    }

    /// Try again to write every record whose save failed
    pub fn retry_save(&mut self) -> SaveStatus {
        if self.unsaved.is_empty() {
            return SaveStatus::Skipped;
        }
        self.flush_pending()
    }

    /// Queue a finished game and write everything pending, oldest first
    fn save_record(&mut self, record: ScoreRecord) -> SaveStatus {
        self.unsaved.push(record);
        self.flush_pending()
    }

    fn flush_pending(&mut self) -> SaveStatus {
        let policy = self.settings.score_policy;
        let pending = std::mem::take(&mut self.unsaved);
        for record in pending {
            if let Err(e) = self.store.upsert_best_or_accumulate(&record, policy) {
                log::error!("Failed to save score for {}: {}", record.username, e);
                self.unsaved.push(record);
            }
        }
        if self.unsaved.is_empty() {
            SaveStatus::Saved
        } else {
            log::warn!("{} score record(s) waiting to be saved", self.unsaved.len());
            SaveStatus::Deferred
        }
    }

    pub fn pause(&mut self) {
        if let Some(game) = self.game.as_mut() {
            sim::pause(game);
        }
    }

    pub fn resume(&mut self) {
        if let Some(game) = self.game.as_mut() {
            sim::resume(game);
        }
    }

    /// Throw the lasso. Ignored unless playing with an idle lasso.
    pub fn fire_lasso(&mut self, target: IVec2) -> bool {
        let Some(game) = self.playing_mut() else {
            return false;
        };
        let fired = sim::fire_lasso(game, target);
        self.flush_events();
        fired
    }

    pub fn move_player(&mut self, direction: MoveDirection) {
        if let Some(game) = self.playing_mut() {
            sim::move_player(game, direction);
            self.flush_events();
        }
    }

    pub fn stop_walking(&mut self) {
        if let Some(game) = self.playing_mut() {
            sim::stop_walking(game);
        }
    }

    /// Advance one tick without input
    pub fn update(&mut self, viewport: Viewport) {
        if let Some(game) = self.game.as_mut() {
            sim::update(game, viewport);
            self.flush_events();
        }
    }

    /// Apply one tick of input and advance
    pub fn tick(&mut self, input: &TickInput, viewport: Viewport) {
        if let Some(game) = self.game.as_mut() {
            sim::tick(game, input, viewport);
            self.flush_events();
        }
    }

    fn playing_mut(&mut self) -> Option<&mut GameState> {
        self.game
            .as_mut()
            .filter(|g| g.phase == GamePhase::Playing)
    }

    fn is_in_game(&self) -> bool {
        self.game
            .as_ref()
            .is_some_and(|g| g.phase != GamePhase::StartScreen)
    }

    fn flush_events(&mut self) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        for event in game.drain_events() {
            match event {
                GameEvent::LassoFired => self.audio.play_once(SoundEffect::Eat),
                GameEvent::Footstep => self.audio.play_once(SoundEffect::Footstep),
                GameEvent::FoodDelivered { id, value } => {
                    log::debug!("Delivered food {} worth {}", id, value);
                    self.audio.play_once(SoundEffect::Delivered);
                }
                GameEvent::FoodSpawned { .. } | GameEvent::FoodCaptured { .. } => {}
            }
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.game
            .as_ref()
            .map_or(GamePhase::StartScreen, |g| g.phase)
    }

    /// Read-only view of the current (or last) game for rendering
    pub fn state(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// Direct access to the running game, for tools and tests
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    pub fn score(&self) -> i32 {
        self.game.as_ref().map_or(0, |g| g.score)
    }

    pub fn count(&self) -> u32 {
        self.game.as_ref().map_or(0, |g| g.count)
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Records whose save failed and are waiting for [`Session::retry_save`]
    pub fn unsaved(&self) -> &[ScoreRecord] {
        &self.unsaved
    }

    /// All stored records, best first. Empty if the store cannot be read.
    pub fn leaderboard(&self) -> Vec<ScoreRecord> {
        self.store.leaderboard().unwrap_or_else(|e| {
            log::warn!("Could not read leaderboard: {}", e);
            Vec::new()
        })
    }

    /// Leaderboard position of the current player (1 = best)
    pub fn player_rank(&self) -> Option<usize> {
        let username = self.username.as_deref()?;
        self.load_board()?.rank_of(username)
    }

    /// Best stored score of any player
    pub fn top_score(&self) -> Option<i32> {
        self.load_board()?.top_score()
    }

    fn load_board(&self) -> Option<Leaderboard> {
        self.store
            .load()
            .map_err(|e| log::warn!("Could not read leaderboard: {}", e))
            .ok()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace settings; tuning applies from the next game
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
    }
}
