//! Run controller
//!
//! Owns the current run and the progression store, and talks to the outside
//! world only through the injected collaborators: a key/value store, a sound
//! sink and a scene. Player commands are queued and applied on the next sim
//! step.

use crate::audio::{SoundEffect, SoundSink};
use crate::platform::{Command, FixedStep};
use crate::progression::{KeyValueStore, ProgressionState, ProgressionStore};
use crate::renderer::{Scene, SceneSync};
use crate::sim::{EndReason, GameEvent, RunPhase, RunState, TickInput, TrackLayout, tick};
use crate::skins::{self, PurchaseResult, ShopEntry, ShopOutcome};
use crate::tuning::Tuning;

/// Result of a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub reason: EndReason,
    pub distance: f32,
    pub coins_collected: u32,
    pub best_distance: f32,
    pub new_record: bool,
}

pub struct Game<S: KeyValueStore, A: SoundSink, R: Scene> {
    run: RunState,
    progression: ProgressionStore<S>,
    audio: A,
    scene: R,
    scene_sync: SceneSync,
    clock: FixedStep,
    pending: TickInput,
    tuning: Tuning,
    layout: TrackLayout,
    summary: Option<RunSummary>,
}

impl<S: KeyValueStore, A: SoundSink, R: Scene> Game<S, A, R> {
    pub fn new(
        storage: S,
        audio: A,
        scene: R,
        tuning: Tuning,
        layout: TrackLayout,
        seed: u64,
    ) -> Self {
        let progression = ProgressionStore::load(storage);
        let run = RunState::new(
            seed,
            progression.state().best_distance,
            tuning.clone(),
            layout,
        );
        Self {
            run,
            progression,
            audio,
            scene,
            scene_sync: SceneSync::new(),
            clock: FixedStep::new(),
            pending: TickInput::default(),
            tuning,
            layout,
            summary: None,
        }
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    pub fn progression(&self) -> &ProgressionState {
        self.progression.state()
    }

    pub fn storage(&self) -> &S {
        self.progression.storage()
    }

    pub fn storage_mut(&mut self) -> &mut S {
        self.progression.storage_mut()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn scene(&self) -> &R {
        &self.scene
    }

    /// Summary of the last finished run, until the next restart
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    pub fn autopilot(&self) -> bool {
        self.pending.autopilot
    }

    pub fn start(&mut self) {
        self.handle(Command::Start);
    }

    pub fn set_color(&mut self, code: char) {
        self.handle(Command::SetColor(code));
    }

    pub fn cycle_color(&mut self) {
        self.handle(Command::CycleColor);
    }

    pub fn end_run(&mut self) {
        self.handle(Command::EndRun);
    }

    /// Queue a player command for the next sim step
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Restart => {
                let seed = next_seed(self.run.seed);
                self.restart(seed);
            }
            Command::Start => {
                if self.run.phase == RunPhase::NotStarted {
                    self.audio.play(SoundEffect::Click);
                }
                command.apply_to(&mut self.pending);
            }
            Command::ActivateSkin(skin_id) => {
                self.activate_skin(skin_id);
            }
            Command::ToggleAutopilot => {
                command.apply_to(&mut self.pending);
                log::info!("Autopilot: {}", self.pending.autopilot);
            }
            _ => {
                command.apply_to(&mut self.pending);
            }
        }
    }

    /// Replace the finished (or unfinished) run with a fresh one
    pub fn restart(&mut self, seed: u64) {
        self.run = RunState::new(
            seed,
            self.progression.state().best_distance,
            self.tuning.clone(),
            self.layout,
        );
        self.scene_sync.clear(&mut self.scene);
        self.clock.reset();
        self.pending = TickInput {
            autopilot: self.pending.autopilot,
            ..Default::default()
        };
        self.summary = None;
        log::info!("Run restarted with seed: {}", seed);
    }

    /// Advance by one rendered frame of `elapsed_ms`, then refresh the scene
    pub fn frame(&mut self, elapsed_ms: f64) -> Vec<GameEvent> {
        let steps = self.clock.advance(elapsed_ms);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(self.step(crate::consts::SIM_DT));
        }
        self.sync_scene();
        events
    }

    /// Run exactly one sim step of `dt` seconds and react to its events
    pub fn step(&mut self, dt: f32) -> Vec<GameEvent> {
        let input = std::mem::take(&mut self.pending);
        self.pending.autopilot = input.autopilot;
        let events = tick(&mut self.run, &input, dt);
        for event in &events {
            self.dispatch(event);
        }
        events
    }

    pub fn sync_scene(&mut self) {
        let shape = skins::selected_shape(self.progression.state());
        self.scene_sync.sync(&mut self.scene, &self.run, shape);
    }

    /// Catalog with ownership and selection flags for the shop screen
    pub fn shop(&self) -> Vec<ShopEntry> {
        skins::shop_entries(self.progression.state())
    }

    /// Shop card click. Only available between runs.
    pub fn activate_skin(&mut self, skin_id: &str) -> Option<ShopOutcome> {
        if self.run.phase == RunPhase::Running {
            return None;
        }
        self.audio.play(SoundEffect::Click);
        let outcome = self.progression.activate_skin(skin_id);
        match outcome {
            ShopOutcome::Selected => {}
            ShopOutcome::Purchase(PurchaseResult::Purchased { .. }) => {
                self.audio.play(SoundEffect::Match)
            }
            ShopOutcome::Purchase(_) => self.audio.play(SoundEffect::Miss),
        }
        Some(outcome)
    }

    fn dispatch(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::GateMatched { .. } => self.audio.play(SoundEffect::Match),
            GameEvent::GateMissed { .. } => self.audio.play(SoundEffect::Miss),
            GameEvent::CoinsAwarded { amount } => {
                let total = self.progression.add_coins(amount);
                log::debug!("+{} coins (balance {})", amount, total);
                self.audio.play(SoundEffect::Match);
            }
            GameEvent::RecordBeaten { distance } => {
                log::info!("New best distance in progress: {:.0}m", distance);
                self.audio.play(SoundEffect::Record);
            }
            GameEvent::RunEnded {
                reason,
                distance,
                new_record,
            } => {
                self.progression.record_distance(distance);
                self.audio.play(SoundEffect::GameOver);
                let summary = RunSummary {
                    reason,
                    distance,
                    coins_collected: self.run.coins_collected,
                    best_distance: self.progression.state().best_distance,
                    new_record,
                };
                log::info!(
                    "Run over ({:?}): {:.0}m, {} coins, best {:.0}m{}",
                    reason,
                    distance,
                    summary.coins_collected,
                    summary.best_distance,
                    if new_record { " - new record!" } else { "" }
                );
                self.summary = Some(summary);
            }
            _ => {}
        }
    }
}

/// Derive the next run's seed from the previous one
fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::platform::command_for_key;
    use crate::progression::{KEY_BEST_DISTANCE, KEY_COINS, KEY_SELECTED_SKIN, MemoryStore};
    use crate::renderer::{EntityId, Sprite, SpriteKind};
    use crate::skins::SkinShape;
    use crate::sim::ColorChoice;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Recorder(Vec<SoundEffect>);

    impl SoundSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.0.push(effect);
        }
    }

    #[derive(Default)]
    struct MapScene(BTreeMap<EntityId, Sprite>);

    impl Scene for MapScene {
        fn place(&mut self, id: EntityId, sprite: &Sprite) {
            self.0.insert(id, *sprite);
        }

        fn remove(&mut self, id: EntityId) {
            self.0.remove(&id);
        }
    }

    type TestGame = Game<MemoryStore, Recorder, MapScene>;

    fn new_game(storage: MemoryStore, seed: u64) -> TestGame {
        Game::new(
            storage,
            Recorder::default(),
            MapScene::default(),
            Tuning::default(),
            TrackLayout::default(),
            seed,
        )
    }

    /// Step until the run ends (a wrong-color gate gets through)
    fn play_until_over(game: &mut TestGame) {
        for _ in 0..120 * 600 {
            game.step(SIM_DT);
            if game.phase() == RunPhase::Ended {
                return;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn start_is_applied_on_next_step() {
        let mut game = new_game(MemoryStore::new(), 1);
        game.start();
        assert_eq!(game.phase(), RunPhase::NotStarted);
        assert_eq!(game.audio().0, vec![SoundEffect::Click]);
        let events = game.step(SIM_DT);
        assert_eq!(events[0], GameEvent::RunStarted);
        assert_eq!(game.phase(), RunPhase::Running);
    }

    #[test]
    fn color_can_be_chosen_before_start() {
        let mut game = new_game(MemoryStore::new(), 1);
        game.set_color('Y');
        game.step(SIM_DT);
        assert_eq!(game.run().color, ColorChoice::Yellow);
        assert_eq!(game.phase(), RunPhase::NotStarted);
    }

    #[test]
    fn passive_run_ends_and_records_best() {
        let mut game = new_game(MemoryStore::new(), 2024);
        game.start();
        play_until_over(&mut game);

        let summary = *game.summary().expect("summary after game over");
        assert!(matches!(summary.reason, EndReason::WrongColorPassed { .. }));
        assert!(summary.new_record);
        assert_eq!(summary.best_distance, summary.distance);
        assert_eq!(game.progression().best_distance, summary.distance);
        assert!(game.storage().get_item(KEY_BEST_DISTANCE).is_some());
        assert_eq!(game.audio().0.last(), Some(&SoundEffect::GameOver));
    }

    #[test]
    fn explicit_end_run() {
        let mut game = new_game(MemoryStore::new(), 3);
        game.start();
        game.step(SIM_DT);
        game.end_run();
        game.step(SIM_DT);
        assert_eq!(game.phase(), RunPhase::Ended);
        assert_eq!(game.summary().map(|s| s.reason), Some(EndReason::Quit));

        // Color input is ignored once ended
        game.cycle_color();
        game.step(SIM_DT);
        assert_eq!(game.run().color, ColorChoice::Red);
    }

    #[test]
    fn coins_persist_as_they_are_awarded() {
        let mut game = new_game(MemoryStore::new(), 5);
        game.handle(Command::ToggleAutopilot);
        game.start();
        // ~60 seconds of autopilot covers more than 2000m
        for _ in 0..120 * 60 {
            game.step(SIM_DT);
        }
        assert_eq!(game.phase(), RunPhase::Running);
        let coins = game.progression().coins;
        assert!(coins >= 20);
        assert_eq!(coins, game.run().coins_collected);
        assert_eq!(
            game.storage().get_item(KEY_COINS),
            Some(coins.to_string())
        );
    }

    #[test]
    fn restart_resets_run_but_keeps_progression() {
        let storage = MemoryStore::with_items([(KEY_COINS, "40")]);
        let mut game = new_game(storage, 11);
        game.start();
        play_until_over(&mut game);
        let best = game.progression().best_distance;
        let coins = game.progression().coins;

        game.handle(Command::Restart);
        let run = game.run();
        assert_eq!(run.phase, RunPhase::NotStarted);
        assert_eq!(run.distance, 0.0);
        assert_eq!(run.speed, 360.0);
        assert_eq!(run.milestones.last_coin, 0.0);
        assert_eq!(run.milestones.last_speed, 0.0);
        assert_eq!(run.coins_collected, 0);
        assert!(run.gates.is_empty());
        assert_eq!(run.previous_best, best);
        assert!(game.summary().is_none());
        assert_eq!(game.progression().best_distance, best);
        assert_eq!(game.progression().coins, coins);

        // Reloading from storage sees the same progression
        let reloaded = ProgressionStore::load(game.storage().clone());
        assert_eq!(reloaded.state().best_distance, best);
        assert_eq!(reloaded.state().coins, coins);
    }

    #[test]
    fn shorter_second_run_is_not_a_record() {
        let mut game = new_game(MemoryStore::new(), 8);
        game.start();
        play_until_over(&mut game);
        let best = game.progression().best_distance;

        game.handle(Command::Restart);
        game.start();
        game.step(SIM_DT);
        game.end_run();
        game.step(SIM_DT);
        let summary = game.summary().unwrap();
        assert!(!summary.new_record);
        assert_eq!(summary.best_distance, best);
    }

    #[test]
    fn shop_only_between_runs() {
        let storage = MemoryStore::with_items([(KEY_COINS, "60")]);
        let mut game = new_game(storage, 4);
        assert_eq!(
            game.activate_skin("circle"),
            Some(ShopOutcome::Purchase(PurchaseResult::Purchased { remaining: 10 }))
        );
        assert_eq!(
            game.activate_skin("star"),
            Some(ShopOutcome::Purchase(PurchaseResult::InsufficientCoins {
                needed: 190
            }))
        );
        assert_eq!(game.activate_skin("circle"), Some(ShopOutcome::Selected));
        assert_eq!(
            game.audio().0,
            vec![
                SoundEffect::Click,
                SoundEffect::Match,
                SoundEffect::Click,
                SoundEffect::Miss,
                SoundEffect::Click,
            ]
        );

        game.start();
        game.step(SIM_DT);
        assert_eq!(game.activate_skin("default"), None);
    }

    #[test]
    fn shop_keys_buy_and_select_skins() {
        let storage = MemoryStore::with_items([(KEY_COINS, "120")]);
        let mut game = new_game(storage, 9);
        let press = |game: &TestGame, key: &str| command_for_key(key, game.phase());

        let buy_triangle = press(&game, "3").expect("shop key between runs");
        game.handle(buy_triangle);
        let shop = game.shop();
        assert!(shop[2].owned);
        assert!(!shop[2].selected);
        assert_eq!(game.progression().coins, 20);

        let select = press(&game, "3").unwrap();
        game.handle(select);
        assert!(game.shop()[2].selected);
        assert_eq!(game.storage().get_item(KEY_SELECTED_SKIN).as_deref(), Some("triangle"));

        // Selected shape reaches the scene
        game.sync_scene();
        assert_eq!(
            game.scene().0[&EntityId::Runner].kind,
            SpriteKind::Runner(SkinShape::Triangle)
        );

        // No shop while running
        game.start();
        game.step(SIM_DT);
        assert_eq!(press(&game, "1"), None);
        game.handle(Command::ActivateSkin("default"));
        assert!(game.shop()[2].selected);
    }

    #[test]
    fn frame_mirrors_run_into_scene() {
        let mut game = new_game(MemoryStore::new(), 6);
        game.start();
        // 1.5s of frames: one gate spawned
        for _ in 0..90 {
            game.frame(1000.0 / 60.0);
        }
        let scene = &game.scene().0;
        assert!(scene.contains_key(&EntityId::Runner));
        assert_eq!(
            scene.keys().filter(|id| matches!(id, EntityId::Gate(_))).count(),
            game.run().gates.len()
        );
        assert!(!game.run().gates.is_empty());
    }
}
