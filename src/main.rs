//! Color Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use color_dash::audio::AudioManager;
    use color_dash::platform::storage::LocalStorage;
    use color_dash::platform::{command_for_key, command_for_pointer};
    use color_dash::renderer::CanvasScene;
    use color_dash::sim::{RunPhase, TrackLayout};
    use color_dash::{Game, Settings, Tuning};

    type WebGame = Game<LocalStorage, AudioManager, CanvasScene>;

    /// Game instance plus frame timing
    struct App {
        game: WebGame,
        settings: Settings,
        last_time: f64,
    }

    impl App {
        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;
            self.game.frame(elapsed);
            self.game.audio_mut().update_music();
            self.game.scene().draw();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let run = self.game.run();
            let progression = self.game.progression();

            let set = |id: &str, text: String| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&text));
                }
            };
            set("hud-distance", format!("Distance: {}m", run.distance.round()));
            let best = progression.best_distance.max(run.distance);
            set("hud-best", format!("Best: {}m", best.round()));
            set("hud-speed", format!("Speed: {}", run.speed.round()));
            set("hud-coins", format!("Coins: {}", progression.coins));

            let shop: Vec<String> = self
                .game
                .shop()
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let status = if entry.selected {
                        "selected".to_string()
                    } else if entry.owned {
                        "owned".to_string()
                    } else {
                        format!("{} coins", entry.skin.price)
                    };
                    format!("[{}] {} ({})", i + 1, entry.skin.name, status)
                })
                .collect();
            set("hud-shop", shop.join("  "));

            if let Some(el) = document.get_element_by_id("game-over") {
                let class = if run.phase == RunPhase::Ended { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(summary) = self.game.summary() {
                set(
                    "game-over-stats",
                    format!(
                        "Distance: {}m  -  Best: {}m{}",
                        summary.distance.round(),
                        summary.best_distance.round(),
                        if summary.new_record { "  -  New record!" } else { "" }
                    ),
                );
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Color Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let layout = TrackLayout::new(width as f32, height as f32);

        let storage = LocalStorage::open();
        let settings = Settings::load(&storage);
        let audio = AudioManager::new(&settings);
        let scene = CanvasScene::new(&canvas, layout).expect("no 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(storage, audio, scene, Tuning::default(), layout, seed);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            settings,
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_auto_mute(app.clone());
        request_animation_frame(app);

        log::info!("Color Dash running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Tap/click anywhere on the track
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                let mut a = app.borrow_mut();
                let phase = a.game.phase();
                if phase == RunPhase::NotStarted {
                    a.game.start();
                } else if let Some(command) = command_for_pointer(phase) {
                    a.game.handle(command);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                let key = event.key();
                if key == "m" || key == "M" {
                    let on = a.settings.toggle_music();
                    log::info!("Music: {}", on);
                    let App { game, settings, .. } = &mut *a;
                    settings.save(game.storage_mut());
                    game.audio_mut().apply_settings(settings);
                    return;
                }
                if let Some(command) = command_for_key(&key, a.game.phase()) {
                    a.game.handle(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_mute(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            if !a.settings.mute_on_blur {
                return;
            }
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            a.game.audio_mut().set_muted(hidden);
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Headless demo: one autopilot run against in-memory storage
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use color_dash::audio::Silent;
    use color_dash::consts::SIM_DT;
    use color_dash::platform::Command;
    use color_dash::renderer::{EntityId, Scene, Sprite};
    use color_dash::sim::{RunPhase, TrackLayout};
    use color_dash::{Game, MemoryStore, Tuning};

    struct NoScene;

    impl Scene for NoScene {
        fn place(&mut self, _id: EntityId, _sprite: &Sprite) {}
        fn remove(&mut self, _id: EntityId) {}
    }

    env_logger::init();
    log::info!("Color Dash (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut game = Game::new(
        MemoryStore::new(),
        Silent,
        NoScene,
        tuning,
        TrackLayout::default(),
        seed,
    );

    game.handle(Command::ToggleAutopilot);
    game.start();
    // Two simulated minutes, then quit
    for _ in 0..120 * 120 {
        game.step(SIM_DT);
    }
    if game.phase() == RunPhase::Running {
        game.end_run();
        game.step(SIM_DT);
    }

    if let Some(summary) = game.summary() {
        println!(
            "Distance: {:.0}m  Coins: {}  Best: {:.0}m",
            summary.distance, summary.coins_collected, summary.best_distance
        );
    }

    // Spend the winnings on the first skin the balance covers
    let coins = game.progression().coins;
    if let Some(entry) = game
        .shop()
        .into_iter()
        .find(|e| !e.owned && e.skin.price <= coins)
    {
        game.handle(Command::ActivateSkin(entry.skin.id));
    }
    for entry in game.shop() {
        let mark = if entry.selected { "*" } else { " " };
        println!(
            "{} {:<8} {:>4} coins  owned: {}",
            mark, entry.skin.name, entry.skin.price, entry.owned
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
