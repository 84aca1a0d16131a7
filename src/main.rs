//! Snake Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, TouchEvent};

    use snake_rush::audio::WebAudio;
    use snake_rush::platform::{self, Clock, PerformanceClock};
    use snake_rush::report::JsReporter;
    use snake_rush::sim::{GamePhase, RawInput};
    use snake_rush::{Game, Settings, Snapshot};

    /// Page-provided score persistence hook, `window.snakeReportScore(score)`
    const REPORTER_HOOK: &str = "snakeReportScore";

    /// DOM cells of the current board, row-major
    struct BoardView {
        size: usize,
        cells: Vec<Element>,
    }

    impl BoardView {
        fn build(document: &Document, container: &Element, size: usize) -> Option<Self> {
            container.set_inner_html("");
            let _ = container.set_attribute(
                "style",
                &format!("display: grid; grid-template-columns: repeat({size}, 1fr)"),
            );

            let mut cells = Vec::with_capacity(size * size);
            for row in 0..size {
                for col in 0..size {
                    let cell = document.create_element("div").ok()?;
                    cell.set_class_name(checker_class(row, col));
                    container.append_child(&cell).ok()?;
                    cells.push(cell);
                }
            }
            log::info!("Board view built ({size}x{size})");
            Some(Self { size, cells })
        }

        fn paint(&self, snapshot: &Snapshot) {
            for (index, (element, view)) in self.cells.iter().zip(&snapshot.cells).enumerate() {
                let mut class = String::from(checker_class(index / self.size, index % self.size));
                if view.is_snake_body {
                    class.push_str(" snake");
                }
                if view.is_snake_head {
                    class.push_str(" snake-head");
                }
                if view.is_food {
                    class.push_str(" food");
                }
                if element.class_name() != class {
                    element.set_class_name(&class);
                }
            }
        }
    }

    fn checker_class(row: usize, col: usize) -> &'static str {
        if (row + col) % 2 == 0 {
            "cell light-cell"
        } else {
            "cell dark-cell"
        }
    }

    /// Browser shell holding the game and its DOM bindings
    struct App {
        game: Game,
        settings: Settings,
        audio: WebAudio,
        clock: PerformanceClock,
        document: Document,
        board: Option<BoardView>,
        touch_start: Option<Vec2>,
        dirty: bool,
    }

    impl App {
        fn now(&self) -> f64 {
            self.clock.now_ms()
        }

        fn rebuild_board(&mut self) {
            let Some(container) = self.document.get_element_by_id("board") else {
                log::warn!("No #board element");
                return;
            };
            self.board = BoardView::build(&self.document, &container, self.game.state().board.size());
            self.dirty = true;
        }

        fn render(&mut self) {
            if !self.dirty {
                return;
            }
            self.dirty = false;

            let snapshot = self.game.snapshot();
            if self.board.as_ref().is_none_or(|board| board.size != snapshot.size) {
                self.rebuild_board();
            }
            if let Some(board) = &self.board {
                board.paint(&snapshot);
            }
            self.update_hud(&snapshot);
        }

        fn update_hud(&self, snapshot: &Snapshot) {
            let document = &self.document;

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&format!("Score: {}", snapshot.score)));
            }
            if let Some(el) = document.get_element_by_id("play-pause-btn") {
                let label = match snapshot.phase {
                    GamePhase::Idle => "Play",
                    GamePhase::Running => "Pause",
                    GamePhase::Paused => "Resume",
                    GamePhase::GameOver => "Play Again",
                };
                el.set_text_content(Some(label));
            }
            if let Some(el) = document.get_element_by_id("restart-btn") {
                let class = if self.game.has_started() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("sound-toggle") {
                el.set_text_content(Some(if snapshot.sound_on { "Sound: On" } else { "Sound: Off" }));
            }
            if let Some(el) = document.get_element_by_id("game-over-message") {
                let class = if snapshot.phase == GamePhase::GameOver {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }
        }

        fn toggle(&mut self) {
            self.audio.resume();
            let now = self.now();
            let phase = self.game.toggle(now);
            log::debug!("Toggle -> {}", phase.as_str());
            self.dirty = true;
        }

        fn restart(&mut self) {
            self.game.reset();
            self.dirty = true;
        }

        fn toggle_sound(&mut self) {
            self.settings.sound_on = self.game.toggle_sound();
            self.settings.save();
            self.dirty = true;
        }

        fn fit_viewport(&mut self) {
            let size = self
                .settings
                .board_sizes
                .size_for_viewport(platform::viewport_width());
            match self.game.resize_board(size) {
                Ok(true) => self.dirty = true,
                Ok(false) => {}
                Err(err) => log::warn!("Keeping board size: {}", err),
            }
        }
    }

    /// Create `#id` under `<body>` when the page does not provide it
    fn ensure_element(document: &Document, id: &str, tag: &str) -> Option<Element> {
        if let Some(el) = document.get_element_by_id(id) {
            return Some(el);
        }
        let el = document.create_element(tag).ok()?;
        el.set_id(id);
        document.body()?.append_child(&el).ok()?;
        Some(el)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Snake Rush starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        for (id, tag) in [
            ("play-pause-btn", "button"),
            ("restart-btn", "button"),
            ("sound-toggle", "button"),
            ("score", "p"),
            ("board", "div"),
            ("game-over-message", "div"),
        ] {
            if ensure_element(&document, id, tag).is_none() {
                log::error!("Could not create #{id}");
                return;
            }
        }
        if let Some(el) = document.get_element_by_id("game-over-message") {
            el.set_text_content(Some("Game Over!"));
        }

        let settings = Settings::load();
        let is_mobile = platform::is_mobile_device();
        let config = settings.game_config(platform::viewport_width());

        let mut audio = WebAudio::new();
        audio.set_volume(settings.volume);

        let game = match Game::new(config) {
            Ok(game) => game,
            Err(err) => {
                log::error!("Invalid configuration: {}", err);
                return;
            }
        }
        .with_audio(audio.clone())
        .with_audio_policy(settings.audio_policy(is_mobile))
        .with_eat_pitch(settings.eat_pitch);

        let game = match JsReporter::from_window(REPORTER_HOOK) {
            Some(reporter) => game.with_reporter(reporter),
            None => {
                log::info!("No window.{REPORTER_HOOK}; scores are only logged");
                game
            }
        };

        log::info!(
            "Game initialized ({}x{}, mobile: {})",
            game.config().board_size,
            game.config().board_size,
            is_mobile
        );

        let app = Rc::new(RefCell::new(App {
            game,
            settings,
            audio,
            clock: PerformanceClock::default(),
            document: document.clone(),
            board: None,
            touch_start: None,
            dirty: true,
        }));

        setup_keyboard(app.clone());
        setup_touch(&document, app.clone());
        setup_buttons(&document, app.clone());
        setup_resize(app.clone());
        setup_auto_pause(&document, app.clone());

        request_animation_frame(app);

        log::info!("Snake Rush running!");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut app = app.borrow_mut();
            app.audio.resume();
            let key = event.key();
            match key.as_str() {
                " " => {
                    event.prevent_default();
                    app.toggle();
                }
                "m" | "M" => app.toggle_sound(),
                "r" | "R" => app.restart(),
                _ => {
                    if RawInput::Key(&key).direction().is_some() {
                        // Arrow keys would otherwise scroll the page
                        event.prevent_default();
                        app.game.submit(RawInput::Key(&key));
                    }
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch(document: &Document, app: Rc<RefCell<App>>) {
        let Some(board) = document.get_element_by_id("board") else {
            return;
        };

        // Swipe start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let mut app = app.borrow_mut();
                    app.audio.resume();
                    app.touch_start = Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = board.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Swipe end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut app = app.borrow_mut();
                let Some(start) = app.touch_start.take() else {
                    return;
                };
                if let Some(touch) = event.changed_touches().get(0) {
                    let end = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    app.game.submit(RawInput::Swipe(end - start));
                }
            });
            let _ = board.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        let actions: [(&str, fn(&mut App)); 3] = [
            ("play-pause-btn", App::toggle),
            ("restart-btn", App::restart),
            ("sound-toggle", App::toggle_sound),
        ];

        for (id, action) in actions {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                action(&mut app.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        app.borrow_mut().fit_viewport();

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().fit_viewport();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(document: &Document, app: Rc<RefCell<App>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut app = app.borrow_mut();
                if app.game.pause() {
                    app.dirty = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut app = app.borrow_mut();
            if app.game.frame(time) {
                app.dirty = true;
            }
            app.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use snake_rush::platform::{Clock, ManualClock, random_seed};
    use snake_rush::sim::GamePhase;
    use snake_rush::{Game, GameConfig};

    /// Headless runs stop here even if the autopilot never dies
    const MAX_TICKS: u64 = 5_000;

    env_logger::init();
    log::info!("Snake Rush (native) starting...");
    log::info!("Browser UI requires wasm32 - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(random_seed);
    let config = GameConfig {
        seed: Some(seed),
        ..GameConfig::desktop()
    };

    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let clock = ManualClock::new(0.0);
    game.start(clock.now_ms());

    while game.phase() == GamePhase::Running && game.state().time_ticks < MAX_TICKS {
        if let Some(direction) = autopilot::next_turn(game.state()) {
            game.turn(direction);
        }
        let wait = game
            .scheduler()
            .remaining_ms(clock.now_ms())
            .unwrap_or_else(|| game.scheduler().interval_ms());
        clock.advance(wait);
        game.frame(clock.now_ms());
    }

    println!("{}", game.snapshot().to_text());
    println!(
        "Seed {}: score {} after {} ticks ({})",
        seed,
        game.score(),
        game.state().time_ticks,
        game.phase().as_str()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Greedy food-seeking driver for headless runs
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use snake_rush::sim::{Cell, Direction, GameState, check_collision};

    /// Safe heading closest to the food, or `None` to keep going straight
    pub fn next_turn(state: &GameState) -> Option<Direction> {
        let head = state.snake.head();
        let target = state.food.unwrap_or_else(|| state.board.center());
        let distance = |cell: Cell| (cell.row - target.row).abs() + (cell.col - target.col).abs();

        Direction::ALL
            .into_iter()
            .filter(|&direction| !direction.is_opposite(state.direction))
            .map(|direction| (direction, head.step(direction)))
            .filter(|&(_, cell)| check_collision(&state.board, &state.snake, cell).is_none())
            .min_by_key(|&(_, cell)| distance(cell))
            .map(|(direction, _)| direction)
            .filter(|&direction| direction != state.direction)
    }

}
