//! Game state machine
//!
//! Owns the simulation, its scheduler and the outbound collaborators (audio,
//! score reporter), and exposes the start/pause/resume/reset contract the UI
//! shell drives.
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//!                 Running --collision--> GameOver --start--> Running
//! any --reset--> Idle
//! ```

use crate::audio::{AudioPolicy, AudioSink, CueQueue, NullAudio, SoundCue};
use crate::config::GameConfig;
use crate::consts::{EAT_PITCH, GAME_OVER_CUE_DELAY_MS};
use crate::error::Result;
use crate::platform::random_seed;
use crate::report::{LogReporter, ScoreReport, ScoreReporter, deliver};
use crate::scheduler::Scheduler;
use crate::sim::{self, Collision, Direction, GamePhase, GameState, RawInput, TickOutcome};
use crate::snapshot::Snapshot;

pub struct Game {
    config: GameConfig,
    state: GameState,
    scheduler: Scheduler,
    audio: Box<dyn AudioSink>,
    policy: AudioPolicy,
    eat_pitch: f32,
    cues: CueQueue,
    reporter: Box<dyn ScoreReporter>,
    /// Set once the current run's score has gone to the reporter
    reported: bool,
    /// A run has been started since the last reset
    has_started: bool,
}

impl Game {
    /// Idle game on a fresh board, with silent audio and a log-only reporter
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let state = GameState::new(&config, config.seed.unwrap_or_else(random_seed));
        Ok(Self {
            scheduler: Scheduler::new(config.tick_interval_ms),
            config,
            state,
            audio: Box::new(NullAudio),
            policy: AudioPolicy::default(),
            eat_pitch: EAT_PITCH,
            cues: CueQueue::default(),
            reporter: Box::new(LogReporter),
            reported: false,
            has_started: false,
        })
    }

    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(sink);
        self
    }

    pub fn with_audio_policy(mut self, policy: AudioPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_eat_pitch(mut self, pitch: f32) -> Self {
        self.eat_pitch = pitch;
        self
    }

    pub fn with_reporter(mut self, reporter: impl ScoreReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted setups (tests, demos)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.policy.sound_on)
    }

    // === Lifecycle ===

    /// Begin a new run from Idle or GameOver. No-op while Running or Paused.
    pub fn start(&mut self, now_ms: f64) -> bool {
        match self.state.phase {
            GamePhase::Running | GamePhase::Paused => false,
            GamePhase::Idle | GamePhase::GameOver => {
                self.reinitialize();
                self.state.phase = GamePhase::Running;
                self.has_started = true;
                self.scheduler.arm(now_ms);
                log::info!(
                    "Game started ({}x{}, seed {})",
                    self.config.board_size,
                    self.config.board_size,
                    self.state.seed
                );
                true
            }
        }
    }

    /// Replace the configuration, then start
    pub fn start_with(&mut self, config: GameConfig, now_ms: f64) -> Result<bool> {
        self.reconfigure(config)?;
        Ok(self.start(now_ms))
    }

    /// Freeze a running game. No-op otherwise.
    pub fn pause(&mut self) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.scheduler.cancel();
        self.state.phase = GamePhase::Paused;
        log::info!("Paused at score {}", self.state.score);
        true
    }

    /// Continue a paused game without touching its state. No-op otherwise.
    pub fn resume(&mut self, now_ms: f64) -> bool {
        if self.state.phase != GamePhase::Paused {
            return false;
        }
        self.state.phase = GamePhase::Running;
        self.scheduler.arm(now_ms);
        log::info!("Resumed");
        true
    }

    /// Back to a fresh Idle board from any phase
    pub fn reset(&mut self) {
        self.reinitialize();
        self.has_started = false;
        log::info!("Game reset");
    }

    /// Replace the configuration and reset
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Change the board size; a different size resets the game
    pub fn resize_board(&mut self, board_size: usize) -> Result<bool> {
        if board_size == self.config.board_size {
            return Ok(false);
        }
        log::info!(
            "Board size {} -> {}",
            self.config.board_size,
            board_size
        );
        self.reconfigure(GameConfig {
            board_size,
            ..self.config.clone()
        })?;
        Ok(true)
    }

    /// Play/pause button: start, pause, resume, or restart after game over
    pub fn toggle(&mut self, now_ms: f64) -> GamePhase {
        match self.state.phase {
            GamePhase::Idle | GamePhase::GameOver => {
                self.start(now_ms);
            }
            GamePhase::Running => {
                self.pause();
            }
            GamePhase::Paused => {
                self.resume(now_ms);
            }
        }
        self.state.phase
    }

    fn reinitialize(&mut self) {
        self.scheduler.cancel();
        self.scheduler.set_interval_ms(self.config.tick_interval_ms);
        let seed = self.config.seed.unwrap_or_else(random_seed);
        self.state = GameState::new(&self.config, seed);
        self.cues.clear();
        self.reported = false;
    }

    // === Input ===

    /// Queue a raw key or swipe. Ignored unless a run is in progress.
    pub fn submit(&mut self, raw: RawInput<'_>) -> bool {
        match self.state.phase {
            GamePhase::Running | GamePhase::Paused => {
                self.state.input.submit(raw, self.state.direction)
            }
            _ => false,
        }
    }

    /// Queue an already-mapped turn
    pub fn turn(&mut self, direction: Direction) -> bool {
        match self.state.phase {
            GamePhase::Running | GamePhase::Paused => self.state.queue_turn(direction),
            _ => false,
        }
    }

    // === Sound ===

    pub fn sound_on(&self) -> bool {
        self.policy.sound_on
    }

    pub fn set_sound_on(&mut self, on: bool) {
        self.policy.sound_on = on;
        if !on {
            self.cues.clear();
        }
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.set_sound_on(!self.policy.sound_on);
        self.policy.sound_on
    }

    pub fn set_audio_policy(&mut self, policy: AudioPolicy) {
        self.policy = policy;
        if !policy.allows(SoundCue::GameOver) {
            self.cues.clear();
        }
    }

    fn emit(&mut self, cue: SoundCue, pitch: f32, due_ms: f64) {
        if self.policy.allows(cue) {
            self.cues.schedule(cue, pitch, due_ms);
        }
    }

    // === Stepping ===

    /// Per-frame entry point: runs a tick when one is due and plays due cues.
    ///
    /// Returns whether the board changed.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        if self.state.phase == GamePhase::Running && self.scheduler.poll(now_ms) {
            changed = self.tick(now_ms) != TickOutcome::Skipped;
        }
        self.cues.flush(now_ms, self.audio.as_mut());
        changed
    }

    /// Apply one tick immediately
    ///
    /// The step counts as the scheduler's last tick, so the next `frame` waits
    /// a full interval from `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        let outcome = sim::tick(&mut self.state);
        match outcome {
            TickOutcome::Grew { .. } => {
                self.scheduler.restart(now_ms);
                self.emit(SoundCue::Eat, self.eat_pitch, now_ms);
            }
            TickOutcome::Moved => self.scheduler.restart(now_ms),
            TickOutcome::Collided(collision) => self.finish(collision, now_ms),
            TickOutcome::Skipped => {}
        }
        self.cues.flush(now_ms, self.audio.as_mut());
        outcome
    }

    fn finish(&mut self, collision: Collision, now_ms: f64) {
        self.scheduler.cancel();
        log::info!(
            "Game over ({:?}) after {} ticks, score {}",
            collision,
            self.state.time_ticks,
            self.state.score
        );

        if !self.reported {
            self.reported = true;
            let report = ScoreReport {
                final_score: self.state.score,
            };
            deliver(self.reporter.as_mut(), report);
        }

        self.emit(SoundCue::Collision, 1.0, now_ms);
        self.emit(SoundCue::GameOver, 1.0, now_ms + GAME_OVER_CUE_DELAY_MS);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::{ConfigError, ReportError};
    use crate::sim::{Cell, Snake};

    #[derive(Clone, Default)]
    struct Scores(Rc<RefCell<Vec<u32>>>);

    impl ScoreReporter for Scores {
        fn report(&mut self, report: ScoreReport) -> std::result::Result<(), ReportError> {
            self.0.borrow_mut().push(report.final_score);
            Ok(())
        }
    }

    struct Offline(Rc<RefCell<u32>>);

    impl ScoreReporter for Offline {
        fn report(&mut self, _report: ScoreReport) -> std::result::Result<(), ReportError> {
            *self.0.borrow_mut() += 1;
            Err(ReportError::Rejected("network down".into()))
        }
    }

    #[derive(Clone, Default)]
    struct Sounds(Rc<RefCell<Vec<(SoundCue, f32)>>>);

    impl AudioSink for Sounds {
        fn play(&mut self, cue: SoundCue, pitch: f32) {
            self.0.borrow_mut().push((cue, pitch));
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(12345),
            ..GameConfig::with_board_size(20)
        }
    }

    fn place(game: &mut Game, cells: &[(i32, i32)], direction: Direction, food: (i32, i32)) {
        let state = game.state_mut();
        state.snake = Snake::from_cells(cells.iter().copied().map(Cell::from)).unwrap();
        state.direction = direction;
        state.food = Some(Cell::from(food));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Game::new(GameConfig::with_board_size(3));
        assert_eq!(result.err(), Some(ConfigError::BoardTooSmall(3)));
    }

    #[test]
    fn test_start_from_idle() {
        let mut game = Game::new(config()).unwrap();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!game.scheduler().is_armed());

        assert!(game.start(0.0));
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.state().snake.len(), 1);
        assert_eq!(game.state().snake.head(), Cell::new(10, 10));
        assert_eq!(game.state().direction, Direction::Right);
        assert!(game.scheduler().is_armed());
        assert!(game.has_started());
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut game = Game::new(config()).unwrap();
        game.start(0.0);
        game.tick(100.0);
        let snake = game.state().snake.clone();

        assert!(!game.start(150.0));
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.state().snake, snake);
        assert_eq!(game.state().time_ticks, 1);
    }

    #[test]
    fn test_pause_twice_is_noop() {
        let mut game = Game::new(config()).unwrap();
        game.start(0.0);
        game.tick(100.0);

        assert!(game.pause());
        let snake = game.state().snake.clone();

        assert!(!game.pause());
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.state().snake, snake);
        assert!(!game.scheduler().is_armed());
    }

    #[test]
    fn test_pause_when_not_running_is_noop() {
        let mut game = Game::new(config()).unwrap();
        assert!(!game.pause());
        assert_eq!(game.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_paused_game_does_not_tick() {
        let mut game = Game::new(config()).unwrap();
        game.start(0.0);
        game.pause();
        let head = game.state().snake.head();

        assert!(!game.frame(1_000.0));
        assert_eq!(game.tick(1_000.0), TickOutcome::Skipped);
        assert_eq!(game.state().snake.head(), head);
    }

    #[test]
    fn test_resume_keeps_state() {
        let mut game = Game::new(config()).unwrap();
        game.start(0.0);
        game.turn(Direction::Up);
        game.tick(100.0);
        game.pause();
        let snake = game.state().snake.clone();

        assert!(game.resume(5_000.0));
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.state().snake, snake);
        assert_eq!(game.state().direction, Direction::Up);
        assert!(!game.resume(5_000.0));

        // Interval is measured from the resume, not from before the pause
        assert!(!game.frame(5_050.0));
        assert!(game.frame(5_100.0));
    }

    #[test]
    fn test_frame_follows_scheduler() {
        let mut game = Game::new(config()).unwrap();
        game.start(0.0);
        assert!(!game.frame(16.0));
        assert!(!game.frame(50.0));
        assert!(game.frame(100.0));
        assert_eq!(game.state().time_ticks, 1);
        // A long stall still yields one step
        assert!(game.frame(2_000.0));
        assert_eq!(game.state().time_ticks, 2);
    }

    #[test]
    fn test_wall_collision_reports_once() {
        let scores = Scores::default();
        let mut game = Game::new(config()).unwrap().with_reporter(scores.clone());
        game.start(0.0);
        place(&mut game, &[(0, 5)], Direction::Up, (10, 10));
        game.state_mut().score = 7;

        assert_eq!(game.tick(100.0), TickOutcome::Collided(Collision::Wall));
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.score(), 7);
        assert!(!game.scheduler().is_armed());

        // Further frames neither tick nor re-report
        assert!(!game.frame(200.0));
        assert_eq!(game.tick(300.0), TickOutcome::Skipped);
        assert_eq!(*scores.0.borrow(), vec![7]);
    }

    #[test]
    fn test_reporter_failure_keeps_game_over() {
        let calls = Rc::new(RefCell::new(0));
        let mut game = Game::new(config())
            .unwrap()
            .with_reporter(Offline(calls.clone()));
        game.start(0.0);
        place(&mut game, &[(0, 5)], Direction::Up, (10, 10));

        game.tick(100.0);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(*calls.borrow(), 1);
        assert!(!game.frame(500.0));
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_growth_plays_pitched_eat_cue() {
        let sounds = Sounds::default();
        let mut game = Game::new(config()).unwrap().with_audio(sounds.clone());
        game.start(0.0);
        place(&mut game, &[(10, 10)], Direction::Right, (10, 11));

        assert!(matches!(game.tick(100.0), TickOutcome::Grew { .. }));
        assert_eq!(game.score(), 1);
        assert_eq!(*sounds.0.borrow(), vec![(SoundCue::Eat, EAT_PITCH)]);
    }

    #[test]
    fn test_game_over_cue_is_delayed() {
        let sounds = Sounds::default();
        let mut game = Game::new(config()).unwrap().with_audio(sounds.clone());
        game.start(0.0);
        place(&mut game, &[(0, 5)], Direction::Up, (10, 10));

        game.tick(100.0);
        assert_eq!(*sounds.0.borrow(), vec![(SoundCue::Collision, 1.0)]);

        game.frame(250.0);
        assert_eq!(sounds.0.borrow().len(), 1);
        game.frame(300.0);
        assert_eq!(
            *sounds.0.borrow(),
            vec![(SoundCue::Collision, 1.0), (SoundCue::GameOver, 1.0)]
        );
    }

    #[test]
    fn test_muted_game_emits_nothing() {
        let sounds = Sounds::default();
        let mut game = Game::new(config()).unwrap().with_audio(sounds.clone());
        game.set_sound_on(false);
        game.start(0.0);
        place(&mut game, &[(10, 10)], Direction::Right, (10, 11));

        game.tick(100.0);
        assert_eq!(game.score(), 1);
        assert!(sounds.0.borrow().is_empty());
    }

    #[test]
    fn test_policy_mute_drops_pending_game_over_cue() {
        let sounds = Sounds::default();
        let mut game = Game::new(config()).unwrap().with_audio(sounds.clone());
        game.start(0.0);
        place(&mut game, &[(0, 5)], Direction::Up, (10, 10));
        game.tick(100.0);
        assert_eq!(*sounds.0.borrow(), vec![(SoundCue::Collision, 1.0)]);

        game.set_audio_policy(AudioPolicy {
            sound_on: false,
            ..Default::default()
        });
        game.frame(500.0);
        assert_eq!(*sounds.0.borrow(), vec![(SoundCue::Collision, 1.0)]);
    }

    #[test]
    fn test_direct_tick_resets_frame_interval() {
        let mut game = Game::new(config()).unwrap();
        game.start(0.0);
        assert_eq!(game.tick(90.0), TickOutcome::Moved);

        // Frame would have been due at 100 without the direct step
        assert!(!game.frame(100.0));
        assert_eq!(game.state().time_ticks, 1);
        assert!(game.frame(190.0));
        assert_eq!(game.state().time_ticks, 2);
    }

    #[test]
    fn test_mobile_policy_suppresses_cues() {
        let sounds = Sounds::default();
        let mut game = Game::new(config())
            .unwrap()
            .with_audio(sounds.clone())
            .with_audio_policy(AudioPolicy {
                is_mobile: true,
                ..Default::default()
            });
        game.start(0.0);
        place(&mut game, &[(0, 5)], Direction::Up, (10, 10));

        game.tick(100.0);
        game.frame(1_000.0);
        assert!(sounds.0.borrow().is_empty());
        assert!(game.sound_on());
    }

    #[test]
    fn test_reset_then_start_after_game_over() {
        let mut game = Game::new(config()).unwrap();
        game.start(0.0);
        place(&mut game, &[(3, 3), (3, 2)], Direction::Right, (10, 10));
        game.state_mut().score = 5;
        game.turn(Direction::Up);
        for i in 1..=4 {
            game.tick(i as f64 * 100.0);
        }
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.reset();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!game.has_started());

        assert!(game.start(1_000.0));
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.state().snake.len(), 1);
        assert_eq!(game.state().snake.head(), Cell::new(10, 10));
    }

    #[test]
    fn test_start_directly_after_game_over() {
        let scores = Scores::default();
        let mut game = Game::new(config()).unwrap().with_reporter(scores.clone());
        game.start(0.0);
        place(&mut game, &[(0, 5)], Direction::Up, (10, 10));
        game.tick(100.0);

        assert!(game.start(200.0));
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 0);

        place(&mut game, &[(0, 5)], Direction::Up, (10, 10));
        game.tick(300.0);
        assert_eq!(*scores.0.borrow(), vec![0, 0]);
    }

    #[test]
    fn test_reset_from_running_and_paused() {
        let mut game = Game::new(config()).unwrap();
        game.start(0.0);
        game.reset();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!game.scheduler().is_armed());

        game.start(0.0);
        game.pause();
        game.reset();
        assert_eq!(game.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_toggle_cycle() {
        let mut game = Game::new(config()).unwrap();
        assert_eq!(game.toggle(0.0), GamePhase::Running);
        assert_eq!(game.toggle(10.0), GamePhase::Paused);
        assert_eq!(game.toggle(20.0), GamePhase::Running);

        place(&mut game, &[(0, 5)], Direction::Up, (10, 10));
        game.tick(200.0);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.toggle(300.0), GamePhase::Running);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_input_ignored_when_idle() {
        let mut game = Game::new(config()).unwrap();
        assert!(!game.submit(RawInput::Key("ArrowUp")));
        game.start(0.0);
        assert!(game.submit(RawInput::Key("ArrowUp")));
        assert!(!game.submit(RawInput::Key("ArrowDown")));
        assert!(!game.submit(RawInput::Key("Escape")));
    }

    #[test]
    fn test_resize_board_resets() {
        let mut game = Game::new(config()).unwrap();
        game.start(0.0);
        assert_eq!(game.resize_board(20), Ok(false));
        assert_eq!(game.phase(), GamePhase::Running);

        assert_eq!(game.resize_board(12), Ok(true));
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.state().board.size(), 12);
        assert_eq!(game.state().snake.head(), Cell::new(6, 6));

        assert!(game.resize_board(2).is_err());
        assert_eq!(game.state().board.size(), 12);
    }

    #[test]
    fn test_start_with_overrides_config() {
        let mut game = Game::new(config()).unwrap();
        let custom = GameConfig {
            initial_length: 3,
            initial_head: Some(Cell::new(2, 4)),
            tick_interval_ms: 90.0,
            ..config()
        };
        assert_eq!(game.start_with(custom, 0.0), Ok(true));
        assert_eq!(game.state().snake.len(), 3);
        assert_eq!(game.state().snake.head(), Cell::new(2, 4));
        assert_eq!(game.scheduler().interval_ms(), 90.0);
        assert!(game.frame(90.0));
    }
}
