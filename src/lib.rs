//! Snake Rush - A browser snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic grid simulation (board, input queue, tick)
//! - `game`: Start/pause/resume/reset state machine around the simulation
//! - `scheduler`: Fixed-cadence tick scheduling from a monotonic clock
//! - `snapshot`: Immutable per-frame view for stateless renderers
//! - `audio`: Named sound cues and the mute/mobile policy
//! - `report`: Final-score hand-off to the persistence layer
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod platform;
pub mod report;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use config::{BoardSizePolicy, GameConfig};
pub use error::{ConfigError, ReportError};
pub use game::Game;
pub use settings::Settings;
pub use snapshot::Snapshot;

/// Game configuration constants
pub mod consts {
    /// Default time between simulation ticks (ms)
    pub const TICK_INTERVAL_MS: f64 = 100.0;

    /// Smallest playable board side length
    pub const MIN_BOARD_SIZE: usize = 5;
    /// Largest accepted board side length
    pub const MAX_BOARD_SIZE: usize = 128;
    /// Board side length on wide viewports
    pub const WIDE_BOARD_SIZE: usize = 20;
    /// Board side length on narrow (phone) viewports
    pub const NARROW_BOARD_SIZE: usize = 12;
    /// Viewports narrower than this use the narrow board
    pub const VIEWPORT_BREAKPOINT: f64 = 500.0;

    /// Minimum swipe travel along the dominant axis to count as a turn
    pub const SWIPE_THRESHOLD: f32 = 30.0;
    /// Pending turns kept ahead of the simulation
    pub const INPUT_QUEUE_CAP: usize = 2;

    /// Random food placement attempts before enumerating free cells
    pub const FOOD_RETRY_LIMIT: u32 = 100;
    /// Food cell used on a fresh board when it is free
    pub const DEFAULT_FOOD: (i32, i32) = (5, 5);

    /// Playback rate of the eat cue
    pub const EAT_PITCH: f32 = 1.7;
    /// Delay between the collision cue and the game over cue (ms)
    pub const GAME_OVER_CUE_DELAY_MS: f64 = 200.0;
}
