//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Monotonic time
//! - Device detection (mobile user agents, viewport width)
//! - Seeding

use std::cell::Cell;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock advanced by hand (headless runs and tests)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{PerformanceClock, is_mobile_device, viewport_width};

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{Clock, is_mobile_user_agent};

    /// `performance.now()`, the same timeline requestAnimationFrame stamps use
    pub struct PerformanceClock {
        performance: Option<web_sys::Performance>,
    }

    impl Default for PerformanceClock {
        fn default() -> Self {
            let performance = web_sys::window().and_then(|w| w.performance());
            if performance.is_none() {
                log::warn!("performance.now() unavailable, falling back to Date.now()");
            }
            Self { performance }
        }
    }

    impl Clock for PerformanceClock {
        fn now_ms(&self) -> f64 {
            match &self.performance {
                Some(performance) => performance.now(),
                None => js_sys::Date::now(),
            }
        }
    }

    pub fn is_mobile_device() -> bool {
        web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .is_some_and(|ua| is_mobile_user_agent(&ua))
    }

    pub fn viewport_width() -> f64 {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|w| w.as_f64())
            .unwrap_or(1024.0)
    }
}

/// User agents containing `Mobi` or `Android`, case-insensitive
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ua.contains("mobi") || ua.contains("android")
}

/// Fresh seed for a new game
pub fn random_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        rand::random()
    }
}
