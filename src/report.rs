//! Final-score hand-off to the persistence layer
//!
//! Reporting is fire-and-forget: a failed report is logged and dropped; it
//! never changes the game phase.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Payload sent once per completed game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub final_score: u32,
}

/// Receives the final score of every completed game
pub trait ScoreReporter {
    fn report(&mut self, report: ScoreReport) -> Result<(), ReportError>;
}

/// Writes scores to the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ScoreReporter for LogReporter {
    fn report(&mut self, report: ScoreReport) -> Result<(), ReportError> {
        log::info!("Final score: {}", report.final_score);
        Ok(())
    }
}

/// Send `report` through `reporter`, absorbing any failure
///
/// Returns whether the reporter accepted the score.
pub fn deliver(reporter: &mut dyn ScoreReporter, report: ScoreReport) -> bool {
    match reporter.report(report) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("Score {} not saved: {}", report.final_score, err);
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::JsReporter;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};

    use super::{ScoreReport, ScoreReporter};
    use crate::error::ReportError;

    /// Calls a page-provided JS function with the final score
    ///
    /// The function may return a Promise; its rejection is logged once it settles.
    pub struct JsReporter {
        callback: js_sys::Function,
    }

    impl JsReporter {
        pub fn new(callback: js_sys::Function) -> Self {
            Self { callback }
        }

        /// Look up `window[name]`, if it is a function
        pub fn from_window(name: &str) -> Option<Self> {
            let window = web_sys::window()?;
            let value = js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok()?;
            value.dyn_into::<js_sys::Function>().ok().map(Self::new)
        }
    }

    impl ScoreReporter for JsReporter {
        fn report(&mut self, report: ScoreReport) -> Result<(), ReportError> {
            let score = JsValue::from_f64(f64::from(report.final_score));
            let returned = self
                .callback
                .call1(&JsValue::NULL, &score)
                .map_err(|err| ReportError::Rejected(format!("{err:?}")))?;

            if let Ok(promise) = returned.dyn_into::<js_sys::Promise>() {
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                        log::warn!("Score {} not saved: {:?}", report.final_score, err);
                    }
                });
            }
            Ok(())
        }
    }
}
