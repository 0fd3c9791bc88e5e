//! Scripted pointer sessions
//!
//! A script is a JSON list of pointer steps replayed against a
//! [`DockingHost`], recording the outcome of each step and the events it
//! raised. Used to reproduce drag sequences outside an embedding host.
//!
//! ```json
//! { "steps": [
//!     { "down": { "x": 10, "y": 10 } },
//!     { "move": { "x": 10, "y": 200 } },
//!     { "up": { "x": 400, "y": 300 } },
//!     "capture_lost"
//! ] }
//! ```

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::drag::DragPhase;
use crate::error::{ConfigError, DockError};
use crate::geometry::Point;
use crate::host::{DockingHost, DragOutcome, PointerEvent};

/// One scripted pointer action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Primary button pressed.
    Down(Point),
    /// Pointer moved.
    Move(Point),
    /// Primary button released.
    Up(Point),
    /// The host lost pointer capture.
    CaptureLost,
    /// The host closed the floating surface.
    CloseFloating,
}

/// A sequence of pointer steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Steps in replay order.
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Parses a JSON script.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(format!("script: {e}")))
    }

    /// Reads and parses a JSON script file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// What one step did.
#[derive(Debug)]
pub struct StepRecord {
    /// The replayed step.
    pub step: ScriptStep,
    /// Drag phase after the step.
    pub phase: DragPhase,
    /// Outcome of release-type steps, or the error the step returned.
    pub result: Result<Option<DragOutcome>, DockError>,
    /// Names of the events raised during the step.
    pub events: Vec<&'static str>,
}

impl StepRecord {
    /// Returns true when the step failed because the tree no longer matched
    /// the drag's view of it.
    #[must_use]
    pub const fn is_consistency_failure(&self) -> bool {
        matches!(self.result, Err(DockError::Consistency(_)))
    }
}

/// Replays `script` against `host`, one record per step. A failing step is
/// recorded and the replay continues.
pub fn replay(host: &mut DockingHost, script: &Script) -> Vec<StepRecord> {
    let raised: Rc<RefCell<Vec<&'static str>>> = Rc::default();
    let sink = Rc::clone(&raised);
    let hook = host.subscribe(move |event| sink.borrow_mut().push(event.name()));

    let records = script
        .steps
        .iter()
        .map(|&step| {
            let result = match step {
                ScriptStep::Down(p) => host.on_pointer_down(PointerEvent::new(p.x, p.y)).map(|()| None),
                ScriptStep::Move(p) => host.on_pointer_move(PointerEvent::new(p.x, p.y)).map(|()| None),
                ScriptStep::Up(p) => host.on_pointer_up(PointerEvent::new(p.x, p.y)).map(Some),
                ScriptStep::CaptureLost => host.on_capture_lost().map(Some),
                ScriptStep::CloseFloating => host.close_floating().map(Some),
            };
            let events = std::mem::take(&mut *raised.borrow_mut());
            debug!(?step, phase = %host.phase(), events = events.len(), "script step replayed");
            StepRecord {
                step,
                phase: host.phase(),
                result,
                events,
            }
        })
        .collect();

    host.hooks_mut().unsubscribe(hook);
    records
}
