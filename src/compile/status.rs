use std::time::{Duration, Instant};

use crate::compile::driver::RunStats;

#[derive(Clone, Debug, PartialEq)]
/// Outcome of the last generation run, as shown to the user.
pub enum RunStatus {
    Succeeded(RunStats),
    Failed(String),
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded(s) => write!(
                f,
                "generated: {} blend motions, {} parameters, {} layers",
                s.blend_motions, s.parameters_used, s.layers
            ),
            Self::Failed(msg) => write!(f, "generation failed: {msg}"),
        }
    }
}

#[derive(Clone, Debug)]
/// Keeps the last run status visible for a fixed window.
pub struct StatusBoard {
    window: Duration,
    last: Option<(Instant, RunStatus)>,
}

impl StatusBoard {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Replace the status; the window restarts at `now`.
    pub fn record(&mut self, status: RunStatus, now: Instant) {
        self.last = Some((now, status));
    }

    /// Status recorded less than one window before `now`.
    pub fn current(&self, now: Instant) -> Option<&RunStatus> {
        let (at, status) = self.last.as_ref()?;
        (now.saturating_duration_since(*at) < self.window).then_some(status)
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/status.rs"]
mod tests;
