use serde::{Deserialize, Serialize};

use crate::angle;

/// Trial state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialState {
    Scheduled,
    Active,
    Resolved,
}

/// How a resolved trial was scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialOutcome {
    Hit,
    /// Go-trial press while the pointer was outside the window. Scores as a
    /// hit but carries no reaction time.
    AnticipatoryHit,
    Miss,
    FalseAlarm,
    CorrectRejection,
}

/// One scheduled stimulus window. The schedule fields are fixed at
/// generation time; `responded`, `response_time_ms`, `pointer_entry_ns`,
/// `state` and `outcome` are each written at most once over the lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    pub id: usize,
    /// Offset from session start, excluding paused time.
    pub start_ms: f64,
    pub duration_ms: f64,
    pub is_go: bool,
    /// Window center, in [0, 2π).
    pub window_angle: f64,
    /// Window arc width in radians.
    pub window_size: f64,
    pub responded: bool,
    pub response_time_ms: Option<f64>,
    /// Absolute timer timestamp of the pointer first entering the window.
    pub pointer_entry_ns: Option<u64>,
    pub state: TrialState,
    pub outcome: Option<TrialOutcome>,
}

impl Trial {
    pub fn new(
        id: usize,
        start_ms: f64,
        duration_ms: f64,
        is_go: bool,
        window_angle: f64,
        window_size: f64,
    ) -> Self {
        Self {
            id,
            start_ms,
            duration_ms,
            is_go,
            window_angle,
            window_size,
            responded: false,
            response_time_ms: None,
            pointer_entry_ns: None,
            state: TrialState::Scheduled,
            outcome: None,
        }
    }

    /// Arc edge where the window begins, for renderers.
    pub fn window_start_angle(&self) -> f64 {
        self.window_angle - self.window_size / 2.0
    }

    /// Arc edge where the window ends, for renderers.
    pub fn window_end_angle(&self) -> f64 {
        self.window_angle + self.window_size / 2.0
    }

    pub fn contains(&self, pointer_angle: f64) -> bool {
        angle::within_arc(pointer_angle, self.window_angle, self.window_size)
    }

    pub fn is_resolved(&self) -> bool {
        self.state == TrialState::Resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn new_trial_starts_scheduled_and_unresponded() {
        let trial = Trial::new(3, 2500.0, 4100.0, true, 1.0, FRAC_PI_4);
        assert_eq!(trial.state, TrialState::Scheduled);
        assert!(!trial.responded);
        assert!(trial.response_time_ms.is_none());
        assert!(trial.pointer_entry_ns.is_none());
        assert!(trial.outcome.is_none());
    }

    #[test]
    fn window_edges_straddle_the_center() {
        let trial = Trial::new(0, 0.0, 2000.0, false, 1.0, FRAC_PI_4);
        assert!((trial.window_start_angle() - (1.0 - FRAC_PI_4 / 2.0)).abs() < 1e-12);
        assert!((trial.window_end_angle() - (1.0 + FRAC_PI_4 / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn contains_respects_wraparound() {
        let trial = Trial::new(0, 0.0, 2000.0, true, 0.05, FRAC_PI_4);
        assert!(trial.contains(std::f64::consts::TAU - 0.05));
        assert!(!trial.contains(std::f64::consts::PI));
    }
}
