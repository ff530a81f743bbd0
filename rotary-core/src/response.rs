use serde::{Deserialize, Serialize};

/// Response categories that produce a logged event. Misses and correct
/// rejections are tallied in `Counters` but never logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseKind {
    Hit,
    FalseAlarm,
}

/// One scored response, appended to the session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEvent {
    pub kind: ResponseKind,
    /// For hits: press time minus pointer entry. For false alarms: press
    /// time minus trial activation.
    pub reaction_time_ms: f64,
    pub trial_id: usize,
}

/// Live outcome tallies, readable after every state change
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub hits: u32,
    pub misses: u32,
    pub false_alarms: u32,
    pub correct_rejections: u32,
}

impl Counters {
    /// Go trials resolved so far.
    pub fn resolved_go(&self) -> u32 {
        self.hits + self.misses
    }

    /// No-go trials resolved so far.
    pub fn resolved_no_go(&self) -> u32 {
        self.false_alarms + self.correct_rejections
    }
}
