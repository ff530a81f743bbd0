use std::time::Duration;

use rand::Rng;
use rotary_core::{Counters, ResponseEvent, ResponseKind, Trial, TrialOutcome, TrialState};
use rotary_timing::{CalibrationStats, Timer};

use crate::clock::RotationClock;
use crate::config::SessionConfig;
use crate::results::{compute_results, SessionResults};
use crate::scheduler::generate_trials;

/// Where the session is in its run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Lifecycle notifications produced by `update`, for display binding
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    TrialActivated { trial_id: usize, is_go: bool },
    PointerEntered { trial_id: usize },
    TrialResolved { trial_id: usize, outcome: TrialOutcome },
    Finished,
}

/// Classification of a single respond signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseOutcome {
    /// In-window go press. The reaction time is absent when the pointer
    /// entry was never stamped (exact-frame race); the hit still counts.
    Hit { reaction_time_ms: Option<f64> },
    /// Out-of-window go press. Counts as a hit, logs nothing.
    AnticipatoryHit,
    FalseAlarm { response_time_ms: f64 },
    Ignored,
}

/// The vigilance session: pointer motion, trial lifecycle, response
/// classification and pause accounting, driven by one `update` per display
/// frame. The wall clock and entropy source are injected so the whole
/// session can run headless and deterministic.
pub struct Session<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub config: SessionConfig,
    pub timer: T,
    rng: R,
    status: SessionStatus,
    duration_ms: f64,
    start_ns: u64,
    total_paused_ns: u64,
    pause_start_ns: Option<u64>,
    last_tick_ns: Option<u64>,
    clock: RotationClock,
    trials: Vec<Trial>,
    current: Option<usize>,
    /// Elapsed time at which the current trial activated.
    active_since_ms: f64,
    /// Explicit scheduled-event slot for the next activation search, in
    /// elapsed-time coordinates. `None` means search on every tick.
    next_search_at_ms: Option<f64>,
    responses: Vec<ResponseEvent>,
    counters: Counters,
    final_results: Option<SessionResults>,
}

impl<T, R> Session<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub fn new(config: SessionConfig, timer: T, rng: R) -> Self {
        let clock = RotationClock::new(&config);
        Self {
            config,
            timer,
            rng,
            status: SessionStatus::Idle,
            duration_ms: 0.0,
            start_ns: 0,
            total_paused_ns: 0,
            pause_start_ns: None,
            last_tick_ns: None,
            clock,
            trials: Vec::new(),
            current: None,
            active_since_ms: 0.0,
            next_search_at_ms: None,
            responses: Vec::new(),
            counters: Counters::default(),
            final_results: None,
        }
    }

    /// Begin a session of `duration_ms`, generating a fresh trial schedule.
    pub fn start(&mut self, duration_ms: f64) {
        let trials = generate_trials(&self.config, duration_ms, &mut self.rng);
        self.start_with_trials(duration_ms, trials);
    }

    /// Begin a session over a pre-built schedule (ordered by start time).
    /// This is the replay/deterministic-testing entry point.
    pub fn start_with_trials(&mut self, duration_ms: f64, trials: Vec<Trial>) {
        self.reset();
        self.trials = trials;
        self.duration_ms = duration_ms;
        self.status = SessionStatus::Running;
        self.start_ns = self.timer.now();
        self.last_tick_ns = Some(self.start_ns);
        self.next_search_at_ms = Some(self.config.next_trial_delay_ms);
    }

    /// Drop all session state back to idle.
    pub fn reset(&mut self) {
        self.status = SessionStatus::Idle;
        self.duration_ms = 0.0;
        self.start_ns = 0;
        self.total_paused_ns = 0;
        self.pause_start_ns = None;
        self.last_tick_ns = None;
        self.clock = RotationClock::new(&self.config);
        self.trials.clear();
        self.current = None;
        self.active_since_ms = 0.0;
        self.next_search_at_ms = None;
        self.responses.clear();
        self.counters = Counters::default();
        self.final_results = None;
    }

    pub fn pause(&mut self) {
        if self.status != SessionStatus::Running {
            return;
        }
        self.status = SessionStatus::Paused;
        self.pause_start_ns = Some(self.timer.now());
        self.last_tick_ns = None;
    }

    pub fn resume(&mut self) {
        if self.status != SessionStatus::Paused {
            return;
        }
        let now = self.timer.now();
        if let Some(pause_start) = self.pause_start_ns.take() {
            self.total_paused_ns += now.saturating_sub(pause_start);
        }
        self.status = SessionStatus::Running;
        self.last_tick_ns = Some(now);
    }

    /// End the session early. Returns the finalized results, or `None` if
    /// no session was in progress.
    pub fn stop(&mut self) -> Option<SessionResults> {
        match self.status {
            SessionStatus::Running | SessionStatus::Paused => {
                let now = self.timer.now();
                if let Some(pause_start) = self.pause_start_ns.take() {
                    self.total_paused_ns += now.saturating_sub(pause_start);
                }
                self.finalize();
                self.final_results.clone()
            }
            SessionStatus::Idle | SessionStatus::Finished => None,
        }
    }

    /// Advance the session by one render tick. No-op unless running.
    pub fn update(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.status != SessionStatus::Running {
            return events;
        }

        let now = self.timer.now();
        let delta = match self.last_tick_ns {
            Some(prev) => Duration::from_nanos(now.saturating_sub(prev)),
            None => Duration::ZERO,
        };
        self.last_tick_ns = Some(now);
        self.timer.record_frame(delta);

        self.clock.advance(delta.as_secs_f64(), &mut self.rng);
        let elapsed = self.elapsed_at(now);

        if self.current.is_none() && self.next_search_at_ms.map_or(true, |at| elapsed >= at) {
            self.next_search_at_ms = None;
            self.try_activate(elapsed, &mut events);
        }

        if let Some(index) = self.current {
            if elapsed - self.active_since_ms < self.trials[index].duration_ms {
                let pointer = self.clock.pointer_angle();
                let trial = &mut self.trials[index];
                if trial.pointer_entry_ns.is_none() && trial.contains(pointer) {
                    trial.pointer_entry_ns = Some(now);
                    events.push(SessionEvent::PointerEntered { trial_id: trial.id });
                }
            } else {
                self.resolve_expired(index, elapsed, &mut events);
            }
        }

        if elapsed >= self.duration_ms {
            self.finalize();
            events.push(SessionEvent::Finished);
        }

        events
    }

    /// Classify a discrete respond signal against the active trial.
    /// Defensive conditions are silent no-ops.
    pub fn respond(&mut self) -> ResponseOutcome {
        if self.status != SessionStatus::Running {
            return ResponseOutcome::Ignored;
        }
        let Some(index) = self.current else {
            return ResponseOutcome::Ignored;
        };
        if self.trials[index].responded {
            return ResponseOutcome::Ignored;
        }

        let now = self.timer.now();
        let elapsed = self.elapsed_at(now);
        let pointer = self.clock.pointer_angle();
        let active_since = self.active_since_ms;

        let trial = &mut self.trials[index];
        let in_window = trial.contains(pointer);

        let outcome = if trial.is_go {
            trial.responded = true;
            if in_window {
                trial.response_time_ms = Some(elapsed - active_since);
                let reaction_time_ms = trial
                    .pointer_entry_ns
                    .map(|entry| (now.saturating_sub(entry)) as f64 / 1e6);
                if let Some(rt) = reaction_time_ms {
                    self.responses.push(ResponseEvent {
                        kind: ResponseKind::Hit,
                        reaction_time_ms: rt,
                        trial_id: trial.id,
                    });
                }
                self.counters.hits += 1;
                trial.outcome = Some(TrialOutcome::Hit);
                ResponseOutcome::Hit { reaction_time_ms }
            } else {
                // Early and late go presses score as hits, unpenalized.
                self.counters.hits += 1;
                trial.outcome = Some(TrialOutcome::AnticipatoryHit);
                ResponseOutcome::AnticipatoryHit
            }
        } else {
            trial.responded = true;
            let response_time_ms = elapsed - active_since;
            trial.response_time_ms = Some(response_time_ms);
            self.responses.push(ResponseEvent {
                kind: ResponseKind::FalseAlarm,
                reaction_time_ms: response_time_ms,
                trial_id: trial.id,
            });
            self.counters.false_alarms += 1;
            trial.outcome = Some(TrialOutcome::FalseAlarm);
            ResponseOutcome::FalseAlarm { response_time_ms }
        };

        trial.state = TrialState::Resolved;
        self.current = None;
        self.next_search_at_ms = Some(elapsed + self.config.next_trial_delay_ms);
        outcome
    }

    /// Session time in milliseconds, excluding paused intervals.
    pub fn elapsed_ms(&self) -> f64 {
        if self.status == SessionStatus::Idle {
            return 0.0;
        }
        self.elapsed_at(self.timer.now())
    }

    pub fn remaining_ms(&self) -> f64 {
        (self.duration_ms - self.elapsed_ms()).max(0.0)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn responses(&self) -> &[ResponseEvent] {
        &self.responses
    }

    pub fn active_trial(&self) -> Option<&Trial> {
        self.current.map(|index| &self.trials[index])
    }

    pub fn pointer_angle(&self) -> f64 {
        self.clock.pointer_angle()
    }

    pub fn pointer_speed(&self) -> f64 {
        self.clock.pointer_speed()
    }

    pub fn distractor_angle(&self) -> f64 {
        self.clock.distractor_angle()
    }

    /// Frame cadence diagnostics accumulated by `update`.
    pub fn frame_stats(&self) -> CalibrationStats {
        self.timer.calibration_stats()
    }

    /// Point-in-time results over the data so far; usable while paused.
    pub fn snapshot_results(&self) -> SessionResults {
        compute_results(&self.trials, &self.responses, &self.counters)
    }

    /// The finalized record, once the session has ended.
    pub fn final_results(&self) -> Option<&SessionResults> {
        self.final_results.as_ref()
    }

    fn elapsed_at(&self, now_ns: u64) -> f64 {
        let mut paused = self.total_paused_ns;
        if let Some(pause_start) = self.pause_start_ns {
            paused += now_ns.saturating_sub(pause_start);
        }
        (now_ns.saturating_sub(self.start_ns).saturating_sub(paused)) as f64 / 1e6
    }

    fn try_activate(&mut self, elapsed: f64, events: &mut Vec<SessionEvent>) {
        let eligible = self.trials.iter().position(|t| {
            t.state == TrialState::Scheduled
                && !t.responded
                && t.start_ms <= elapsed
                && elapsed < t.start_ms + t.duration_ms
        });

        if let Some(index) = eligible {
            let trial = &mut self.trials[index];
            trial.state = TrialState::Active;
            self.current = Some(index);
            self.active_since_ms = elapsed;
            events.push(SessionEvent::TrialActivated {
                trial_id: trial.id,
                is_go: trial.is_go,
            });
            return;
        }

        // A window opening inside the look-ahead gets a check scheduled at
        // exactly that offset, so a brief gap between ticks is not missed.
        let upcoming = self
            .trials
            .iter()
            .find(|t| t.state == TrialState::Scheduled && t.start_ms > elapsed);
        if let Some(trial) = upcoming {
            if trial.start_ms - elapsed <= self.config.activation_lookahead_ms {
                self.next_search_at_ms = Some(trial.start_ms);
            }
        }
    }

    fn resolve_expired(&mut self, index: usize, elapsed: f64, events: &mut Vec<SessionEvent>) {
        let trial = &mut self.trials[index];
        let outcome = if trial.is_go {
            self.counters.misses += 1;
            TrialOutcome::Miss
        } else {
            self.counters.correct_rejections += 1;
            TrialOutcome::CorrectRejection
        };
        trial.state = TrialState::Resolved;
        trial.outcome = Some(outcome);
        events.push(SessionEvent::TrialResolved {
            trial_id: trial.id,
            outcome,
        });
        self.current = None;
        self.next_search_at_ms = Some(elapsed + self.config.next_trial_delay_ms);
    }

    fn finalize(&mut self) {
        self.status = SessionStatus::Finished;
        self.final_results = Some(self.snapshot_results());
    }
}
