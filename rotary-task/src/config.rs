use std::f64::consts::FRAC_PI_4;

/// Demo session length (30 seconds).
pub const DEMO_DURATION_MS: f64 = 30_000.0;
/// Full session length (15 minutes).
pub const FULL_DURATION_MS: f64 = 15.0 * 60.0 * 1000.0;

/// Session tuning parameters. Speeds are radians per frame at 60 fps;
/// durations and intervals are milliseconds.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub base_speed: f64,
    pub distractor_speed: f64,
    /// How often the pointer speed is resampled, in un-paused elapsed time.
    pub speed_change_interval_ms: f64,
    pub speed_multiplier_range: (f64, f64),
    pub go_probability: f64,
    /// Window arc width in radians.
    pub window_size: f64,
    /// Bounds on the interval between consecutive trial starts.
    pub trial_interval_ms: (f64, f64),
    /// Accepted travel time from the simulated pointer to a window's edge.
    pub time_to_reach_ms: (f64, f64),
    /// Floor on every window's open duration.
    pub base_window_ms: f64,
    pub min_time_in_window_ms: f64,
    pub entry_buffer_ms: f64,
    /// Grace delay between resolving one trial and searching for the next.
    pub next_trial_delay_ms: f64,
    /// Look-ahead for scheduling an activation check at an upcoming start.
    pub activation_lookahead_ms: f64,
}

impl SessionConfig {
    /// Pointer speed in radians per second at the base rate.
    pub fn base_rad_per_sec(&self) -> f64 {
        self.base_speed * 60.0
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.06,
            distractor_speed: 0.045,
            speed_change_interval_ms: 3000.0,
            speed_multiplier_range: (0.5, 1.5),
            go_probability: 0.7,
            window_size: FRAC_PI_4,
            trial_interval_ms: (2000.0, 4000.0),
            time_to_reach_ms: (200.0, 2500.0),
            base_window_ms: 2000.0,
            min_time_in_window_ms: 1500.0,
            entry_buffer_ms: 800.0,
            next_trial_delay_ms: 1000.0,
            activation_lookahead_ms: 100.0,
        }
    }
}
