use rand::Rng;

use crate::config::SessionConfig;

/// Advances the pointer and distractor angles each tick.
///
/// Speeds are per-frame-at-60fps constants; scaling by `delta * 60` keeps
/// motion identical across refresh rates. Angles grow unbounded and are
/// normalized only at comparison time.
#[derive(Debug, Clone)]
pub struct RotationClock {
    pointer_angle: f64,
    pointer_speed: f64,
    base_speed: f64,
    distractor_angle: f64,
    distractor_speed: f64,
    speed_change_interval_ms: f64,
    speed_multiplier_range: (f64, f64),
    since_speed_change_ms: f64,
}

impl RotationClock {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            pointer_angle: 0.0,
            pointer_speed: config.base_speed,
            base_speed: config.base_speed,
            distractor_angle: 0.0,
            distractor_speed: config.distractor_speed,
            speed_change_interval_ms: config.speed_change_interval_ms,
            speed_multiplier_range: config.speed_multiplier_range,
            since_speed_change_ms: 0.0,
        }
    }

    /// Advance by `delta_secs` of un-paused wall time. Returns true when the
    /// periodic speed resample fired on this tick.
    pub fn advance<R: Rng>(&mut self, delta_secs: f64, rng: &mut R) -> bool {
        self.since_speed_change_ms += delta_secs * 1000.0;
        let resampled = if self.since_speed_change_ms >= self.speed_change_interval_ms {
            let (lo, hi) = self.speed_multiplier_range;
            let multiplier = if hi > lo { rng.random_range(lo..hi) } else { lo };
            self.pointer_speed = self.base_speed * multiplier;
            self.since_speed_change_ms = 0.0;
            true
        } else {
            false
        };

        self.pointer_angle += self.pointer_speed * delta_secs * 60.0;
        self.distractor_angle += self.distractor_speed * delta_secs * 60.0;
        resampled
    }

    pub fn pointer_angle(&self) -> f64 {
        self.pointer_angle
    }

    pub fn pointer_speed(&self) -> f64 {
        self.pointer_speed
    }

    pub fn distractor_angle(&self) -> f64 {
        self.distractor_angle
    }
}
