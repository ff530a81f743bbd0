use std::f64::consts::TAU;

use rand::Rng;
use rotary_core::{angle, Trial};

use crate::config::SessionConfig;

/// Placement search gives up after this many rejected candidates and pins
/// the window at the violated bound instead. Keeps generation total.
const MAX_PLACEMENT_ATTEMPTS: u32 = 20;

#[derive(Debug, Clone, Copy)]
pub(crate) struct WindowPlacement {
    pub angle: f64,
    pub time_to_reach_ms: f64,
}

/// Pre-generate the whole session's trial schedule for `[0, duration_ms)`.
///
/// The walk advances a cursor by uniform inter-trial intervals and tracks a
/// simulated pointer moving at the *base* speed. Runtime speed
/// randomization is deliberately ignored here: windows are reachable in
/// principle while actual arrival timing varies with the live speed.
pub fn generate_trials<R: Rng>(
    config: &SessionConfig,
    duration_ms: f64,
    rng: &mut R,
) -> Vec<Trial> {
    let rad_per_sec = config.base_rad_per_sec();
    let (min_interval, max_interval) = config.trial_interval_ms;

    let mut trials = Vec::new();
    let mut cursor_ms = 0.0;
    let mut simulated_pointer = 0.0;

    loop {
        let interval = rng.random_range(min_interval..max_interval);
        cursor_ms += interval;
        simulated_pointer += rad_per_sec * (interval / 1000.0);

        // The in-progress trial is discarded once the cursor leaves the
        // session, not truncated to fit.
        if cursor_ms >= duration_ms {
            break;
        }

        let is_go = rng.random_bool(config.go_probability);
        let placement = place_window(
            angle::normalize(simulated_pointer),
            rad_per_sec,
            config,
            rng,
        );

        let traverse_ms = config.window_size / rad_per_sec * 1000.0;
        let window_duration = config.base_window_ms.max(
            placement.time_to_reach_ms
                + traverse_ms
                + config.min_time_in_window_ms
                + config.entry_buffer_ms,
        );

        trials.push(Trial::new(
            trials.len(),
            cursor_ms,
            window_duration,
            is_go,
            placement.angle,
            config.window_size,
        ));
    }

    trials
}

/// Sample a window center whose near-edge travel time from the simulated
/// pointer falls inside the configured bounds. After
/// [`MAX_PLACEMENT_ATTEMPTS`] rejections the window is force-constructed at
/// exactly the min or max boundary distance, in whichever direction the
/// last sample violated, with travel time recomputed for the forced
/// position.
pub(crate) fn place_window<R: Rng>(
    pointer: f64,
    rad_per_sec: f64,
    config: &SessionConfig,
    rng: &mut R,
) -> WindowPlacement {
    let (min_ms, max_ms) = config.time_to_reach_ms;
    let min_distance = min_ms / 1000.0 * rad_per_sec;
    let max_distance = max_ms / 1000.0 * rad_per_sec;

    let mut candidate = 0.0;
    let mut time_to_reach = 0.0;

    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        candidate = rng.random_range(0.0..TAU);
        time_to_reach = angle::shortest_distance(pointer, candidate) / rad_per_sec * 1000.0;

        if time_to_reach >= min_ms && time_to_reach <= max_ms {
            break;
        }

        if attempt == MAX_PLACEMENT_ATTEMPTS {
            let offset = if time_to_reach < min_ms {
                min_distance
            } else {
                max_distance
            };
            let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            candidate = angle::normalize(pointer + direction * offset);
            time_to_reach = angle::shortest_distance(pointer, candidate) / rad_per_sec * 1000.0;
        }
    }

    WindowPlacement {
        angle: candidate,
        time_to_reach_ms: time_to_reach,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn schedule_is_ordered_and_stays_inside_the_session() {
        for seed in 0..8 {
            let config = SessionConfig::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let trials = generate_trials(&config, 30_000.0, &mut rng);

            assert!(!trials.is_empty());
            for pair in trials.windows(2) {
                assert!(pair[0].start_ms < pair[1].start_ms);
            }
            for trial in &trials {
                assert!(trial.start_ms < 30_000.0);
                assert!(trial.start_ms >= config.trial_interval_ms.0);
            }
        }
    }

    #[test]
    fn every_window_duration_meets_the_floor() {
        for seed in 0..8 {
            let config = SessionConfig::default();
            let mut rng = StdRng::seed_from_u64(seed);
            for trial in generate_trials(&config, 120_000.0, &mut rng) {
                assert!(trial.duration_ms >= config.base_window_ms);
            }
        }
    }

    #[test]
    fn trial_ids_follow_schedule_order() {
        let config = SessionConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let trials = generate_trials(&config, 60_000.0, &mut rng);
        for (index, trial) in trials.iter().enumerate() {
            assert_eq!(trial.id, index);
        }
    }

    #[test]
    fn go_probability_extremes_are_respected() {
        let config = SessionConfig {
            go_probability: 0.0,
            ..SessionConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        assert!(generate_trials(&config, 60_000.0, &mut rng)
            .iter()
            .all(|t| !t.is_go));

        let config = SessionConfig {
            go_probability: 1.0,
            ..SessionConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        assert!(generate_trials(&config, 60_000.0, &mut rng)
            .iter()
            .all(|t| t.is_go));
    }

    #[test]
    fn placements_fall_inside_the_travel_bounds_at_default_speed() {
        let config = SessionConfig::default();
        let rad_per_sec = config.base_rad_per_sec();
        let (min_ms, max_ms) = config.time_to_reach_ms;
        let mut rng = StdRng::seed_from_u64(13);

        for i in 0..200 {
            let pointer = (i as f64) * 0.37;
            let placement =
                place_window(angle::normalize(pointer), rad_per_sec, &config, &mut rng);
            assert!(placement.time_to_reach_ms >= min_ms);
            assert!(placement.time_to_reach_ms <= max_ms);
            assert!(placement.angle >= 0.0 && placement.angle < TAU);
        }
    }

    #[test]
    fn fallback_pins_the_window_at_the_max_boundary_when_the_band_is_tiny() {
        // At a crawl the acceptance band is a sliver of the circle, so the
        // sampler exhausts its attempts and pins the window at the max
        // travel distance exactly.
        let config = SessionConfig {
            base_speed: 0.0005,
            ..SessionConfig::default()
        };
        let rad_per_sec = config.base_rad_per_sec();
        let (min_ms, max_ms) = config.time_to_reach_ms;

        let mut pinned = 0;
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let placement = place_window(1.0, rad_per_sec, &config, &mut rng);
            assert!(placement.time_to_reach_ms >= min_ms - 1e-6);
            assert!(placement.time_to_reach_ms <= max_ms + 1e-6);
            if (placement.time_to_reach_ms - max_ms).abs() < 1e-6 {
                pinned += 1;
            }
        }
        assert!(pinned > 0);
    }
}
