use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};

use rotary_core::{Counters, ResponseEvent, ResponseKind, Trial};

/// Signal-detection summary of a session, computable at any point from the
/// trial set, response log and counters alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    pub total_trials: usize,
    pub hits: u32,
    pub misses: u32,
    pub false_alarms: u32,
    pub correct_rejections: u32,
    pub hit_rate: f64,
    pub false_alarm_rate: f64,
    pub d_prime: f64,
    pub mean_rt_ms: f64,
    pub rt_sd_ms: f64,
    /// Percent of all generated trials answered correctly.
    pub accuracy: f64,
}

/// Aggregate the full response/trial log into a results record. Pure; two
/// calls over unchanged state yield identical records.
pub fn compute_results(
    trials: &[Trial],
    responses: &[ResponseEvent],
    counters: &Counters,
) -> SessionResults {
    let go_trials = trials.iter().filter(|t| t.is_go).count();
    let no_go_trials = trials.len() - go_trials;

    let hit_rate = if go_trials > 0 {
        f64::from(counters.hits) / go_trials as f64
    } else {
        0.0
    };
    let false_alarm_rate = if no_go_trials > 0 {
        f64::from(counters.false_alarms) / no_go_trials as f64
    } else {
        0.0
    };

    let d_prime = z_score(hit_rate) - z_score(false_alarm_rate);

    let hit_rts: Vec<f64> = responses
        .iter()
        .filter(|r| r.kind == ResponseKind::Hit)
        .map(|r| r.reaction_time_ms)
        .collect();
    let mean_rt_ms = mean(&hit_rts);
    let rt_sd_ms = population_sd(&hit_rts, mean_rt_ms);

    let accuracy = if trials.is_empty() {
        0.0
    } else {
        100.0 * f64::from(counters.hits + counters.correct_rejections) / trials.len() as f64
    };

    SessionResults {
        total_trials: trials.len(),
        hits: counters.hits,
        misses: counters.misses,
        false_alarms: counters.false_alarms,
        correct_rejections: counters.correct_rejections,
        hit_rate,
        false_alarm_rate,
        d_prime,
        mean_rt_ms,
        rt_sd_ms,
        accuracy,
    }
}

/// Clamped z-transform of a response rate: extreme rates saturate at ±3
/// instead of diverging.
fn z_score(rate: f64) -> f64 {
    if rate >= 1.0 {
        3.0
    } else if rate <= 0.0 {
        -3.0
    } else {
        SQRT_2 * inverse_erf(2.0 * rate - 1.0)
    }
}

/// Winitzki's approximation of the inverse error function (a = 0.147).
fn inverse_erf(x: f64) -> f64 {
    const A: f64 = 0.147;
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let ln = (1.0 - x * x).ln();
    let term = 2.0 / (PI * A) + ln / 2.0;
    sign * ((term * term - ln / A).sqrt() - 2.0 / (PI * A) - ln / 2.0).sqrt()
}

fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        0.0
    } else {
        data.iter().sum::<f64>() / data.len() as f64
    }
}

fn population_sd(data: &[f64], mean: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let variance = data
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    fn trial(id: usize, is_go: bool) -> Trial {
        Trial::new(id, id as f64 * 3000.0, 2000.0, is_go, 1.0, FRAC_PI_4)
    }

    fn hit(trial_id: usize, rt: f64) -> ResponseEvent {
        ResponseEvent {
            kind: ResponseKind::Hit,
            reaction_time_ms: rt,
            trial_id,
        }
    }

    #[test]
    fn z_score_clamps_extreme_rates() {
        assert_eq!(z_score(0.0), -3.0);
        assert_eq!(z_score(1.0), 3.0);
        assert_eq!(z_score(1.2), 3.0);
        assert_eq!(z_score(-0.1), -3.0);
        assert_eq!(z_score(0.5), 0.0);
    }

    #[test]
    fn inverse_erf_matches_reference_values() {
        assert_eq!(inverse_erf(0.0), 0.0);
        // erf^-1(0.5) = 0.476936...; Winitzki is good to a few parts in 1e3.
        assert!((inverse_erf(0.5) - 0.476936).abs() < 5e-3);
        assert!((inverse_erf(-0.5) + inverse_erf(0.5)).abs() < 1e-12);
    }

    #[test]
    fn d_prime_inverts_under_reflection() {
        let trials: Vec<Trial> = (0..10)
            .map(|id| trial(id, id < 5))
            .collect();

        // 4/5 hits against 1/5 false alarms...
        let forward = compute_results(
            &trials,
            &[],
            &Counters {
                hits: 4,
                misses: 1,
                false_alarms: 1,
                correct_rejections: 4,
            },
        );
        // ...reflected: 1/5 hits against 4/5 false alarms.
        let reflected = compute_results(
            &trials,
            &[],
            &Counters {
                hits: 1,
                misses: 4,
                false_alarms: 4,
                correct_rejections: 1,
            },
        );

        assert!(forward.d_prime > 0.0);
        assert!((forward.d_prime + reflected.d_prime).abs() < 1e-12);
    }

    #[test]
    fn rates_guard_against_empty_denominators() {
        let results = compute_results(&[], &[], &Counters::default());
        assert_eq!(results.hit_rate, 0.0);
        assert_eq!(results.false_alarm_rate, 0.0);
        assert_eq!(results.accuracy, 0.0);
        assert_eq!(results.d_prime, 0.0);

        let go_only: Vec<Trial> = (0..3).map(|id| trial(id, true)).collect();
        let results = compute_results(
            &go_only,
            &[],
            &Counters {
                hits: 3,
                ..Counters::default()
            },
        );
        assert_eq!(results.hit_rate, 1.0);
        assert_eq!(results.false_alarm_rate, 0.0);
        assert_eq!(results.d_prime, 6.0);
    }

    #[test]
    fn reaction_stats_use_hits_only_with_population_sd() {
        let trials: Vec<Trial> = (0..4).map(|id| trial(id, id < 2)).collect();
        let responses = vec![
            hit(0, 100.0),
            hit(1, 200.0),
            ResponseEvent {
                kind: ResponseKind::FalseAlarm,
                reaction_time_ms: 900.0,
                trial_id: 2,
            },
        ];
        let counters = Counters {
            hits: 2,
            misses: 0,
            false_alarms: 1,
            correct_rejections: 1,
        };

        let results = compute_results(&trials, &responses, &counters);
        assert_eq!(results.mean_rt_ms, 150.0);
        assert_eq!(results.rt_sd_ms, 50.0);
        assert_eq!(results.accuracy, 75.0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let trials: Vec<Trial> = (0..6).map(|id| trial(id, id % 3 != 0)).collect();
        let responses = vec![hit(1, 312.5), hit(2, 488.0)];
        let counters = Counters {
            hits: 3,
            misses: 1,
            false_alarms: 1,
            correct_rejections: 1,
        };

        let first = compute_results(&trials, &responses, &counters);
        let second = compute_results(&trials, &responses, &counters);
        assert_eq!(first, second);
    }
}
