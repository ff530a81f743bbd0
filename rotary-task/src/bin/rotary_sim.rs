//! Headless session driver with a scripted subject: responds about 150 ms
//! after the pointer enters a go window, and presses impulsively on every
//! fifth no-go trial. Fast mode (default) runs on the manual clock and
//! finishes instantly; `--realtime` paces frames with the OS sleep.

use std::env;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rotary_task::{Session, SessionConfig, SessionEvent, SessionStatus, DEMO_DURATION_MS};
use rotary_timing::{HighPrecisionTimer, ManualTimer, Timer};

const FRAME: Duration = Duration::from_millis(16);
const SUBJECT_RT_NS: u64 = 150_000_000;
const IMPULSIVE_RT_NS: u64 = 400_000_000;

fn main() {
    let mut duration_ms = DEMO_DURATION_MS;
    let mut realtime = false;
    let mut seed = 42u64;

    for arg in env::args().skip(1) {
        if arg == "--realtime" {
            realtime = true;
        } else if let Some(value) = arg.strip_prefix("--seed=") {
            seed = value.parse().expect("--seed takes an integer");
        } else {
            duration_ms = arg.parse().expect("duration must be milliseconds");
        }
    }

    if realtime {
        run(HighPrecisionTimer::new(), duration_ms, seed);
    } else {
        run(ManualTimer::new(), duration_ms, seed);
    }
}

fn run<T: Timer<Timestamp = u64>>(timer: T, duration_ms: f64, seed: u64) {
    let rng = StdRng::seed_from_u64(seed);
    let mut session = Session::new(SessionConfig::default(), timer, rng);
    session.start(duration_ms);
    println!(
        "rotary go/no-go session: {:.0} ms, {} trials, seed {}",
        duration_ms,
        session.trials().len(),
        seed
    );

    let mut respond_at: Option<u64> = None;
    while session.status() != SessionStatus::Finished {
        session.timer.sleep(FRAME);
        for event in session.update() {
            match event {
                SessionEvent::TrialActivated { trial_id, is_go } => {
                    println!(
                        "[{:>7.0} ms] trial {} activated ({})",
                        session.elapsed_ms(),
                        trial_id,
                        if is_go { "go" } else { "no-go" }
                    );
                    if !is_go && trial_id % 5 == 0 {
                        respond_at = Some(session.timer.now() + IMPULSIVE_RT_NS);
                    }
                }
                SessionEvent::PointerEntered { .. } => {
                    if session.active_trial().is_some_and(|t| t.is_go) {
                        respond_at = Some(session.timer.now() + SUBJECT_RT_NS);
                    }
                }
                SessionEvent::TrialResolved { trial_id, outcome } => {
                    println!(
                        "[{:>7.0} ms] trial {} expired: {:?}",
                        session.elapsed_ms(),
                        trial_id,
                        outcome
                    );
                    respond_at = None;
                }
                SessionEvent::Finished => {
                    println!("[{:>7.0} ms] session finished", session.elapsed_ms());
                }
            }
        }

        if let Some(at) = respond_at {
            if session.timer.now() >= at {
                respond_at = None;
                let outcome = session.respond();
                println!("[{:>7.0} ms] respond -> {:?}", session.elapsed_ms(), outcome);
            }
        }
    }

    let counters = session.counters();
    println!(
        "hits {}  misses {}  false alarms {}  correct rejections {}",
        counters.hits, counters.misses, counters.false_alarms, counters.correct_rejections
    );
    let stats = session.frame_stats();
    println!(
        "frame cadence: {:.3} ms avg, {:.1} fps effective",
        stats.average_frame_time_ns / 1e6,
        stats.effective_fps
    );

    let results = session
        .final_results()
        .expect("finished session has results");
    println!(
        "{}",
        serde_json::to_string_pretty(results).expect("results serialize")
    );
}
