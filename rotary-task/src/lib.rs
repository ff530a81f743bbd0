pub mod clock;
pub mod config;
pub mod results;
pub mod scheduler;
pub mod session;

pub use config::{SessionConfig, DEMO_DURATION_MS, FULL_DURATION_MS};
pub use results::{compute_results, SessionResults};
pub use scheduler::generate_trials;
pub use session::{ResponseOutcome, Session, SessionEvent, SessionStatus};
