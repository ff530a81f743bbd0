pub mod angle;
pub mod response;
pub mod trial;

pub use response::{Counters, ResponseEvent, ResponseKind};
pub use trial::{Trial, TrialOutcome, TrialState};
