//! Pipeline entry points for notifier operations.
//!
//! - `detect`: Classify a fetched feed against the stored snapshot
//! - `run_cycle`: Run one fetch, detect, notify, persist pass

pub mod detect;
pub mod run;

pub use detect::{dedupe_by_id, detect, expired, ChangeEvent};
pub use run::{run_cycle, CycleOutcome};
