//! Command-line orchestration for a single triage run.

pub mod lock;
pub mod run;
