//! Workflow layer between the command line and the library

pub mod orchestration;

pub use orchestration::{ReleaseOrchestrator, ReleaseOutcome, ReleasePlan, ReleaseRequest};
