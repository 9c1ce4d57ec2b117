//! Relay Simulator
//!
//! Drives a value-store frontend through deployment, use, an upgrade from V1
//! to V2 and further use, and reports whether state and routing behaved.

#![allow(missing_docs)]

mod report;
mod scenario;

pub use report::{Report, Step};
pub use scenario::{run_scenario, ScenarioParams};
