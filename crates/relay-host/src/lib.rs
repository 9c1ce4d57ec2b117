//! Relay Host
//!
//! A single-threaded execution host for stateless code units over journaled
//! per-account storage.
//!
//! # Core Concepts
//!
//! - [`World`]: accounts, code, balances and the event log; runs top-level
//!   transactions and deployments
//! - [`Unit`]: executable code installed at an account
//! - [`CallContext`]: what a running unit sees, including nested
//!   [`CallContext::call`] and [`CallContext::delegate_call`]
//! - [`EventLog`]: hash-chained record of emitted events
//!
//! Every frame runs inside a substate. A failing frame discards its storage
//! writes, balance moves and events; a top-level transaction is
//! all-or-nothing.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod context;
mod error;
mod logging;
mod state;
mod unit;
mod world;

pub use config::{HostConfig, DEFAULT_MAX_CALL_DEPTH};
pub use context::{CallContext, CallKind, Frame};
pub use error::{ConfigError, HostError, LogError};
pub use logging::{EventLog, EventRecord};
pub use state::{Account, MergeStrategy, TransactionalState, WorldState};
pub use unit::Unit;
pub use world::World;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
