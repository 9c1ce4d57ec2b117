//! Relay Backends
//!
//! Value-store backends for the relay dispatch frontend. [`ValueStoreV1`]
//! keeps an owned `uint128`; [`ValueStoreV2`] appends an owned message to the
//! same layout so a frontend can move from one to the other without touching
//! existing state.
//!
//! Both are initialized through `initialize(address)` instead of a
//! constructor, since they run against the frontend's storage.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod fields;
mod v1;
mod v2;

pub use error::BackendError;
pub use v1::{ValueOp, ValueStoreV1};
pub use v2::ValueStoreV2;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
