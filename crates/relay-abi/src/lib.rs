//! Relay ABI
//!
//! Foundation types shared by the host, the dispatch frontend and every
//! backend unit.
//!
//! # Core Concepts
//!
//! - [`Address`]: 20-byte account identity; [`Address::ZERO`] is empty
//! - [`Selector`]: 4-byte operation identifier at the head of call data
//! - [`SlotKey`]: 32-byte storage key, sequential for fields, hashed for
//!   reserved metadata
//! - [`StorageValue`]: typed value held in one slot
//! - [`Revert`]: opaque failure payload
//!
//! # Example
//!
//! ```rust,ignore
//! use relay_abi::{encode_call, decode_args, Address};
//!
//! let input = encode_call("upgradeTo(address)", &(backend,))?;
//! let (target,): (Address,) = decode_args(&input)?;
//! ```

#![warn(unreachable_pub)]

mod address;
mod calldata;
mod revert;
mod slot;

pub use address::{AbiError, Address};
pub use calldata::{decode_args, decode_return, encode_call, encode_return, split, Selector};
pub use revert::Revert;
pub use slot::{FieldType, SlotKey, StorageValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
