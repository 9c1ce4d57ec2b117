//! Typed access to the value-store fields
//!
//! Field indices follow the declared layouts; V2 only appends.

use crate::error::BackendError;
use relay_abi::{Address, FieldType, SlotKey, StorageValue};
use relay_host::CallContext;
use relay_proxy::StorageLayout;

pub(crate) const INITIALIZED: u64 = 0;
pub(crate) const OWNER: u64 = 1;
pub(crate) const VALUE: u64 = 2;
pub(crate) const MESSAGE: u64 = 3;

/// Fields shared by every value-store version
pub(crate) fn base_layout() -> StorageLayout {
    StorageLayout::new()
        .field("initialized", FieldType::Bool)
        .field("owner", FieldType::Address)
        .field("value", FieldType::Uint)
}

pub(crate) fn initialized(ctx: &CallContext<'_>) -> bool {
    ctx.load(&SlotKey::field(INITIALIZED))
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

pub(crate) fn owner(ctx: &CallContext<'_>) -> Address {
    ctx.load(&SlotKey::field(OWNER))
        .and_then(|v| v.as_address())
        .unwrap_or(Address::ZERO)
}

pub(crate) fn value(ctx: &CallContext<'_>) -> u128 {
    ctx.load(&SlotKey::field(VALUE))
        .and_then(|v| v.as_uint())
        .unwrap_or(0)
}

pub(crate) fn message(ctx: &CallContext<'_>) -> String {
    match ctx.load(&SlotKey::field(MESSAGE)) {
        Some(StorageValue::Text(text)) => text,
        _ => String::new(),
    }
}

/// Initialized and called by the owner
pub(crate) fn require_owner(ctx: &CallContext<'_>) -> Result<(), BackendError> {
    if !initialized(ctx) {
        return Err(BackendError::NotInitialized);
    }
    if ctx.caller() != owner(ctx) {
        tracing::warn!(account = %ctx.address(), caller = %ctx.caller(), "owner-only operation rejected");
        return Err(BackendError::NotOwner);
    }
    Ok(())
}
