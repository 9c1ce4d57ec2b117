//! Reserved-slot store
//!
//! The frontend keeps exactly two handles in its own storage: the current
//! backend and the current admin. Their keys are `SHA-256(tag) - 1`, far above
//! any sequential field index a backend layout can declare, so backend state
//! sharing the same storage never aliases them.
//!
//! This is a raw cell store: no validation happens here.

use once_cell::sync::Lazy;
use relay_abi::{Address, SlotKey, StorageValue};
use relay_host::{CallContext, World};

/// Tag hashed into the implementation slot key
pub const IMPLEMENTATION_TAG: &str = "relay.proxy.implementation";

/// Tag hashed into the admin slot key
pub const ADMIN_TAG: &str = "relay.proxy.admin";

/// Key of the current-backend handle
pub static IMPLEMENTATION_SLOT: Lazy<SlotKey> = Lazy::new(|| SlotKey::reserved(IMPLEMENTATION_TAG));

/// Key of the current-admin handle
pub static ADMIN_SLOT: Lazy<SlotKey> = Lazy::new(|| SlotKey::reserved(ADMIN_TAG));

/// The two frontend-owned handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedSlot {
    Implementation,
    Admin,
}

impl ReservedSlot {
    #[must_use]
    pub fn key(self) -> SlotKey {
        match self {
            ReservedSlot::Implementation => *IMPLEMENTATION_SLOT,
            ReservedSlot::Admin => *ADMIN_SLOT,
        }
    }

    #[must_use]
    pub fn all() -> [ReservedSlot; 2] {
        [ReservedSlot::Implementation, ReservedSlot::Admin]
    }
}

/// Read and write access to the reserved handles
pub struct ReservedSlots;

impl ReservedSlots {
    /// Handle stored in `slot` of the executing frame's account
    #[must_use]
    pub fn read(ctx: &CallContext<'_>, slot: ReservedSlot) -> Option<Address> {
        ctx.load(&slot.key()).and_then(|v| v.as_address())
    }

    /// Overwrite `slot` of the executing frame's account
    pub fn write(ctx: &mut CallContext<'_>, slot: ReservedSlot, handle: Address) {
        ctx.store(slot.key(), StorageValue::Address(handle));
    }

    /// Handle stored in `slot` of `account`, read straight from host storage
    #[must_use]
    pub fn inspect(world: &World, account: &Address, slot: ReservedSlot) -> Option<Address> {
        world
            .storage_at(account, &slot.key())
            .and_then(StorageValue::as_address)
    }
}
