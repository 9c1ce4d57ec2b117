//! Admin controller
//!
//! An independently owned unit that a frontend names as its admin. Its owner
//! (the operator) drives upgrades through it, which keeps the identity the
//! frontend trusts separate from any single operator key. Failures raised by
//! the frontend propagate through the controller unchanged.

use crate::error::AdminError;
use crate::frontend::Frontend;
use once_cell::sync::Lazy;
use relay_abi::{decode_args, encode_call, encode_return, AbiError, Address, Revert, Selector, SlotKey};
use relay_host::{CallContext, Unit};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Storage key of the owner in the controller's own account
pub const OWNER_KEY: u64 = 0;

/// Operations of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminOp {
    Upgrade,
    UpgradeAndCall,
    ChangeFrontendAdmin,
    TransferOwnership,
    Owner,
}

impl AdminOp {
    /// Operation signature
    #[must_use]
    pub fn signature(self) -> &'static str {
        match self {
            AdminOp::Upgrade => "upgrade(address,address)",
            AdminOp::UpgradeAndCall => "upgradeAndCall(address,address,bytes)",
            AdminOp::ChangeFrontendAdmin => "changeFrontendAdmin(address,address)",
            AdminOp::TransferOwnership => "transferOwnership(address)",
            AdminOp::Owner => "owner()",
        }
    }

    #[must_use]
    pub fn all() -> [AdminOp; 5] {
        [
            AdminOp::Upgrade,
            AdminOp::UpgradeAndCall,
            AdminOp::ChangeFrontendAdmin,
            AdminOp::TransferOwnership,
            AdminOp::Owner,
        ]
    }

    /// Operation named by `selector`
    #[must_use]
    pub fn from_selector(selector: Selector) -> Option<AdminOp> {
        static TABLE: Lazy<Vec<(Selector, AdminOp)>> = Lazy::new(|| {
            AdminOp::all()
                .into_iter()
                .map(|op| (Selector::from_signature(op.signature()), op))
                .collect()
        });
        TABLE
            .iter()
            .find(|(candidate, _)| *candidate == selector)
            .map(|(_, op)| *op)
    }

    /// Encode a call to this operation
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn encode<A: serde::Serialize + ?Sized>(self, args: &A) -> Result<Vec<u8>, AbiError> {
        encode_call(self.signature(), args)
    }
}

/// The admin controller unit
#[derive(Debug, Default, Clone, Copy)]
pub struct AdminController;

impl AdminController {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn owner(ctx: &CallContext<'_>) -> Address {
        ctx.load(&SlotKey::field(OWNER_KEY))
            .and_then(|v| v.as_address())
            .unwrap_or(Address::ZERO)
    }

    fn set_owner(ctx: &mut CallContext<'_>, previous: Address, owner: Address) {
        ctx.store(SlotKey::field(OWNER_KEY), owner);
        ctx.emit(
            "OwnershipTransferred",
            json!({ "previous": previous, "new": owner }),
        );
    }

    fn require_owner(ctx: &CallContext<'_>) -> Result<Address, AdminError> {
        let owner = Self::owner(ctx);
        if ctx.caller() != owner {
            tracing::warn!(controller = %ctx.address(), caller = %ctx.caller(), "controller called by non-owner");
            return Err(AdminError::Unauthorized);
        }
        Ok(owner)
    }

    fn args<A: DeserializeOwned>(input: &[u8]) -> Result<A, AdminError> {
        decode_args(input).map_err(|_| AdminError::MalformedCall)
    }

    fn swap(ctx: &mut CallContext<'_>, frontend: Address, backend: Address) -> Result<(), Revert> {
        let call = Frontend::swap_backend_call(backend).map_err(|_| AdminError::MalformedCall)?;
        ctx.call(frontend, 0, &call)?;
        tracing::info!(controller = %ctx.address(), %frontend, %backend, "upgrade submitted");
        Ok(())
    }

    fn upgrade(ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        Self::require_owner(ctx)?;
        let (frontend, backend): (Address, Address) = Self::args(input)?;
        Self::swap(ctx, frontend, backend)?;
        Ok(Vec::new())
    }

    fn upgrade_and_call(ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        Self::require_owner(ctx)?;
        let (frontend, backend, payload): (Address, Address, Vec<u8>) = Self::args(input)?;
        Self::swap(ctx, frontend, backend)?;
        let value = ctx.value();
        ctx.call(frontend, value, &payload)
    }

    fn change_frontend_admin(ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        Self::require_owner(ctx)?;
        let (frontend, new_admin): (Address, Address) = Self::args(input)?;
        let call = Frontend::change_admin_call(new_admin).map_err(|_| AdminError::MalformedCall)?;
        ctx.call(frontend, 0, &call)?;
        Ok(Vec::new())
    }

    fn transfer_ownership(ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let previous = Self::require_owner(ctx)?;
        let (new_owner,): (Address,) = Self::args(input)?;
        if new_owner.is_zero() {
            return Err(AdminError::InvalidOwner.into());
        }
        Self::set_owner(ctx, previous, new_owner);
        tracing::info!(controller = %ctx.address(), %previous, owner = %new_owner, "ownership transferred");
        Ok(Vec::new())
    }
}

impl Unit for AdminController {
    fn name(&self) -> &str {
        "AdminController"
    }

    fn construct(&self, ctx: &mut CallContext<'_>, _args: &[u8]) -> Result<(), Revert> {
        let owner = ctx.caller();
        Self::set_owner(ctx, Address::ZERO, owner);
        Ok(())
    }

    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let op = Selector::of(input)
            .and_then(AdminOp::from_selector)
            .ok_or(AdminError::UnknownSelector)?;
        match op {
            AdminOp::Upgrade => Self::upgrade(ctx, input),
            AdminOp::UpgradeAndCall => Self::upgrade_and_call(ctx, input),
            AdminOp::ChangeFrontendAdmin => Self::change_frontend_admin(ctx, input),
            AdminOp::TransferOwnership => Self::transfer_ownership(ctx, input),
            AdminOp::Owner => encode_return(&Self::owner(ctx)).map_err(|_| AdminError::MalformedCall.into()),
        }
    }
}
