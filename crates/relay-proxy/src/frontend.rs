//! Dispatch frontend
//!
//! The persistent-identity unit. It keeps no business state of its own, only
//! the two reserved handles. Intercepted admin calls are handled here; every
//! other call is delegated to the current backend, which runs against this
//! account's storage and sees the original caller and value. Output and
//! failure payloads of forwarded calls are returned untouched.

use crate::error::ProxyError;
use crate::routing::{Route, CHANGE_ADMIN_SIGNATURE, SWAP_BACKEND_SIGNATURE};
use crate::slots::{ReservedSlot, ReservedSlots};
use relay_abi::{encode_call, AbiError, Address, Revert, Selector};
use relay_host::{CallContext, Unit, World};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Constructor arguments of a frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendInit {
    pub backend: Address,
    pub admin: Address,
    /// Delegated to `backend` once during construction when non-empty
    #[serde(default)]
    pub init_payload: Vec<u8>,
}

impl FrontendInit {
    /// Encode as deployment arguments
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn encode(&self) -> Result<Vec<u8>, AbiError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// The dispatch frontend unit
#[derive(Debug, Default, Clone, Copy)]
pub struct Frontend;

impl Frontend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Call data for `upgradeTo(new_backend)`
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn swap_backend_call(new_backend: Address) -> Result<Vec<u8>, AbiError> {
        encode_call(SWAP_BACKEND_SIGNATURE, &(new_backend,))
    }

    /// Call data for `changeAdmin(new_admin)`
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn change_admin_call(new_admin: Address) -> Result<Vec<u8>, AbiError> {
        encode_call(CHANGE_ADMIN_SIGNATURE, &(new_admin,))
    }

    /// Current backend of the frontend at `frontend`, read from raw storage
    #[must_use]
    pub fn backend_of(world: &World, frontend: &Address) -> Option<Address> {
        ReservedSlots::inspect(world, frontend, ReservedSlot::Implementation)
    }

    /// Current admin of the frontend at `frontend`, read from raw storage
    #[must_use]
    pub fn admin_of(world: &World, frontend: &Address) -> Option<Address> {
        ReservedSlots::inspect(world, frontend, ReservedSlot::Admin)
    }

    fn require_admin(ctx: &CallContext<'_>) -> Result<Address, ProxyError> {
        let admin = ReservedSlots::read(ctx, ReservedSlot::Admin).unwrap_or(Address::ZERO);
        if ctx.caller() != admin {
            tracing::warn!(frontend = %ctx.address(), caller = %ctx.caller(), "admin entry point called by non-admin");
            return Err(ProxyError::Unauthorized);
        }
        Ok(admin)
    }

    fn validate_backend(ctx: &CallContext<'_>, backend: &Address) -> Result<(), ProxyError> {
        if backend.is_zero() || !ctx.has_code(backend) {
            return Err(ProxyError::InvalidBackend);
        }
        Ok(())
    }

    fn install_backend(ctx: &mut CallContext<'_>, backend: Address) {
        ReservedSlots::write(ctx, ReservedSlot::Implementation, backend);
        ctx.emit("Upgraded", json!({ "backend": backend }));
    }

    fn install_admin(ctx: &mut CallContext<'_>, previous: Address, admin: Address) {
        ReservedSlots::write(ctx, ReservedSlot::Admin, admin);
        ctx.emit("AdminChanged", json!({ "previous": previous, "new": admin }));
    }

    fn swap_backend(ctx: &mut CallContext<'_>, new_backend: Address) -> Result<(), ProxyError> {
        Self::require_admin(ctx)?;
        Self::validate_backend(ctx, &new_backend)?;

        let previous = ReservedSlots::read(ctx, ReservedSlot::Implementation).unwrap_or(Address::ZERO);
        Self::install_backend(ctx, new_backend);
        tracing::info!(frontend = %ctx.address(), %previous, backend = %new_backend, "backend swapped");
        Ok(())
    }

    fn change_admin(ctx: &mut CallContext<'_>, new_admin: Address) -> Result<(), ProxyError> {
        let previous = Self::require_admin(ctx)?;
        if new_admin.is_zero() {
            return Err(ProxyError::InvalidAdmin);
        }

        Self::install_admin(ctx, previous, new_admin);
        tracing::info!(frontend = %ctx.address(), %previous, admin = %new_admin, "admin changed");
        Ok(())
    }

    fn dispatch(ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let backend = ReservedSlots::read(ctx, ReservedSlot::Implementation).unwrap_or(Address::ZERO);
        tracing::debug!(
            frontend = %ctx.address(),
            %backend,
            selector = ?Selector::of(input),
            depth = ctx.depth(),
            "forwarding call"
        );
        ctx.delegate_call(backend, input)
    }
}

impl Unit for Frontend {
    fn name(&self) -> &str {
        "Frontend"
    }

    fn construct(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> Result<(), Revert> {
        let init: FrontendInit = serde_json::from_slice(args).map_err(|_| ProxyError::MalformedCall)?;
        Self::validate_backend(ctx, &init.backend)?;
        if init.admin.is_zero() {
            return Err(ProxyError::InvalidAdmin.into());
        }

        Self::install_backend(ctx, init.backend);
        Self::install_admin(ctx, Address::ZERO, init.admin);

        if !init.init_payload.is_empty() {
            tracing::debug!(frontend = %ctx.address(), backend = %init.backend, "running backend initializer");
            ctx.delegate_call(init.backend, &init.init_payload)?;
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        match Route::classify(input)? {
            Route::SwapBackend(new_backend) => {
                Self::swap_backend(ctx, new_backend)?;
                Ok(Vec::new())
            }
            Route::ChangeAdmin(new_admin) => {
                Self::change_admin(ctx, new_admin)?;
                Ok(Vec::new())
            }
            Route::Receive => {
                tracing::debug!(frontend = %ctx.address(), value = ctx.value(), "value received");
                Ok(Vec::new())
            }
            Route::Forward => Self::dispatch(ctx, input),
        }
    }
}
