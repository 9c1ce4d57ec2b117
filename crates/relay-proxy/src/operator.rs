//! Operator-side helper for driving upgrades through an admin controller
//!
//! Runs off the host: it builds controller call data, checks storage layout
//! compatibility before a swap is proposed, and submits transactions as the
//! controller's owner.

use crate::admin::AdminOp;
use crate::error::OperatorError;
use crate::layout::{Backend, StorageLayout};
use relay_abi::{decode_return, Address};
use relay_host::World;

/// An operator account together with the controller it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    pub account: Address,
    pub controller: Address,
}

impl Operator {
    #[must_use]
    pub fn new(account: Address, controller: Address) -> Self {
        Self { account, controller }
    }

    /// Swap `frontend` from `current` to the backend deployed at `next_address`
    ///
    /// # Errors
    /// [`OperatorError::Layout`] when `next` does not extend the layout of
    /// `current`; nothing is submitted in that case. Otherwise any failure
    /// raised on the host.
    pub fn upgrade(
        &self,
        world: &mut World,
        frontend: Address,
        current: &dyn Backend,
        next_address: Address,
        next: &dyn Backend,
    ) -> Result<(), OperatorError> {
        Self::check_layout(current, next)?;
        let input = AdminOp::Upgrade.encode(&(frontend, next_address))?;
        world.transact(self.account, self.controller, 0, &input)?;
        tracing::info!(%frontend, backend = %next_address, unit = next.name(), "upgrade applied");
        Ok(())
    }

    /// Swap backends and run `payload` through the frontend in one transaction
    ///
    /// # Errors
    /// Same as [`Operator::upgrade`]; a failing `payload` also undoes the swap.
    pub fn upgrade_and_call(
        &self,
        world: &mut World,
        frontend: Address,
        current: &dyn Backend,
        next_address: Address,
        next: &dyn Backend,
        payload: Vec<u8>,
    ) -> Result<Vec<u8>, OperatorError> {
        Self::check_layout(current, next)?;
        let input = AdminOp::UpgradeAndCall.encode(&(frontend, next_address, payload))?;
        Ok(world.transact(self.account, self.controller, 0, &input)?)
    }

    /// Hand the frontend's admin role to `new_admin`
    ///
    /// # Errors
    /// Any failure raised on the host
    pub fn change_frontend_admin(
        &self,
        world: &mut World,
        frontend: Address,
        new_admin: Address,
    ) -> Result<(), OperatorError> {
        let input = AdminOp::ChangeFrontendAdmin.encode(&(frontend, new_admin))?;
        world.transact(self.account, self.controller, 0, &input)?;
        Ok(())
    }

    /// Transfer the controller to `new_owner` and return the helper for it
    ///
    /// # Errors
    /// Any failure raised on the host
    pub fn transfer_ownership(
        &self,
        world: &mut World,
        new_owner: Address,
    ) -> Result<Operator, OperatorError> {
        let input = AdminOp::TransferOwnership.encode(&(new_owner,))?;
        world.transact(self.account, self.controller, 0, &input)?;
        Ok(Operator::new(new_owner, self.controller))
    }

    /// Current owner recorded by the controller
    ///
    /// # Errors
    /// Any failure raised on the host
    pub fn owner(&self, world: &mut World) -> Result<Address, OperatorError> {
        let input = AdminOp::Owner.encode(&())?;
        let output = world.transact(self.account, self.controller, 0, &input)?;
        Ok(decode_return(&output)?)
    }

    fn check_layout(current: &dyn Backend, next: &dyn Backend) -> Result<(), OperatorError> {
        let (old, new) = (current.layout(), next.layout());
        if let Err(err) = StorageLayout::check_upgrade(&old, &new) {
            tracing::warn!(from = current.name(), to = next.name(), %old, %new, "layout check failed");
            return Err(err.into());
        }
        Ok(())
    }
}
