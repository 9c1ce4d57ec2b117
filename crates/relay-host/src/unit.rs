use crate::context::CallContext;
use relay_abi::Revert;
use std::fmt;

/// Executable code installed at an account
///
/// Units are stateless: everything they persist goes through the
/// [`CallContext`] into the storage of the frame's account, which is not
/// necessarily the account the code was deployed at (see
/// [`CallContext::delegate_call`]).
pub trait Unit: Send + Sync + fmt::Debug {
    /// Human-readable name for logs and reports
    fn name(&self) -> &str;

    /// One-time setup run in the new account's frame at deployment
    ///
    /// # Errors
    /// A failure aborts the deployment; no account is created.
    fn construct(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> Result<(), Revert> {
        let _ = (ctx, args);
        Ok(())
    }

    /// Handle one call
    ///
    /// # Errors
    /// Returns the failure payload; the frame's writes are discarded.
    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert>;
}
