//! Call frames
//!
//! A [`CallContext`] is what a running [`Unit`] sees: the identity and storage
//! of the frame's account, the caller, the attached value, and the primitives
//! for nested calls.
//!
//! - [`CallContext::call`] runs the target's code against the target's own
//!   storage; the current account becomes the caller.
//! - [`CallContext::delegate_call`] runs another account's code against the
//!   *current* account's storage, keeping the current caller and value. This
//!   is the indirect invocation a dispatch frontend is built on.

use crate::config::HostConfig;
use crate::error::HostError;
use crate::state::{MergeStrategy, TransactionalState, WorldState};
use crate::unit::Unit;
use relay_abi::{Address, Revert, SlotKey, StorageValue};
use std::sync::Arc;

/// How a frame was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    DelegateCall,
    Create,
}

/// Identity of one executing frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Account whose storage and identity the frame uses
    pub address: Address,
    /// Account whose code is running
    pub code_address: Address,
    pub caller: Address,
    pub value: u128,
    pub depth: usize,
    pub kind: CallKind,
}

/// Execution context handed to a running unit
pub struct CallContext<'w> {
    state: &'w mut WorldState,
    config: &'w HostConfig,
    frame: Frame,
}

impl<'w> CallContext<'w> {
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Identity this frame acts as
    #[must_use]
    pub fn address(&self) -> Address {
        self.frame.address
    }

    #[must_use]
    pub fn caller(&self) -> Address {
        self.frame.caller
    }

    #[must_use]
    pub fn value(&self) -> u128 {
        self.frame.value
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frame.depth
    }

    /// Read a slot of the frame's account
    #[must_use]
    pub fn load(&self, key: &SlotKey) -> Option<StorageValue> {
        self.state.load(&self.frame.address, key).cloned()
    }

    /// Write a slot of the frame's account
    pub fn store(&mut self, key: SlotKey, value: impl Into<StorageValue>) {
        self.state.store(self.frame.address, key, value.into());
    }

    #[must_use]
    pub fn has_code(&self, address: &Address) -> bool {
        self.state.has_code(address)
    }

    #[must_use]
    pub fn balance(&self, address: &Address) -> u128 {
        self.state.balance(address)
    }

    /// Append an event attributed to the frame's account
    pub fn emit(&mut self, topic: &str, data: serde_json::Value) {
        let emitter = self.frame.address;
        let sequence = self.state.log_mut().append(emitter, topic, data);
        tracing::trace!(%emitter, topic, sequence, "event emitted");
    }

    /// Call `target` with its own storage, transferring `value`
    ///
    /// # Errors
    /// Returns the callee's failure payload unchanged, or a [`HostError`]
    /// payload when the frame cannot be entered.
    pub fn call(&mut self, target: Address, value: u128, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let frame = Frame {
            address: target,
            code_address: target,
            caller: self.frame.address,
            value,
            depth: self.frame.depth + 1,
            kind: CallKind::Call,
        };
        execute_frame(self.state, self.config, frame, input)
    }

    /// Run the code at `code_address` against this frame's storage
    ///
    /// Caller and value are inherited, so the delegated code observes the
    /// same identity and authorization inputs as the current frame.
    ///
    /// # Errors
    /// Returns the delegated code's failure payload unchanged, or
    /// [`HostError::NoCode`] when `code_address` holds no code.
    pub fn delegate_call(&mut self, code_address: Address, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let frame = Frame {
            address: self.frame.address,
            code_address,
            caller: self.frame.caller,
            value: self.frame.value,
            depth: self.frame.depth + 1,
            kind: CallKind::DelegateCall,
        };
        execute_frame(self.state, self.config, frame, input)
    }
}

fn check_depth(config: &HostConfig, frame: &Frame) -> Result<(), Revert> {
    if frame.depth > config.max_call_depth {
        return Err(HostError::CallDepthExceeded {
            depth: frame.depth,
            limit: config.max_call_depth,
        }
        .into());
    }
    Ok(())
}

fn close(state: &mut WorldState, ok: bool) {
    let strategy = if ok {
        MergeStrategy::Commit
    } else {
        MergeStrategy::Discard
    };
    state.pop_substate(strategy);
}

/// Enter a call or delegate-call frame inside its own substate
pub(crate) fn execute_frame(
    state: &mut WorldState,
    config: &HostConfig,
    frame: Frame,
    input: &[u8],
) -> Result<Vec<u8>, Revert> {
    check_depth(config, &frame)?;
    let code = state.code(&frame.code_address);
    if code.is_none() && frame.kind == CallKind::DelegateCall {
        return Err(HostError::NoCode(frame.code_address).into());
    }

    tracing::debug!(
        kind = ?frame.kind,
        address = %frame.address,
        code = %frame.code_address,
        caller = %frame.caller,
        depth = frame.depth,
        "entering frame"
    );

    state.push_substate();
    let result = run_code(state, config, frame, code, input);
    close(state, result.is_ok());
    if let Err(revert) = &result {
        tracing::debug!(address = %frame.address, depth = frame.depth, %revert, "frame reverted");
    }
    result
}

fn run_code(
    state: &mut WorldState,
    config: &HostConfig,
    frame: Frame,
    code: Option<Arc<dyn Unit>>,
    input: &[u8],
) -> Result<Vec<u8>, Revert> {
    if frame.kind == CallKind::Call {
        state.transfer(frame.caller, frame.address, frame.value)?;
    }
    let Some(code) = code else {
        return Ok(Vec::new());
    };
    let mut ctx = CallContext { state, config, frame };
    code.execute(&mut ctx, input)
}

/// Install `code` at `frame.address` and run its constructor
pub(crate) fn construct_frame(
    state: &mut WorldState,
    config: &HostConfig,
    frame: Frame,
    code: Arc<dyn Unit>,
    args: &[u8],
) -> Result<(), Revert> {
    check_depth(config, &frame)?;
    tracing::debug!(address = %frame.address, unit = code.name(), deployer = %frame.caller, "constructing");

    state.push_substate();
    state.account_mut(frame.address).code = Some(Arc::clone(&code));
    let result = {
        let mut ctx = CallContext { state: &mut *state, config, frame };
        code.construct(&mut ctx, args)
    };
    close(state, result.is_ok());
    result
}
