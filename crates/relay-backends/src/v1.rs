//! First value-store version: an owned `uint128`

use crate::error::BackendError;
use crate::fields;
use once_cell::sync::Lazy;
use relay_abi::{decode_args, encode_return, Address, Revert, Selector, SlotKey};
use relay_host::{CallContext, Unit};
use relay_proxy::{Backend, StorageLayout};
use serde::Serialize;
use serde_json::json;

/// Operations shared by every value-store version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueOp {
    Initialize,
    SetValue,
    Value,
    Owner,
    Version,
}

impl ValueOp {
    #[must_use]
    pub fn signature(self) -> &'static str {
        match self {
            ValueOp::Initialize => "initialize(address)",
            ValueOp::SetValue => "setValue(uint128)",
            ValueOp::Value => "value()",
            ValueOp::Owner => "owner()",
            ValueOp::Version => "version()",
        }
    }

    #[must_use]
    pub fn all() -> [ValueOp; 5] {
        [
            ValueOp::Initialize,
            ValueOp::SetValue,
            ValueOp::Value,
            ValueOp::Owner,
            ValueOp::Version,
        ]
    }

    #[must_use]
    pub fn from_selector(selector: Selector) -> Option<ValueOp> {
        static TABLE: Lazy<Vec<(Selector, ValueOp)>> = Lazy::new(|| {
            ValueOp::all()
                .into_iter()
                .map(|op| (Selector::from_signature(op.signature()), op))
                .collect()
        });
        TABLE.iter().find(|(s, _)| *s == selector).map(|(_, op)| *op)
    }
}

pub(crate) fn reply<R: Serialize + ?Sized>(value: &R) -> Result<Vec<u8>, Revert> {
    encode_return(value).map_err(|_| BackendError::MalformedCall.into())
}

/// Run one of the shared operations; `version` is what `version()` reports
pub(crate) fn handle(
    ctx: &mut CallContext<'_>,
    op: ValueOp,
    input: &[u8],
    version: u64,
) -> Result<Vec<u8>, Revert> {
    match op {
        ValueOp::Initialize => {
            let (owner,): (Address,) = decode_args(input).map_err(|_| BackendError::MalformedCall)?;
            if fields::initialized(ctx) {
                return Err(BackendError::AlreadyInitialized.into());
            }
            ctx.store(SlotKey::field(fields::INITIALIZED), true);
            ctx.store(SlotKey::field(fields::OWNER), owner);
            ctx.emit("Initialized", json!({ "owner": owner }));
            tracing::info!(account = %ctx.address(), %owner, "value store initialized");
            Ok(Vec::new())
        }
        ValueOp::SetValue => {
            let (value,): (u128,) = decode_args(input).map_err(|_| BackendError::MalformedCall)?;
            fields::require_owner(ctx)?;
            ctx.store(SlotKey::field(fields::VALUE), value);
            ctx.emit("ValueChanged", json!({ "value": value }));
            Ok(Vec::new())
        }
        ValueOp::Value => reply(&fields::value(ctx)),
        ValueOp::Owner => reply(&fields::owner(ctx)),
        ValueOp::Version => reply(&version),
    }
}

/// Value store, version 1
#[derive(Debug, Default, Clone, Copy)]
pub struct ValueStoreV1;

impl ValueStoreV1 {
    pub const VERSION: u64 = 1;

    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Unit for ValueStoreV1 {
    fn name(&self) -> &str {
        "ValueStoreV1"
    }

    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let op = Selector::of(input)
            .and_then(ValueOp::from_selector)
            .ok_or(BackendError::UnknownSelector)?;
        handle(ctx, op, input, Self::VERSION)
    }
}

impl Backend for ValueStoreV1 {
    fn layout(&self) -> StorageLayout {
        fields::base_layout()
    }
}
