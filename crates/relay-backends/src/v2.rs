//! Second value-store version: V1 plus an owned message

use crate::error::BackendError;
use crate::fields;
use crate::v1::{handle, reply, ValueOp};
use relay_abi::{decode_args, FieldType, Revert, Selector, SlotKey};
use relay_host::{CallContext, Unit};
use relay_proxy::{Backend, StorageLayout};
use serde_json::json;

const SET_MESSAGE: &str = "setMessage(string)";
const MESSAGE: &str = "message()";

/// Value store, version 2
#[derive(Debug, Default, Clone, Copy)]
pub struct ValueStoreV2;

impl ValueStoreV2 {
    pub const VERSION: u64 = 2;

    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn set_message(ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let (message,): (String,) = decode_args(input).map_err(|_| BackendError::MalformedCall)?;
        fields::require_owner(ctx)?;
        ctx.emit("MessageChanged", json!({ "message": message }));
        ctx.store(SlotKey::field(fields::MESSAGE), message);
        Ok(Vec::new())
    }
}

impl Unit for ValueStoreV2 {
    fn name(&self) -> &str {
        "ValueStoreV2"
    }

    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let selector = Selector::of(input).ok_or(BackendError::UnknownSelector)?;
        if selector == Selector::from_signature(SET_MESSAGE) {
            return Self::set_message(ctx, input);
        }
        if selector == Selector::from_signature(MESSAGE) {
            return reply(&fields::message(ctx));
        }
        let op = ValueOp::from_selector(selector).ok_or(BackendError::UnknownSelector)?;
        handle(ctx, op, input, Self::VERSION)
    }
}

impl Backend for ValueStoreV2 {
    fn layout(&self) -> StorageLayout {
        fields::base_layout().field("message", FieldType::Text)
    }
}
