//! Call routing of the dispatch frontend
//!
//! Interception is decided by selector alone. A call whose selector names one
//! of the frontend's admin entry points is handled by the frontend for every
//! caller; the entry point's own authorization check is what restricts it to
//! the admin. Every other call, including calls from the admin, is forwarded.
//!
//! A backend operation whose selector equals an admin entry point's selector
//! is therefore unreachable through the frontend.

use crate::error::ProxyError;
use once_cell::sync::Lazy;
use relay_abi::{decode_args, Address, Selector};

/// Signature of the backend-swap entry point
pub const SWAP_BACKEND_SIGNATURE: &str = "upgradeTo(address)";

/// Signature of the admin-change entry point
pub const CHANGE_ADMIN_SIGNATURE: &str = "changeAdmin(address)";

static SWAP_BACKEND: Lazy<Selector> = Lazy::new(|| Selector::from_signature(SWAP_BACKEND_SIGNATURE));
static CHANGE_ADMIN: Lazy<Selector> = Lazy::new(|| Selector::from_signature(CHANGE_ADMIN_SIGNATURE));

/// Selectors the frontend never forwards
#[must_use]
pub fn intercepted_selectors() -> [Selector; 2] {
    [*SWAP_BACKEND, *CHANGE_ADMIN]
}

/// Where an inbound call goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `upgradeTo(address)`
    SwapBackend(Address),
    /// `changeAdmin(address)`
    ChangeAdmin(Address),
    /// Plain value transfer with empty input
    Receive,
    /// Everything else goes to the current backend
    Forward,
}

impl Route {
    /// Classify raw input
    ///
    /// # Errors
    /// Returns [`ProxyError::MalformedCall`] when an intercepted selector
    /// carries arguments that do not decode; such calls are never forwarded.
    pub fn classify(input: &[u8]) -> Result<Route, ProxyError> {
        if input.is_empty() {
            return Ok(Route::Receive);
        }
        let Some(selector) = Selector::of(input) else {
            return Ok(Route::Forward);
        };

        if selector == *SWAP_BACKEND {
            let (backend,): (Address,) = decode_args(input).map_err(|_| ProxyError::MalformedCall)?;
            Ok(Route::SwapBackend(backend))
        } else if selector == *CHANGE_ADMIN {
            let (admin,): (Address,) = decode_args(input).map_err(|_| ProxyError::MalformedCall)?;
            Ok(Route::ChangeAdmin(admin))
        } else {
            Ok(Route::Forward)
        }
    }

    /// Whether the frontend handles this route itself
    #[must_use]
    pub fn is_intercepted(&self) -> bool {
        !matches!(self, Route::Forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_abi::encode_call;

    #[test]
    fn empty_input_is_a_transfer() {
        assert_eq!(Route::classify(&[]), Ok(Route::Receive));
    }

    #[test]
    fn admin_entry_points_are_intercepted() {
        let target = Address::from_label("v2");
        let swap = encode_call(SWAP_BACKEND_SIGNATURE, &(target,)).unwrap();
        let change = encode_call(CHANGE_ADMIN_SIGNATURE, &(target,)).unwrap();

        assert_eq!(Route::classify(&swap), Ok(Route::SwapBackend(target)));
        assert_eq!(Route::classify(&change), Ok(Route::ChangeAdmin(target)));
        assert!(Route::SwapBackend(target).is_intercepted());
    }

    #[test]
    fn other_selectors_are_forwarded() {
        let call = encode_call("setValue(uint128)", &(42u128,)).unwrap();
        assert_eq!(Route::classify(&call), Ok(Route::Forward));
        assert_eq!(Route::classify(&[1, 2]), Ok(Route::Forward));
        assert!(!Route::Forward.is_intercepted());
    }

    #[test]
    fn intercepted_selector_with_bad_arguments_is_not_forwarded() {
        let bad = encode_call(SWAP_BACKEND_SIGNATURE, &("nope", 7)).unwrap();
        assert_eq!(Route::classify(&bad), Err(ProxyError::MalformedCall));
    }

    #[test]
    fn intercepted_set_is_fixed() {
        let selectors = intercepted_selectors();
        assert!(selectors.contains(&Selector::from_signature("upgradeTo(address)")));
        assert!(selectors.contains(&Selector::from_signature("changeAdmin(address)")));
    }
}
