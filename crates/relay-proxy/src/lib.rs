//! Relay Proxy
//!
//! An upgradeable dispatch frontend: a persistent address whose behavior is
//! supplied by a swappable backend while its state stays put.
//!
//! # Core Concepts
//!
//! - [`Frontend`]: forwards every non-admin call to the current backend by
//!   delegation, so the backend runs against the frontend's storage
//! - [`ReservedSlots`]: the backend and admin handles, kept at hashed keys no
//!   backend field can reach
//! - [`Route`]: selector-based interception of the admin entry points
//! - [`AdminController`]: owned unit that holds the frontend's admin role
//! - [`StorageLayout`]: append-only field layouts and the compatibility check
//!   operators run before a swap
//!
//! # Example
//!
//! ```ignore
//! use relay_proxy::{Frontend, FrontendInit};
//!
//! let init = FrontendInit { backend: v1, admin: controller, init_payload };
//! let frontend = world.deploy(operator, Arc::new(Frontend::new()), &init.encode()?)?;
//! world.transact(user, frontend, 0, &set_value_call)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod admin;
mod error;
mod frontend;
mod layout;
mod operator;
mod routing;
mod slots;

pub use admin::{AdminController, AdminOp, OWNER_KEY};
pub use error::{AdminError, OperatorError, ProxyError};
pub use frontend::{Frontend, FrontendInit};
pub use layout::{Backend, FieldDecl, LayoutError, StorageLayout};
pub use operator::Operator;
pub use routing::{intercepted_selectors, Route, CHANGE_ADMIN_SIGNATURE, SWAP_BACKEND_SIGNATURE};
pub use slots::{ReservedSlot, ReservedSlots, ADMIN_SLOT, ADMIN_TAG, IMPLEMENTATION_SLOT, IMPLEMENTATION_TAG};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
