//! `adminkit-router`: auth-gated navigation for the console.
//!
//! [`guard::decide`] is the pure decision function; [`Router`] drives it for
//! every navigation attempt and is the [`Navigator`](adminkit_core::Navigator)
//! the request pipeline uses to force the login view.

pub mod error;
pub mod guard;
pub mod route;
pub mod router;
pub mod table;

pub use error::RouteError;
pub use guard::{GuardDecision, GuardPolicy, decide};
pub use route::{Location, RouteDescriptor, RouteMeta};
pub use router::{MAX_REDIRECTS, Router};
pub use table::RouteTable;
