//! `adminkit-auth`: operator session state and its persistence contract.
//!
//! This crate is intentionally decoupled from HTTP: logging in goes through the
//! [`Authenticator`] port, persisting goes through [`SessionPersistence`].

pub mod authenticator;
pub mod persistence;
pub mod session;
pub mod store;

pub use authenticator::{AuthError, Authenticator, LoginGrant, LoginRequest};
pub use persistence::{FilePersistence, MemoryPersistence, PersistenceError, SessionPersistence, STORAGE_KEY};
pub use session::{Session, UserProfile};
pub use store::SessionStore;
