//! `adminkit-core`: primitives shared by the session, request and routing layers.
//!
//! This crate contains no IO. It only defines identifiers and the ports that let
//! the request pipeline steer navigation without depending on the router.

pub mod id;
pub mod navigation;

pub use id::UserId;
pub use navigation::Navigator;
