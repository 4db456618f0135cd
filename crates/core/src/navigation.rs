//! Navigation port.

use std::sync::Arc;

/// Something that can move the operator to the login view.
///
/// The request pipeline holds one of these so a session failure can force a
/// redirect. The router implements it; tests substitute a recorder.
pub trait Navigator: Send + Sync {
    /// Replace the current location with the login entry point.
    fn redirect_to_login(&self);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn redirect_to_login(&self) {
        (**self).redirect_to_login()
    }
}

/// Navigator that does nothing (headless use, e.g. scripts).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect_to_login(&self) {}
}
