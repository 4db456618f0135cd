//! Navigation driver: resolves paths, runs the guard, keeps history.

use std::sync::RwLock;

use adminkit_auth::SessionStore;
use adminkit_core::Navigator;

use crate::guard::{GuardDecision, decide};
use crate::route::normalize;
use crate::{Location, RouteError, RouteTable};

/// Upper bound on redirects followed for one navigation.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Default)]
struct History {
    entries: Vec<Location>,
}

impl History {
    fn current(&self) -> Option<&Location> {
        self.entries.last()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Push,
    Replace,
}

/// Router bound to one session store.
///
/// Routing faults (unknown path, redirect loop) are logged and returned; they
/// never change the current location.
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    session: SessionStore,
    history: RwLock<History>,
}

impl Router {
    pub fn new(table: RouteTable, session: SessionStore) -> Self {
        Self {
            table,
            session,
            history: RwLock::new(History::default()),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Navigate to `path`, adding a history entry.
    pub fn navigate(&self, path: &str) -> Result<Location, RouteError> {
        self.go(path, Mode::Push)
    }

    /// Navigate to `path`, replacing the current history entry.
    pub fn replace(&self, path: &str) -> Result<Location, RouteError> {
        self.go(path, Mode::Replace)
    }

    pub fn current(&self) -> Option<Location> {
        self.read().current().cloned()
    }

    pub fn history(&self) -> Vec<Location> {
        self.read().entries.clone()
    }

    fn go(&self, path: &str, mode: Mode) -> Result<Location, RouteError> {
        let requested = normalize(path);
        let mut target = requested.clone();

        for _ in 0..=MAX_REDIRECTS {
            let Some((route, params)) = self.table.resolve(&target) else {
                return Err(self.fault(RouteError::NotFound(target)));
            };

            if let Some(redirect) = &route.redirect {
                target = normalize(redirect);
                continue;
            }

            match decide(route, &self.session.snapshot(), self.table.policy()) {
                GuardDecision::Allow => {
                    let location = Location {
                        path: target,
                        name: route.name.clone(),
                        params,
                    };
                    self.commit(location.clone(), mode);
                    return Ok(location);
                }
                GuardDecision::Redirect(next) => {
                    tracing::debug!(from = %target, to = %next, "guard redirected navigation");
                    target = normalize(&next);
                }
            }
        }

        Err(self.fault(RouteError::RedirectLoop(requested)))
    }

    fn commit(&self, location: Location, mode: Mode) {
        let mut history = self.history.write().unwrap_or_else(|e| e.into_inner());
        let from = history.current().map(|l| l.path.clone()).unwrap_or_default();
        tracing::debug!(from = %from, to = %location.path, "route changed");

        match mode {
            Mode::Replace if !history.entries.is_empty() => {
                if let Some(last) = history.entries.last_mut() {
                    *last = location;
                }
            }
            _ => history.entries.push(location),
        }
    }

    fn fault(&self, err: RouteError) -> RouteError {
        tracing::error!(error = %err, "routing error");
        err
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, History> {
        self.history.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl Navigator for Router {
    fn redirect_to_login(&self) {
        let login = self.table.policy().login_path.clone();
        if let Err(err) = self.replace(&login) {
            tracing::error!(error = %err, "could not show the login view");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteDescriptor;
    use adminkit_auth::{MemoryPersistence, Session, UserProfile};
    use chrono::Utc;
    use std::sync::Arc;

    fn store(logged_in: bool) -> SessionStore {
        let session = if logged_in {
            Session::authenticated("T1", Some(UserProfile::new(1)), Utc::now())
        } else {
            Session::empty()
        };
        SessionStore::open(Arc::new(MemoryPersistence::with_session(&session)))
    }

    fn router(logged_in: bool) -> Router {
        Router::new(RouteTable::admin_console(), store(logged_in))
    }

    #[test]
    fn anonymous_operator_lands_on_login() {
        let router = router(false);
        let loc = router.navigate("/emotions/statistics").unwrap();
        assert_eq!(loc.path, "/login");
        assert_eq!(loc.name.as_deref(), Some("Login"));
    }

    #[test]
    fn root_redirects_to_dashboard_when_logged_in() {
        let router = router(true);
        let loc = router.navigate("/").unwrap();
        assert_eq!(loc.path, "/dashboard");
    }

    #[test]
    fn logged_in_operator_is_bounced_off_login() {
        let router = router(true);
        assert_eq!(router.navigate("/login").unwrap().path, "/dashboard");
    }

    #[test]
    fn guard_reads_the_session_on_every_navigation() {
        let session = store(true);
        let router = Router::new(RouteTable::admin_console(), session.clone());

        assert_eq!(router.navigate("/users").unwrap().path, "/users");
        session.logout();
        assert_eq!(router.navigate("/settings").unwrap().path, "/login");
    }

    #[test]
    fn unknown_path_is_an_error_and_keeps_location() {
        let router = router(true);
        router.navigate("/users").unwrap();

        let err = router.navigate("/does-not-exist").unwrap_err();
        assert_eq!(err, RouteError::NotFound("/does-not-exist".into()));
        assert_eq!(router.current().unwrap().path, "/users");
    }

    #[test]
    fn redirect_cycles_are_cut() {
        let table = RouteTable::new(
            vec![
                RouteDescriptor::new("/a").redirect_to("/b"),
                RouteDescriptor::new("/b").redirect_to("/a"),
                RouteDescriptor::new("/home").named("Home"),
                RouteDescriptor::new("/login").named("Login").no_auth(),
            ],
            "Login",
            "/home",
        )
        .unwrap();
        let router = Router::new(table, store(true));

        assert_eq!(router.navigate("/a").unwrap_err(), RouteError::RedirectLoop("/a".into()));
        assert!(router.current().is_none());
    }

    #[test]
    fn redirect_to_login_replaces_current_entry() {
        let session = store(true);
        let router = Router::new(RouteTable::admin_console(), session.clone());
        router.navigate("/dashboard").unwrap();
        router.navigate("/users").unwrap();

        session.logout();
        router.redirect_to_login();

        let history: Vec<String> = router.history().into_iter().map(|l| l.path).collect();
        assert_eq!(history, vec!["/dashboard", "/login"]);
    }

    #[test]
    fn params_are_exposed_on_location() {
        let table = RouteTable::new(
            vec![
                RouteDescriptor::new("/users/:id").named("UserDetail"),
                RouteDescriptor::new("/login").named("Login").no_auth(),
            ],
            "Login",
            "/users/0",
        )
        .unwrap();
        let router = Router::new(table, store(true));

        let loc = router.navigate("/users/42?tab=profile").unwrap();
        assert_eq!(loc.params.get("id").map(String::as_str), Some("42"));
    }
}
