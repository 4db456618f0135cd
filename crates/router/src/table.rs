//! The application's route table.

use std::collections::BTreeMap;

use crate::guard::GuardPolicy;
use crate::route::normalize;
use crate::{RouteDescriptor, RouteError};

/// Validated set of routes.
///
/// # Invariants
/// - Exactly one route carries the login name, and it is `no_auth`.
/// - The landing path resolves to a route that needs a session and has no
///   static redirect.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    policy: GuardPolicy,
}

impl RouteTable {
    pub fn new(
        routes: Vec<RouteDescriptor>,
        login_name: &str,
        landing_path: &str,
    ) -> Result<Self, RouteError> {
        let mut logins = routes
            .iter()
            .filter(|r| r.name.as_deref() == Some(login_name));
        let login = logins
            .next()
            .ok_or_else(|| RouteError::InvalidTable(format!("no route named '{login_name}'")))?;
        if logins.next().is_some() {
            return Err(RouteError::InvalidTable(format!(
                "more than one route named '{login_name}'"
            )));
        }
        if !login.meta.no_auth {
            return Err(RouteError::InvalidTable(format!(
                "login route '{}' must be reachable without a session",
                login.path
            )));
        }
        let login_path = login.path.clone();

        let table = Self {
            routes,
            policy: GuardPolicy {
                login_name: login_name.to_string(),
                login_path,
                landing_path: normalize(landing_path),
            },
        };

        match table.resolve(landing_path) {
            Some((landing, _)) if landing.redirect.is_none() && !landing.meta.no_auth => Ok(table),
            Some(_) => Err(RouteError::InvalidTable(format!(
                "landing path '{landing_path}' must be a plain authenticated route"
            ))),
            None => Err(RouteError::InvalidTable(format!(
                "landing path '{landing_path}' matches no route"
            ))),
        }
    }

    /// The console's routes.
    pub fn admin_console() -> Self {
        let routes = vec![
            RouteDescriptor::new("/").redirect_to("/dashboard"),
            RouteDescriptor::new("/dashboard")
                .named("Dashboard")
                .title("Home")
                .icon("HomeFilled")
                .affix(),
            RouteDescriptor::new("/users")
                .named("Users")
                .title("User management")
                .icon("User"),
            RouteDescriptor::new("/emotions")
                .named("Emotions")
                .title("Emotion analysis")
                .icon("DataAnalysis")
                .redirect_to("/emotions/records"),
            RouteDescriptor::new("/emotions/records")
                .named("EmotionRecords")
                .title("Analysis records"),
            RouteDescriptor::new("/emotions/statistics")
                .named("EmotionStatistics")
                .title("Statistics"),
            RouteDescriptor::new("/settings")
                .named("Settings")
                .title("Settings")
                .icon("Setting"),
            RouteDescriptor::new("/login").named("Login").title("Sign in").no_auth(),
        ];

        match Self::new(routes, "Login", "/dashboard") {
            Ok(table) => table,
            Err(err) => unreachable!("built-in route table is valid: {err}"),
        }
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// First route matching `path` (in declaration order).
    pub fn resolve(&self, path: &str) -> Option<(&RouteDescriptor, BTreeMap<String, String>)> {
        let path = normalize(path);
        self.routes
            .iter()
            .find_map(|route| route.matches(&path).map(|params| (route, params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_console_table_is_valid() {
        let table = RouteTable::admin_console();
        assert_eq!(table.policy().login_path, "/login");
        assert_eq!(table.policy().landing_path, "/dashboard");

        let (root, _) = table.resolve("/").unwrap();
        assert_eq!(root.redirect.as_deref(), Some("/dashboard"));

        let (records, _) = table.resolve("/emotions/records/").unwrap();
        assert_eq!(records.name.as_deref(), Some("EmotionRecords"));
        assert!(!records.meta.no_auth);

        assert!(table.resolve("/nope").is_none());
    }

    #[test]
    fn exactly_one_login_route_is_required() {
        let missing = RouteTable::new(vec![RouteDescriptor::new("/home").named("Home")], "Login", "/home");
        assert!(matches!(missing, Err(RouteError::InvalidTable(_))));

        let duplicated = RouteTable::new(
            vec![
                RouteDescriptor::new("/home").named("Home"),
                RouteDescriptor::new("/login").named("Login").no_auth(),
                RouteDescriptor::new("/signin").named("Login").no_auth(),
            ],
            "Login",
            "/home",
        );
        assert!(matches!(duplicated, Err(RouteError::InvalidTable(_))));
    }

    #[test]
    fn login_route_must_be_public() {
        let table = RouteTable::new(
            vec![
                RouteDescriptor::new("/home").named("Home"),
                RouteDescriptor::new("/login").named("Login"),
            ],
            "Login",
            "/home",
        );
        assert!(matches!(table, Err(RouteError::InvalidTable(_))));
    }

    #[test]
    fn landing_must_need_a_session() {
        let table = RouteTable::new(
            vec![
                RouteDescriptor::new("/about").named("About").no_auth(),
                RouteDescriptor::new("/login").named("Login").no_auth(),
            ],
            "Login",
            "/about",
        );
        assert!(matches!(table, Err(RouteError::InvalidTable(_))));
    }
}
