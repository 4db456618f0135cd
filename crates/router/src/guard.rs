//! Navigation guard.
//!
//! Authenticated/Unauthenticated is derived from the session on every call;
//! nothing is cached between navigations.

use adminkit_auth::Session;

use crate::RouteDescriptor;

/// Where the guard sends people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    /// Name of the login entry route.
    pub login_name: String,
    pub login_path: String,
    /// Default route for an authenticated operator.
    pub landing_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Navigate here instead. The originally requested path is not kept.
    Redirect(String),
}

/// Decide whether navigating to `target` is allowed.
///
/// - public target: allowed, except the login entry for a logged-in operator,
///   who goes to the landing route instead;
/// - protected target: allowed with a session, otherwise redirected to login.
pub fn decide(target: &RouteDescriptor, session: &Session, policy: &GuardPolicy) -> GuardDecision {
    let authenticated = session.is_logged_in();

    if target.meta.no_auth {
        let is_login = target.name.as_deref() == Some(policy.login_name.as_str());
        if authenticated && is_login {
            return GuardDecision::Redirect(policy.landing_path.clone());
        }
        return GuardDecision::Allow;
    }

    if authenticated {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(policy.login_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteTable;
    use adminkit_auth::UserProfile;
    use chrono::Utc;
    use proptest::prelude::*;

    fn logged_in() -> Session {
        Session::authenticated("T1", Some(UserProfile::new(1)), Utc::now())
    }

    fn route(table: &RouteTable, path: &str) -> RouteDescriptor {
        table.resolve(path).unwrap().0.clone()
    }

    #[test]
    fn login_while_authenticated_goes_to_landing() {
        let table = RouteTable::admin_console();
        let decision = decide(&route(&table, "/login"), &logged_in(), table.policy());
        assert_eq!(decision, GuardDecision::Redirect("/dashboard".into()));
    }

    #[test]
    fn login_while_anonymous_is_allowed() {
        let table = RouteTable::admin_console();
        let decision = decide(&route(&table, "/login"), &Session::empty(), table.policy());
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn other_public_routes_stay_public_when_authenticated() {
        let table = RouteTable::admin_console();
        let help = RouteDescriptor::new("/help").named("Help").no_auth();
        assert_eq!(decide(&help, &logged_in(), table.policy()), GuardDecision::Allow);
        assert_eq!(decide(&help, &Session::empty(), table.policy()), GuardDecision::Allow);
    }

    #[test]
    fn protected_route_needs_a_session() {
        let table = RouteTable::admin_console();
        let users = route(&table, "/users");
        assert_eq!(decide(&users, &logged_in(), table.policy()), GuardDecision::Allow);
        assert_eq!(
            decide(&users, &Session::empty(), table.policy()),
            GuardDecision::Redirect("/login".into())
        );
    }

    proptest! {
        /// Property: over every route of the console table, the decision only
        /// depends on `no_auth`, "is login" and the session.
        #[test]
        fn decisions_follow_the_rules(index in 0usize..8, authenticated in any::<bool>()) {
            let table = RouteTable::admin_console();
            let target = &table.routes()[index % table.routes().len()];
            let session = if authenticated { logged_in() } else { Session::empty() };
            let is_login = target.name.as_deref() == Some("Login");

            let decision = decide(target, &session, table.policy());

            let expected = match (target.meta.no_auth, authenticated) {
                (true, true) if is_login => GuardDecision::Redirect("/dashboard".into()),
                (true, _) => GuardDecision::Allow,
                (false, true) => GuardDecision::Allow,
                (false, false) => GuardDecision::Redirect("/login".into()),
            };
            prop_assert_eq!(decision, expected);
        }
    }
}
