//! Route descriptors and path matching.

use std::collections::BTreeMap;

/// Per-route metadata. Only `no_auth` matters to the guard; the rest is for
/// menus and tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Reachable without a session.
    pub no_auth: bool,
    pub title: Option<String>,
    pub icon: Option<String>,
    /// Pinned tab.
    pub affix: bool,
}

/// A route the application defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Absolute path pattern; segments starting with `:` are parameters.
    pub path: String,
    pub name: Option<String>,
    pub meta: RouteMeta,
    /// Static redirect applied before the guard runs.
    pub redirect: Option<String>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: normalize(&path.into()),
            name: None,
            meta: RouteMeta::default(),
            redirect: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.meta.icon = Some(icon.into());
        self
    }

    pub fn affix(mut self) -> Self {
        self.meta.affix = true;
        self
    }

    pub fn no_auth(mut self) -> Self {
        self.meta.no_auth = true;
        self
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    /// Match a normalized path, returning captured parameters.
    pub(crate) fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let pattern: Vec<&str> = segments(&self.path).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (p, a) in pattern.iter().zip(&actual) {
            match p.strip_prefix(':') {
                Some(key) => {
                    params.insert(key.to_string(), (*a).to_string());
                }
                None if p == a => {}
                None => return None,
            }
        }
        Some(params)
    }
}

/// Where the router ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub name: Option<String>,
    pub params: BTreeMap<String, String>,
}

/// Drop query/fragment, ensure a leading slash, drop a trailing one.
pub(crate) fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_paths() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("users/"), "/users");
        assert_eq!(normalize("/emotions/records?page=2#top"), "/emotions/records");
    }

    #[test]
    fn static_segments_match_exactly() {
        let route = RouteDescriptor::new("/emotions/records");
        assert!(route.matches("/emotions/records").is_some());
        assert!(route.matches("/emotions").is_none());
        assert!(route.matches("/emotions/statistics").is_none());
    }

    #[test]
    fn parameters_are_captured() {
        let route = RouteDescriptor::new("/users/:id/edit");
        let params = route.matches("/users/42/edit").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(route.matches("/users/42").is_none());
    }

    #[test]
    fn root_matches_only_root() {
        let route = RouteDescriptor::new("/");
        assert!(route.matches("/").is_some());
        assert!(route.matches("/dashboard").is_none());
    }
}
