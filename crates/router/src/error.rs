use thiserror::Error;

/// Faults of the routing engine itself (not guard decisions).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches '{0}'")]
    NotFound(String),

    #[error("redirect loop while navigating to '{0}'")]
    RedirectLoop(String),

    #[error("invalid route table: {0}")]
    InvalidTable(String),
}
