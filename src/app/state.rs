use std::fmt;

use crate::ids::NavigationId;
use crate::router::Params;

/// Where the router is in its navigation cycle
///
/// ```text
/// Idle -> Resolving -> Rendered
///              \-> ErrorResolving -> Rendered (fallback)
///                               \-> Fatal
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NavigationState {
    /// Nothing navigated yet
    #[default]
    Idle,
    Resolving {
        id: NavigationId,
        path: String,
    },
    /// The matched route failed; the error route is being rendered instead
    ErrorResolving {
        id: NavigationId,
        path: String,
        status: u16,
    },
    Rendered {
        id: NavigationId,
        path: String,
        /// Full path of the route whose page was rendered
        route: String,
        /// Whether the error route was rendered in place of the matched one
        fallback: bool,
    },
    /// The error route itself failed
    Fatal {
        id: NavigationId,
        path: String,
    },
}

impl NavigationState {
    /// Identifier of the navigation this state belongs to
    #[must_use]
    pub fn id(&self) -> Option<NavigationId> {
        match self {
            NavigationState::Idle => None,
            NavigationState::Resolving { id, .. }
            | NavigationState::ErrorResolving { id, .. }
            | NavigationState::Rendered { id, .. }
            | NavigationState::Fatal { id, .. } => Some(*id),
        }
    }

    /// Route rendered by the last completed navigation
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        match self {
            NavigationState::Rendered { route, .. } => Some(route),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, NavigationState::Rendered { .. })
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, NavigationState::Rendered { fallback: true, .. })
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, NavigationState::Fatal { .. })
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationState::Idle => f.write_str("idle"),
            NavigationState::Resolving { path, .. } => write!(f, "resolving {path}"),
            NavigationState::ErrorResolving { path, status, .. } => {
                write!(f, "resolving error route for {path} ({status})")
            }
            NavigationState::Rendered {
                path,
                route,
                fallback,
                ..
            } => {
                if *fallback {
                    write!(f, "rendered error route {route} for {path}")
                } else {
                    write!(f, "rendered {route} for {path}")
                }
            }
            NavigationState::Fatal { path, .. } => write!(f, "fatal navigation to {path}"),
        }
    }
}

/// Outcome of a completed navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub id: NavigationId,
    /// The path that was navigated to
    pub path: String,
    /// Full path of the route whose page was rendered
    pub route: String,
    /// Parameters the rendered route extracted
    pub params: Params,
    /// Status of the failure that sent this navigation to the error route
    pub fallback: Option<u16>,
    /// Whether the activated driver left a background task running
    pub pending: bool,
}

impl Navigation {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}
