//! Error taxonomy for route configuration and navigation.
//!
//! Configuration errors are fatal and surface synchronously from construction.
//! Navigation errors are recovered inside the [`Router`](crate::app::Router) by
//! re-resolving against the error route; only a [`FatalResolutionError`] is left
//! once that fallback has also failed.

use std::fmt;

/// Error compiling a route template into a matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `:` parameter marker with a custom group but no name, e.g. `/post/:(\d+)`
    EmptyParameterName {
        /// The offending template
        template: String,
    },
    /// The same parameter name appears twice in one template
    DuplicateParameter {
        /// The offending template
        template: String,
        /// The repeated name
        name: String,
    },
    /// A custom capture group `:name(...)` is not closed
    UnbalancedGroup {
        /// The offending template
        template: String,
    },
    /// The generated regular expression failed to compile
    Regex {
        /// The offending template
        template: String,
        /// Message from the regex engine
        message: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::EmptyParameterName { template } => {
                write!(f, "route template '{template}' has a parameter without a name")
            }
            PatternError::DuplicateParameter { template, name } => {
                write!(
                    f,
                    "route template '{template}' declares parameter ':{name}' more than once"
                )
            }
            PatternError::UnbalancedGroup { template } => {
                write!(f, "route template '{template}' has an unclosed capture group")
            }
            PatternError::Regex { template, message } => {
                write!(f, "route template '{template}' did not compile: {message}")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Malformed or missing application configuration
///
/// Returned by [`RouteTable::build`](crate::router::RouteTable::build),
/// [`RootReducer::build`](crate::store::RootReducer::build) and
/// [`Registry::assemble`](crate::config::Registry::assemble). Never recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// An action configuration entry is null
    MissingEntry {
        /// Position of the entry in the configuration list
        index: usize,
    },
    /// An entry declares a route but no page to render for it
    MissingPage {
        /// Position of the entry in the configuration list
        index: usize,
        /// The mounted route path
        route: String,
    },
    /// No page was configured for the synthesized error route
    MissingErrorPage,
    /// A route template failed to compile
    InvalidPattern(PatternError),
    /// Two reducer-bearing drivers claim the same action type
    DuplicateActionType {
        /// The contested action type
        action_type: String,
    },
    /// More than one entry is flagged `initial`
    MultipleInitial {
        /// Position of the first flagged entry
        first: usize,
        /// Position of the second flagged entry
        second: usize,
    },
    /// A manifest names a page the registry does not know
    UnknownPage {
        /// The unresolved page name
        name: String,
    },
    /// A manifest names a driver the registry does not know
    UnknownDriver {
        /// The unresolved driver name
        name: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MissingEntry { index } => write!(
                f,
                "action config #{index} is null - please check your configuration"
            ),
            ConfigurationError::MissingPage { index, route } => write!(
                f,
                "action config #{index} routes '{route}' but has no page to render"
            ),
            ConfigurationError::MissingErrorPage => {
                write!(f, "no page configured for the error route")
            }
            ConfigurationError::InvalidPattern(err) => write!(f, "{err}"),
            ConfigurationError::DuplicateActionType { action_type } => write!(
                f,
                "action type '{action_type}' is reduced by more than one driver"
            ),
            ConfigurationError::MultipleInitial { first, second } => write!(
                f,
                "action configs #{first} and #{second} are both flagged initial"
            ),
            ConfigurationError::UnknownPage { name } => {
                write!(f, "page '{name}' is not registered")
            }
            ConfigurationError::UnknownDriver { name } => {
                write!(f, "driver '{name}' is not registered")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::InvalidPattern(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PatternError> for ConfigurationError {
    fn from(err: PatternError) -> Self {
        ConfigurationError::InvalidPattern(err)
    }
}

/// A navigation that could not be completed on its matched route
///
/// Both variants are absorbed by the router, which re-resolves the location
/// against the error route and hands this value to the error page.
#[derive(Debug)]
pub enum NavigationError {
    /// No route matches the location
    NotFound {
        /// The path that was looked up
        path: String,
    },
    /// The matched route's page failed while producing a view
    PageRender {
        /// The path that was looked up
        path: String,
        /// Full path of the route whose page failed
        route: String,
        /// The page's own error
        source: anyhow::Error,
    },
}

impl NavigationError {
    /// HTTP-style status code describing the failure
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            NavigationError::NotFound { .. } => 404,
            NavigationError::PageRender { .. } => 500,
        }
    }

    /// The path whose navigation failed
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            NavigationError::NotFound { path } | NavigationError::PageRender { path, .. } => path,
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::NotFound { path } => write!(f, "route {path} not found"),
            NavigationError::PageRender { path, route, source } => {
                write!(f, "page for {route} failed while rendering {path}: {source}")
            }
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::NotFound { .. } => None,
            NavigationError::PageRender { source, .. } => Some(source.as_ref()),
        }
    }
}

/// The error route itself could not be resolved or rendered
///
/// There is no fallback beyond the error route, so this is terminal for the
/// navigation that produced it.
#[derive(Debug)]
pub enum FatalResolutionError {
    /// The error route did not match its own lookup key
    ErrorRouteUnmatched {
        /// The failure that triggered the error resolution
        cause: NavigationError,
    },
    /// The error page failed as well
    ErrorPageFailed {
        /// The failure that triggered the error resolution
        cause: NavigationError,
        /// The error page's own error
        source: anyhow::Error,
    },
}

impl FatalResolutionError {
    /// The navigation failure that led to the error route
    #[must_use]
    pub fn cause(&self) -> &NavigationError {
        match self {
            FatalResolutionError::ErrorRouteUnmatched { cause }
            | FatalResolutionError::ErrorPageFailed { cause, .. } => cause,
        }
    }
}

impl fmt::Display for FatalResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalResolutionError::ErrorRouteUnmatched { cause } => {
                write!(f, "error route could not be resolved after: {cause}")
            }
            FatalResolutionError::ErrorPageFailed { cause, source } => {
                write!(f, "error page failed ({source}) after: {cause}")
            }
        }
    }
}

impl std::error::Error for FatalResolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause())
    }
}
