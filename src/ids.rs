use std::fmt;
use ulid::Ulid;

/// Identifier of one navigation
///
/// Carried by the navigation's tracing span so its render, driver activation and
/// any error fallback can be correlated.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct NavigationId(Ulid);

impl NavigationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for NavigationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NavigationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
