//! Runtime settings loaded from environment variables.
//!
//! | Variable | Effect | Default |
//! |---|---|---|
//! | `WAYPOST_MOUNTPATH` | prefix for every route | site root |
//! | `WAYPOST_CASE_SENSITIVE` | match literal route text case-sensitively | `false` |
//! | `WAYPOST_STRICT` | require exact trailing slashes | `false` |
//! | `WAYPOST_CANCEL_SUPERSEDED` | abort a navigation's pending driver task when a newer navigation starts | `true` |

use std::env;

use crate::router::PatternOptions;

/// Runtime settings for a mounted application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mountpath: Option<String>,
    pub case_sensitive: bool,
    pub strict: bool,
    pub cancel_superseded: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mountpath: None,
            case_sensitive: false,
            strict: false,
            cancel_superseded: true,
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|s| s.trim().to_lowercase().parse().ok())
                .unwrap_or(default)
        };
        Self {
            mountpath: lookup("WAYPOST_MOUNTPATH").filter(|m| !m.is_empty()),
            case_sensitive: flag("WAYPOST_CASE_SENSITIVE", defaults.case_sensitive),
            strict: flag("WAYPOST_STRICT", defaults.strict),
            cancel_superseded: flag("WAYPOST_CANCEL_SUPERSEDED", defaults.cancel_superseded),
        }
    }

    #[must_use]
    pub fn pattern_options(&self) -> PatternOptions {
        PatternOptions {
            case_sensitive: self.case_sensitive,
            strict: self.strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Settings::default());
    }

    #[test]
    fn test_reads_every_variable() {
        let settings = Settings::from_lookup(lookup(&[
            ("WAYPOST_MOUNTPATH", "/blog"),
            ("WAYPOST_CASE_SENSITIVE", "true"),
            ("WAYPOST_STRICT", "TRUE"),
            ("WAYPOST_CANCEL_SUPERSEDED", "false"),
        ]));
        assert_eq!(settings.mountpath.as_deref(), Some("/blog"));
        assert!(settings.case_sensitive);
        assert!(settings.strict);
        assert!(!settings.cancel_superseded);
    }

    #[test]
    fn test_unparseable_flag_falls_back_to_default() {
        let settings = Settings::from_lookup(lookup(&[
            ("WAYPOST_CANCEL_SUPERSEDED", "maybe"),
            ("WAYPOST_MOUNTPATH", ""),
        ]));
        assert!(settings.cancel_superseded);
        assert_eq!(settings.mountpath, None);
    }
}
