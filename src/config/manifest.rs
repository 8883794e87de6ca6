use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Declarative application configuration
///
/// Pages and drivers are referred to by name and resolved through a
/// [`Registry`](super::Registry). A `null` entry in `actions` is kept as `None` so
/// that building the route table reports it.
///
/// ```yaml
/// mountpath: /blog
/// actions:
///   - name: home
///     route: /
///     page: home
///   - route: /post/:id
///     page: post
///     driver: post
///   - driver: session
///     initial: true
/// error:
///   page: not_found
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub mountpath: Option<String>,
    #[serde(default, alias = "actionConfigs")]
    pub actions: Vec<Option<ActionEntry>>,
    #[serde(default)]
    pub error: Option<ErrorEntry>,
    #[serde(default, alias = "initialState")]
    pub initial_state: Option<Value>,
}

/// One `actions` entry of a [`Manifest`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "path")]
    pub route: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub initial: bool,
}

/// The `error` section of a [`Manifest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub page: String,
    #[serde(default)]
    pub driver: Option<String>,
}

impl Manifest {
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("invalid YAML manifest")
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("invalid JSON manifest")
    }

    /// Every page name the manifest refers to, error page included, deduplicated
    #[must_use]
    pub fn page_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .actions
            .iter()
            .flatten()
            .filter_map(|entry| entry.page.as_deref())
            .chain(self.error.as_ref().map(|error| error.page.as_str()))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Every driver name the manifest refers to, deduplicated
    #[must_use]
    pub fn driver_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .actions
            .iter()
            .flatten()
            .filter_map(|entry| entry.driver.as_deref())
            .chain(
                self.error
                    .as_ref()
                    .and_then(|error| error.driver.as_deref()),
            )
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// The declared initial state, or `S::default()` when none is given
    pub fn initial_state<S>(&self) -> anyhow::Result<S>
    where
        S: DeserializeOwned + Default,
    {
        match &self.initial_state {
            Some(value) => serde_json::from_value(value.clone())
                .context("initial_state does not match the application state type"),
            None => Ok(S::default()),
        }
    }
}

/// Load a manifest from a `.yaml`/`.yml` or JSON file
pub fn load_manifest(path: impl AsRef<Path>) -> anyhow::Result<Manifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    let manifest = if is_yaml {
        Manifest::from_yaml_str(&content)
    } else {
        Manifest::from_json_str(&content)
    }
    .with_context(|| format!("failed to parse manifest {}", path.display()))?;

    info!(
        manifest = %path.display(),
        actions = manifest.actions.len(),
        mountpath = manifest.mountpath.as_deref().unwrap_or("/"),
        "Manifest loaded"
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_with_null_entry_and_aliases() {
        let manifest = Manifest::from_yaml_str(
            r#"
mountpath: /blog
actionConfigs:
  - path: /post/:id
    page: post
  - null
error:
  page: oops
initialState:
  count: 3
"#,
        )
        .unwrap();
        assert_eq!(manifest.mountpath.as_deref(), Some("/blog"));
        assert_eq!(manifest.actions.len(), 2);
        assert_eq!(
            manifest.actions[0].as_ref().unwrap().route.as_deref(),
            Some("/post/:id")
        );
        assert!(manifest.actions[1].is_none());
        assert_eq!(manifest.page_names(), vec!["oops", "post"]);
    }

    #[test]
    fn test_json_manifest() {
        let manifest = Manifest::from_json_str(
            r#"{"actions":[{"route":"/","page":"home","driver":"feed","initial":true}]}"#,
        )
        .unwrap();
        let entry = manifest.actions[0].as_ref().unwrap();
        assert!(entry.initial);
        assert_eq!(manifest.driver_names(), vec!["feed"]);
        assert!(manifest.error.is_none());
    }

    #[test]
    fn test_initial_state_defaults_when_absent() {
        #[derive(Debug, Default, PartialEq, Deserialize)]
        struct Counter {
            count: u32,
        }

        let manifest = Manifest::default();
        assert_eq!(manifest.initial_state::<Counter>().unwrap(), Counter::default());

        let manifest = Manifest::from_json_str(r#"{"initial_state":{"count":7}}"#).unwrap();
        assert_eq!(manifest.initial_state::<Counter>().unwrap().count, 7);
    }
}
