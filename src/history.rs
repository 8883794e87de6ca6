//! # History Module
//!
//! The navigation-history collaborator: where the current location comes from and
//! how location changes are observed. A browser binding implements [`History`] on
//! top of the platform's history API; [`MemoryHistory`] is an in-process
//! implementation for tests, headless tools and embedded shells.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;
use url::Url;

/// A location inside the application
///
/// `search` and `hash` keep their leading `?` / `#` when present, as the browser
/// reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub hash: String,
}

impl Location {
    /// Parse either an absolute URL or an application-relative path
    ///
    /// ```
    /// use waypost::history::Location;
    ///
    /// let loc = Location::parse("https://myserver/blog/post/2?draft=1#top");
    /// assert_eq!(loc.pathname, "/blog/post/2");
    /// assert_eq!(loc.search, "?draft=1");
    /// assert_eq!(loc.hash, "#top");
    ///
    /// assert_eq!(Location::parse("post/2").pathname, "/post/2");
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let parsed = Url::parse(input).or_else(|_| {
            Url::parse("http://localhost/").and_then(|base| base.join(input))
        });
        match parsed {
            Ok(url) => Self {
                pathname: url.path().to_string(),
                search: url.query().map(|q| format!("?{q}")).unwrap_or_default(),
                hash: url.fragment().map(|h| format!("#{h}")).unwrap_or_default(),
            },
            Err(_) => Self {
                pathname: input.to_string(),
                ..Self::default()
            },
        }
    }
}

impl From<&str> for Location {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Callback invoked with the new location after every change
pub type Listener = Arc<dyn Fn(&Location) + Send + Sync>;

/// Handle for a registered listener; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F>(unsubscribe: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A subscription with nothing to undo
    pub fn empty() -> Self {
        Self { unsubscribe: None }
    }

    /// Unsubscribe now rather than on drop
    pub fn unsubscribe(mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// Source of locations and location-change events
pub trait History: Send + Sync {
    /// The current location
    fn location(&self) -> Location;
    /// Navigate to a new location, notifying listeners
    fn push(&self, path: &str);
    /// Replace the current location, notifying listeners
    fn replace(&self, path: &str);
    /// Observe location changes
    fn listen(&self, listener: Listener) -> Subscription;
}

struct MemoryInner {
    entries: Mutex<Vec<Location>>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
}

impl MemoryInner {
    fn notify(&self, location: &Location) {
        // Listeners may navigate again, so none of our locks are held while they run.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(location);
        }
    }
}

/// An in-memory history stack
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Arc<MemoryInner>,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                entries: Mutex::new(vec![Location::parse(initial)]),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    /// Every location visited so far, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<Location> {
        self.inner.entries.lock().clone()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// Step back one entry; returns `false` at the start of the stack
    pub fn back(&self) -> bool {
        let current = {
            let mut entries = self.inner.entries.lock();
            if entries.len() < 2 {
                return false;
            }
            entries.pop();
            entries.last().cloned().unwrap_or_default()
        };
        debug!(location = %current, "History back");
        self.inner.notify(&current);
        true
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        self.inner
            .entries
            .lock()
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn push(&self, path: &str) {
        let location = Location::parse(path);
        self.inner.entries.lock().push(location.clone());
        debug!(location = %location, "History push");
        self.inner.notify(&location);
    }

    fn replace(&self, path: &str) {
        let location = Location::parse(path);
        {
            let mut entries = self.inner.entries.lock();
            entries.pop();
            entries.push(location.clone());
        }
        debug!(location = %location, "History replace");
        self.inner.notify(&location);
    }

    fn listen(&self, listener: Listener) -> Subscription {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, listener));
        let weak: Weak<MemoryInner> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.lock().retain(|(lid, _)| *lid != id);
            }
        })
    }
}
