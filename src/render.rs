//! Rendering and task-spawning collaborators.
//!
//! The router never paints anything itself: it hands each page's view to a
//! [`Renderer`]. Likewise it never awaits a driver's background work: pending
//! [`DriverTask`](crate::driver::DriverTask)s go to a [`Spawner`].

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Paints a page's view into the document
///
/// Assumed synchronous; calling it twice with equal views has the same effect as
/// calling it once.
pub trait Renderer<V>: Send + Sync {
    fn render(&self, view: V);
}

impl<V, F> Renderer<V> for F
where
    F: Fn(V) + Send + Sync,
{
    fn render(&self, view: V) {
        self(view);
    }
}

/// Runs driver tasks independently of the navigation loop
pub trait Spawner: Send + Sync {
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// Spawns onto a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Spawner for the runtime the caller is running on
    ///
    /// Returns `None` outside a tokio runtime.
    #[must_use]
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Spawner for TokioSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        // The join handle is dropped: driver tasks report back only through dispatch.
        drop(self.handle.spawn(task));
    }
}

/// Collects tasks for the caller to drive, e.g. from a single-threaded event loop
#[derive(Default, Clone)]
pub struct TaskQueue {
    tasks: Arc<Mutex<Vec<BoxFuture<'static, ()>>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Take every queued task, oldest first
    #[must_use]
    pub fn drain(&self) -> Vec<BoxFuture<'static, ()>> {
        std::mem::take(&mut *self.tasks.lock())
    }

    /// Run queued tasks to completion on the current thread, including any queued
    /// while running; returns how many ran
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let batch = self.drain();
            if batch.is_empty() {
                return ran;
            }
            for task in batch {
                futures::executor::block_on(task);
                ran += 1;
            }
        }
    }
}

impl Spawner for TaskQueue {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.tasks.lock().push(task);
    }
}
