#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

use waypost::app::{mount, Router};
use waypost::config::{ActionConfig, AppConfig};
use waypost::driver::{Action, Driver, DriverTask};
use waypost::history::MemoryHistory;
use waypost::render::{Renderer, TaskQueue};
use waypost::router::PageContext;
use waypost::store::Store;

pub const POST_LOADED: &str = "POST_LOADED";
pub const SIDEBAR_LOADED: &str = "SIDEBAR_LOADED";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogState {
    pub post: Option<String>,
    pub loads: usize,
    pub sidebar_loads: usize,
}

/// Loads a post in the background, then reduces it into the state
pub fn post_driver() -> Driver<BlogState> {
    Driver::new(POST_LOADED)
        .with_reducer(|state: Arc<BlogState>, action| {
            let mut next = (*state).clone();
            next.post = action.payload()["id"].as_str().map(String::from);
            next.loads += 1;
            Arc::new(next)
        })
        .on_activate_async(|dispatch, params| async move {
            let id = params.get("id").unwrap_or_default().to_string();
            dispatch.send(Action::new(POST_LOADED).with_payload(json!({ "id": id })));
        })
}

/// In-page driver that loads synchronously
pub fn sidebar_driver() -> Driver<BlogState> {
    Driver::new(SIDEBAR_LOADED)
        .with_reducer(|state: Arc<BlogState>, _action| {
            let mut next = (*state).clone();
            next.sidebar_loads += 1;
            Arc::new(next)
        })
        .on_activate(|dispatch, _params| {
            dispatch.send(Action::new(SIDEBAR_LOADED));
            DriverTask::Done
        })
}

pub fn post_page(ctx: &PageContext<'_, BlogState>) -> anyhow::Result<String> {
    let state = ctx.state();
    Ok(format!(
        "post {} ({})",
        ctx.param("id").unwrap_or("?"),
        state.post.as_deref().unwrap_or("loading")
    ))
}

pub fn broken_page(_ctx: &PageContext<'_, BlogState>) -> anyhow::Result<String> {
    anyhow::bail!("template exploded")
}

pub fn error_page(ctx: &PageContext<'_, BlogState>) -> anyhow::Result<String> {
    Ok(match ctx.error {
        Some(err) => format!("error {} {}", err.status(), err.path()),
        None => "error".to_string(),
    })
}

pub fn blog_config() -> AppConfig<BlogState, String> {
    AppConfig::new(BlogState::default())
        .mountpath("/blog")
        .action(
            ActionConfig::routed("/")
                .with_name("home")
                .with_page(|_| Ok("home".to_string())),
        )
        .action(
            ActionConfig::routed("/post/:id")
                .with_name("post")
                .with_page(post_page)
                .with_driver(post_driver),
        )
        .action(ActionConfig::routed("/broken").with_page(broken_page))
        .action(ActionConfig::in_page().with_driver(sidebar_driver).initial())
        .error_page(error_page)
}

/// Every view handed to the renderer, in order
#[derive(Clone, Default)]
pub struct Views(Arc<Mutex<Vec<String>>>);

impl Views {
    pub fn renderer(&self) -> Arc<dyn Renderer<String>> {
        let views = Arc::clone(&self.0);
        Arc::new(move |view: String| views.lock().push(view))
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.0.lock().last().cloned()
    }

    pub fn count(&self, view: &str) -> usize {
        self.0.lock().iter().filter(|v| v.as_str() == view).count()
    }
}

pub struct Harness {
    pub history: MemoryHistory,
    pub views: Views,
    pub tasks: TaskQueue,
    pub router: Arc<Router<BlogState, String>>,
}

impl Harness {
    pub fn state(&self) -> Arc<BlogState> {
        self.router.store().state()
    }
}

pub fn mount_config(config: AppConfig<BlogState, String>, initial: &str) -> Harness {
    let history = MemoryHistory::new(initial);
    let views = Views::default();
    let tasks = TaskQueue::new();
    let router = mount(
        config,
        Arc::new(history.clone()),
        views.renderer(),
        Arc::new(tasks.clone()),
    )
    .unwrap();
    Harness {
        history,
        views,
        tasks,
        router,
    }
}

pub fn mount_blog(initial: &str) -> Harness {
    mount_config(blog_config(), initial)
}
