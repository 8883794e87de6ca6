mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{
    blog_config, error_page, mount_blog, mount_config, post_driver, BlogState, Views,
    POST_LOADED,
};
use serde_json::json;
use waypost::app::{mount, mount_with_store, NavigationState};
use waypost::config::{ActionConfig, AppConfig};
use waypost::driver::{Action, Driver};
use waypost::error::{ConfigurationError, FatalResolutionError, NavigationError};
use waypost::history::{History, Location, MemoryHistory};
use waypost::middleware::{Enhancer, MetricsEnhancer};
use waypost::render::{TaskQueue, TokioSpawner};
use waypost::store::{MemoryStore, Store};

#[test]
fn test_initial_location_renders_then_activates() {
    let harness = mount_blog("/blog/post/7");

    // The page renders before its data arrives.
    assert_eq!(harness.views.all(), vec!["post 7 (loading)".to_string()]);
    assert_eq!(harness.tasks.len(), 1);
    assert_eq!(harness.state().post, None);

    assert_eq!(harness.tasks.run_until_idle(), 1);
    assert_eq!(harness.state().post.as_deref(), Some("7"));
    assert_eq!(harness.state().loads, 1);

    let state = harness.router.state();
    assert!(state.is_rendered());
    assert_eq!(state.route(), Some("/blog/post/:id"));
}

#[test]
fn test_initial_driver_activated_once() {
    let harness = mount_blog("/blog/");
    assert_eq!(harness.state().sidebar_loads, 1);

    harness.history.push("/blog/post/1");
    harness.history.push("/blog/");
    assert_eq!(harness.state().sidebar_loads, 1);

    // Restarting renders again but never re-activates the initial driver.
    let navigation = harness.router.start().unwrap().unwrap();
    assert_eq!(navigation.route, "/blog/");
    assert_eq!(harness.state().sidebar_loads, 1);
}

#[test]
fn test_history_changes_are_followed() {
    let harness = mount_blog("/blog");
    assert_eq!(harness.views.last().as_deref(), Some("home"));

    harness.history.push("/blog/post/hello%20world");
    assert_eq!(
        harness.views.last().as_deref(),
        Some("post hello world (loading)")
    );

    harness.history.back();
    assert_eq!(harness.views.last().as_deref(), Some("home"));
    assert_eq!(harness.views.all().len(), 3);
}

#[test]
fn test_unmatched_location_renders_error_page_once() {
    let harness = mount_blog("/blog");
    harness.history.push("/shop/cart");

    assert_eq!(harness.views.count("error 404 /shop/cart"), 1);
    assert_eq!(harness.views.all().len(), 2);
    let state = harness.router.state();
    assert!(state.is_fallback());
    assert_eq!(state.route(), Some("/blog/error"));
}

#[test]
fn test_failing_page_falls_back_with_500() {
    let harness = mount_blog("/blog");
    let navigation = harness
        .router
        .navigate(&Location::parse("/blog/broken"))
        .unwrap()
        .unwrap();

    assert_eq!(navigation.fallback, Some(500));
    assert_eq!(navigation.route, "/blog/error");
    assert!(navigation.params.is_empty());
    assert_eq!(harness.views.last().as_deref(), Some("error 500 /blog/broken"));
}

#[test]
fn test_error_route_is_directly_navigable() {
    let harness = mount_blog("/blog/error");
    assert_eq!(harness.views.all(), vec!["error".to_string()]);
    assert!(!harness.router.state().is_fallback());
}

#[test]
fn test_failing_error_page_is_fatal() {
    let config: AppConfig<BlogState, String> = AppConfig::new(BlogState::default())
        .action(ActionConfig::routed("/").with_page(|_| Ok("home".to_string())))
        .error_page(|_| anyhow::bail!("error page exploded"));
    let harness = mount_config(config, "/");

    let err = harness
        .router
        .navigate(&Location::parse("/missing"))
        .unwrap_err();
    assert!(matches!(err, FatalResolutionError::ErrorPageFailed { .. }));
    assert!(matches!(err.cause(), NavigationError::NotFound { path } if path == "/missing"));
    assert!(harness.router.state().is_fatal());
    assert_eq!(harness.views.all(), vec!["home".to_string()]);
}

#[test]
fn test_fatal_first_navigation_still_mounts() {
    let config: AppConfig<BlogState, String> = AppConfig::new(BlogState::default())
        .error_page(|_| anyhow::bail!("error page exploded"));
    let harness = mount_config(config, "/anything");
    assert!(harness.router.state().is_fatal());
    assert!(harness.views.all().is_empty());
}

#[test]
fn test_params_belong_to_their_navigation() {
    let harness = mount_blog("/blog/post/1");
    let first = harness
        .router
        .navigate(&Location::parse("/blog/post/2"))
        .unwrap()
        .unwrap();
    let second = harness
        .router
        .navigate(&Location::parse("/blog/"))
        .unwrap()
        .unwrap();

    assert_eq!(first.params.get("id"), Some("2"));
    assert!(second.params.is_empty());
    assert_ne!(first.id, second.id);
}

#[test]
fn test_superseded_task_is_aborted() {
    let harness = mount_blog("/blog/post/1");
    harness.history.push("/blog/post/2");
    assert_eq!(harness.tasks.len(), 2);

    harness.tasks.run_until_idle();
    let state = harness.state();
    assert_eq!(state.post.as_deref(), Some("2"));
    assert_eq!(state.loads, 1);
}

#[test]
fn test_superseded_task_kept_when_cancellation_disabled() {
    let harness = mount_config(blog_config().cancel_superseded(false), "/blog/post/1");
    harness.history.push("/blog/post/2");

    harness.tasks.run_until_idle();
    let state = harness.state();
    assert_eq!(state.loads, 2);
    assert_eq!(state.post.as_deref(), Some("2"));
}

#[test]
fn test_stop_unsubscribes_from_history() {
    let harness = mount_blog("/blog");
    assert_eq!(harness.history.listener_count(), 1);

    harness.router.stop();
    assert_eq!(harness.history.listener_count(), 0);
    harness.history.push("/blog/post/3");
    assert_eq!(harness.views.all(), vec!["home".to_string()]);
    assert!(matches!(
        harness.router.state(),
        NavigationState::Rendered { ref route, .. } if route == "/blog/"
    ));
}

#[test]
fn test_configuration_errors_surface_from_mount() {
    let history: Arc<dyn History> = Arc::new(MemoryHistory::default());
    let views = Views::default();

    let err = mount(
        blog_config().entry(None),
        Arc::clone(&history),
        views.renderer(),
        Arc::new(TaskQueue::new()),
    )
    .unwrap_err();
    assert_eq!(err, ConfigurationError::MissingEntry { index: 4 });

    let duplicate = blog_config().action(
        ActionConfig::routed("/again/:id")
            .with_page(common::post_page)
            .with_driver(post_driver),
    );
    let err = mount(duplicate, history, views.renderer(), Arc::new(TaskQueue::new()))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::DuplicateActionType {
            action_type: POST_LOADED.to_string()
        }
    );
    assert!(views.all().is_empty());
}

#[test]
fn test_custom_store_receives_reducer_and_enhancers() {
    let metrics = Arc::new(MetricsEnhancer::new());
    let shared = Arc::clone(&metrics);
    let config = blog_config().action(ActionConfig::in_page().with_driver(move || {
        let metrics = Arc::clone(&shared);
        Driver::new("METRICS")
            .with_enhancer(move |_| Arc::clone(&metrics) as Arc<dyn Enhancer<BlogState>>)
    }));

    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);
    let tasks = TaskQueue::new();
    let router = mount_with_store(
        config,
        Arc::new(MemoryHistory::new("/blog/post/9")),
        Views::default().renderer(),
        Arc::new(tasks.clone()),
        move |reducer, state, enhancers| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert!(reducer.handles(POST_LOADED));
            assert_eq!(enhancers.len(), 1);
            MemoryStore::new(reducer, state, enhancers) as Arc<dyn Store<BlogState>>
        },
    )
    .unwrap();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    // The initial sidebar load went through the enhancer.
    assert_eq!(metrics.dispatched(), 1);
    tasks.run_until_idle();
    assert_eq!(metrics.dispatched(), 2);
    assert_eq!(metrics.halted(), 0);
    assert_eq!(router.store().state().post.as_deref(), Some("9"));
}

fn redirect_config() -> AppConfig<BlogState, String> {
    AppConfig::new(BlogState::default())
        .action(ActionConfig::routed("/").with_page(|_| Ok("home".to_string())))
        .action(ActionConfig::routed("/old").with_page(|ctx| {
            ctx.history.replace("/new");
            Ok("old".to_string())
        }))
        .action(ActionConfig::routed("/new").with_page(|_| Ok("new".to_string())))
        .error_page(error_page)
}

#[test]
fn test_redirect_during_render_runs_after_current_navigation() {
    let harness = mount_config(redirect_config(), "/");
    harness.history.push("/old");

    assert_eq!(harness.history.location().pathname, "/new");
    assert_eq!(harness.views.all(), vec!["home", "old", "new"]);
    assert!(matches!(
        harness.router.state(),
        NavigationState::Rendered { ref path, ref route, .. } if path == "/new" && route == "/new"
    ));

    // The router accepts new navigations once the queue is drained.
    harness.history.push("/");
    assert_eq!(harness.views.last().as_deref(), Some("home"));
}

#[test]
fn test_redirect_supersedes_the_redirecting_route_task() {
    let config = blog_config().action(
        ActionConfig::routed("/moved/:id")
            .with_page(|ctx| {
                let target = format!("/blog/post/{}", ctx.param("id").unwrap_or_default());
                ctx.history.replace(&target);
                Ok("moved".to_string())
            })
            .with_driver(|| {
                Driver::new("MOVED").on_activate_async(|dispatch, _params| async move {
                    dispatch.send(Action::new(POST_LOADED).with_payload(json!({ "id": "stale" })));
                })
            }),
    );
    let harness = mount_config(config, "/blog");
    harness.history.push("/blog/moved/5");

    assert_eq!(
        harness.views.all(),
        vec!["home", "moved", "post 5 (loading)"]
    );
    assert_eq!(harness.tasks.len(), 2);
    harness.tasks.run_until_idle();

    let state = harness.state();
    assert_eq!(state.post.as_deref(), Some("5"));
    assert_eq!(state.loads, 1);
}

#[test]
fn test_later_matching_route_page_never_invoked() {
    let first = Arc::new(AtomicUsize::new(0));
    let later = Arc::new(AtomicUsize::new(0));
    let (first_calls, later_calls) = (Arc::clone(&first), Arc::clone(&later));
    let config = AppConfig::new(BlogState::default())
        .action(ActionConfig::routed("/post/:id").with_page(move |_| {
            first_calls.fetch_add(1, Ordering::SeqCst);
            Ok("by id".to_string())
        }))
        .action(ActionConfig::routed("/post/latest").with_page(move |_| {
            later_calls.fetch_add(1, Ordering::SeqCst);
            Ok("latest".to_string())
        }))
        .error_page(error_page);

    let harness = mount_config(config, "/post/latest");
    harness.history.push("/post/latest/");

    assert_eq!(first.load(Ordering::SeqCst), 2);
    assert_eq!(later.load(Ordering::SeqCst), 0);
    assert_eq!(harness.views.all(), vec!["by id", "by id"]);
}

#[tokio::test]
async fn test_tokio_spawner_runs_driver_tasks() {
    let spawner = TokioSpawner::current().expect("inside a tokio runtime");
    let views = Views::default();
    let router = mount(
        blog_config(),
        Arc::new(MemoryHistory::new("/blog/post/4")),
        views.renderer(),
        Arc::new(spawner),
    )
    .unwrap();
    assert_eq!(views.all(), vec!["post 4 (loading)"]);

    for _ in 0..100 {
        if router.store().state().post.is_some() {
            break;
        }
        tokio::task::yield_now().await;
    }
    let state = router.store().state();
    assert_eq!(state.post.as_deref(), Some("4"));
    assert_eq!(state.loads, 1);
}
