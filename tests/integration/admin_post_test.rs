//! Integration tests for admin-post routing.

use hookpress_hooks::{HookRegistry, route_admin_post};

use crate::helpers::CallLog;

fn registry_with_routes(log: &CallLog) -> HookRegistry {
    let hooks = HookRegistry::new();
    for hook in [
        "admin_init",
        "admin_post",
        "admin_post_export",
        "admin_post_nopriv",
        "admin_post_nopriv_export",
    ] {
        hooks.add_default(hook, log.recorder(hook, hook)).unwrap();
    }
    hooks
}

#[tokio::test]
async fn test_authenticated_with_action() {
    let log = CallLog::new();
    let hooks = registry_with_routes(&log);

    let routed = route_admin_post(&hooks, Some("export"), true).await.unwrap();
    assert_eq!(routed, "admin_post_export");
    assert_eq!(log.entries(), vec!["admin_init", "admin_post_export"]);
}

#[tokio::test]
async fn test_authenticated_without_action() {
    let log = CallLog::new();
    let hooks = registry_with_routes(&log);

    route_admin_post(&hooks, Some(""), true).await.unwrap();
    assert_eq!(log.entries(), vec!["admin_init", "admin_post"]);
}

#[tokio::test]
async fn test_anonymous_routes_to_nopriv() {
    let log = CallLog::new();
    let hooks = registry_with_routes(&log);

    route_admin_post(&hooks, None, false).await.unwrap();
    route_admin_post(&hooks, Some("export"), false).await.unwrap();
    assert_eq!(
        log.entries(),
        vec![
            "admin_init",
            "admin_post_nopriv",
            "admin_init",
            "admin_post_nopriv_export",
        ]
    );
}

#[tokio::test]
async fn test_unregistered_action_is_noop() {
    let log = CallLog::new();
    let hooks = registry_with_routes(&log);

    let routed = route_admin_post(&hooks, Some("import"), true).await.unwrap();
    assert_eq!(routed, "admin_post_import");
    assert_eq!(log.entries(), vec!["admin_init"]);
    assert_eq!(hooks.fired_count("admin_post_import"), 1);
}
