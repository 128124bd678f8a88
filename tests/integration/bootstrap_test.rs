//! Integration tests for the request bootstrap sequence.

use serde_json::{Value, json};

use hookpress_core::config::plugin::PluginConfig;
use hookpress_core::error::{AppError, ErrorKind};
use hookpress_hooks::{Bootstrap, BootstrapStage, FnHandler, HookRegistry, PluginRegistry};

use crate::helpers::{CallLog, RecordingPlugin};

#[tokio::test]
async fn test_must_use_plugins_load_before_regular_plugins() {
    let log = CallLog::new();
    let hooks = HookRegistry::new();
    let plugins = PluginRegistry::new();

    plugins
        .register(RecordingPlugin::new("mu", &["muplugins_loaded", "init"], &log))
        .await
        .unwrap();
    plugins
        .register(RecordingPlugin::new("seo", &["plugins_loaded", "init"], &log))
        .await
        .unwrap();

    let config = PluginConfig {
        must_use: vec!["mu".to_string()],
        enabled: vec!["seo".to_string()],
    };
    let report = Bootstrap::new(&hooks, &plugins).run(&config).await.unwrap();

    assert_eq!(
        log.entries(),
        vec![
            "load:mu",
            "mu@muplugins_loaded",
            "load:seo",
            "seo@plugins_loaded",
            "mu@init",
            "seo@init",
        ]
    );
    assert_eq!(report.must_use_loaded, vec!["mu"]);
    assert_eq!(report.plugins_loaded, vec!["seo"]);
    assert_eq!(report.stages.last(), Some(&BootstrapStage::Loaded));
}

#[tokio::test]
async fn test_plugin_loaded_late_misses_earlier_stage() {
    let log = CallLog::new();
    let hooks = HookRegistry::new();
    let plugins = PluginRegistry::new();

    plugins
        .register(RecordingPlugin::new("late", &["muplugins_loaded", "wp_loaded"], &log))
        .await
        .unwrap();

    let config = PluginConfig {
        must_use: Vec::new(),
        enabled: vec!["late".to_string()],
    };
    Bootstrap::new(&hooks, &plugins).run(&config).await.unwrap();

    assert_eq!(log.entries(), vec!["load:late", "late@wp_loaded"]);
}

#[tokio::test]
async fn test_callback_error_stops_bootstrap() {
    let log = CallLog::new();
    let hooks = HookRegistry::new();
    let plugins = PluginRegistry::new();

    hooks
        .add(
            "setup_theme",
            FnHandler::wrap("theme::missing", |_| {
                Err(AppError::callback("theme directory missing"))
            }),
            10,
            1,
        )
        .unwrap();
    hooks
        .add_default("init", log.recorder("init_marker", "init"))
        .unwrap();

    let err = Bootstrap::new(&hooks, &plugins)
        .run(&PluginConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Callback);
    assert_eq!(err.message, "theme directory missing");
    assert!(log.entries().is_empty());
    assert_eq!(hooks.fired_count("init"), 0);
    assert!(hooks.dispatch_stack().is_empty());
}

#[tokio::test]
async fn test_init_callback_sees_stage_as_current_hook() {
    let hooks = HookRegistry::new();
    let plugins = PluginRegistry::new();
    let seen = CallLog::new();

    let observer = {
        let seen = seen.clone();
        FnHandler::wrap("current_observer", move |call| {
            seen.push(call.registry.current_hook().unwrap_or_default());
            Ok(Value::Null)
        })
    };
    hooks.add_default("init", observer).unwrap();

    Bootstrap::new(&hooks, &plugins)
        .run(&PluginConfig::default())
        .await
        .unwrap();
    assert_eq!(seen.entries(), vec!["init"]);
    assert!(hooks.current_hook().is_none());
}

#[tokio::test]
async fn test_advanced_cache_filter_non_bool_disables() {
    let hooks = HookRegistry::new();
    let plugins = PluginRegistry::new();
    hooks
        .add_default(
            "enable_loading_advanced_cache_dropin",
            FnHandler::wrap("cache::toggle", |_| Ok(json!("maybe"))),
        )
        .unwrap();

    let report = Bootstrap::new(&hooks, &plugins)
        .run(&PluginConfig::default())
        .await
        .unwrap();
    assert!(!report.advanced_cache);
}
