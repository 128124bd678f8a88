//! Integration tests for re-entrant dispatch and mutation during dispatch.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};

use hookpress_hooks::{AsyncFnHandler, FnHandler, HookRegistry};

use crate::helpers::CallLog;

#[tokio::test]
async fn test_content_filter_applies_nested_filter() {
    let hooks = HookRegistry::new();

    // the_title is filtered from inside the_content
    hooks
        .add_default(
            "the_title",
            FnHandler::wrap("title::upper", |call| {
                Ok(json!(call.value().as_str().unwrap_or_default().to_uppercase()))
            }),
        )
        .unwrap();
    hooks
        .add(
            "the_content",
            AsyncFnHandler::wrap("content::prepend_title", |call| {
                Box::pin(async move {
                    let title = call.arg(1).cloned().unwrap_or(Value::Null);
                    let title = call
                        .registry
                        .dispatch_filter("the_title", title, Vec::new())
                        .await?;
                    let body = call.value().as_str().unwrap_or_default();
                    Ok(json!(format!("{}: {body}", title.as_str().unwrap_or_default())))
                })
            }),
            10,
            2,
        )
        .unwrap();
    hooks
        .add(
            "the_content",
            FnHandler::wrap("content::trim", |call| {
                Ok(json!(call.value().as_str().unwrap_or_default().trim()))
            }),
            20,
            1,
        )
        .unwrap();

    let out = hooks
        .dispatch_filter("the_content", json!("  hello  "), vec![json!("greeting")])
        .await
        .unwrap();
    assert_eq!(out, json!("GREETING:   hello"));
}

#[tokio::test]
async fn test_nested_same_hook_sees_mutations_of_outer_callback() {
    let log = CallLog::new();
    let hooks = HookRegistry::new();
    let passes = Arc::new(AtomicUsize::new(0));

    hooks.add("save", log.recorder("first", "first"), 10, 1).unwrap();
    let reenter = {
        let log = log.clone();
        let passes = passes.clone();
        AsyncFnHandler::wrap("reenter", move |call| {
            let log = log.clone();
            let passes = passes.clone();
            Box::pin(async move {
                log.push("reenter");
                if passes.fetch_add(1, Ordering::SeqCst) == 0 {
                    // removed before the nested pass: neither pass runs it
                    call.registry.remove(call.hook, "third", 30);
                    call.registry
                        .add(call.hook, log.recorder("fourth", "fourth"), 40, 1)?;
                    call.registry.dispatch_action(call.hook, Vec::new()).await?;
                }
                Ok(Value::Null)
            })
        })
    };
    hooks.add("save", reenter, 20, 1).unwrap();
    hooks.add("save", log.recorder("third", "third"), 30, 1).unwrap();

    hooks.dispatch_action("save", Vec::new()).await.unwrap();

    assert_eq!(
        log.entries(),
        vec!["first", "reenter", "first", "reenter", "fourth", "fourth"]
    );
    assert_eq!(hooks.callback_count("save"), 3);
    assert_eq!(hooks.fired_count("save"), 2);
}

#[tokio::test]
async fn test_unrelated_hook_mutation_during_dispatch() {
    let log = CallLog::new();
    let hooks = HookRegistry::new();

    let installer = {
        let log = log.clone();
        FnHandler::wrap("installer", move |call| {
            call.registry
                .add("wp_loaded", log.recorder("late", "late"), 10, 1)?;
            Ok(Value::Null)
        })
    };
    hooks.add("init", installer, 10, 1).unwrap();

    hooks.dispatch_action("init", Vec::new()).await.unwrap();
    hooks.dispatch_action("wp_loaded", Vec::new()).await.unwrap();
    assert_eq!(log.entries(), vec!["late"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_spawned_dispatches_share_registry() {
    let hooks = Arc::new(HookRegistry::new());
    let log = CallLog::new();

    for hook in ["save_post", "publish_post"] {
        let log = log.clone();
        hooks
            .add(
                hook,
                AsyncFnHandler::wrap(format!("{hook}::record"), move |call| {
                    let log = log.clone();
                    Box::pin(async move {
                        tokio::task::yield_now().await;
                        let current = call.registry.current_hook().unwrap_or_default();
                        log.push(format!("{} in {current}", call.hook));
                        Ok(Value::Null)
                    })
                }),
                10,
                0,
            )
            .unwrap();
    }

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let hooks = hooks.clone();
            let hook = if i % 2 == 0 { "save_post" } else { "publish_post" };
            tokio::spawn(async move { hooks.dispatch_action(hook, Vec::new()).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let entries = log.entries();
    assert_eq!(entries.len(), 8);
    assert!(
        entries
            .iter()
            .all(|e| e == "save_post in save_post" || e == "publish_post in publish_post")
    );
    assert_eq!(hooks.fired_count("save_post"), 4);
    assert!(hooks.dispatch_stack().is_empty());
}
