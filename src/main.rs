//! HookPress host: boots a hook registry the way a request would.
//!
//! Loads configuration, initialises logging, registers the compiled-in
//! plugins and runs the bootstrap sequence.

mod plugins;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use hookpress_core::config::AppConfig;
use hookpress_core::error::AppError;
use hookpress_hooks::{Bootstrap, HookRegistry, PluginRegistry};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Bootstrap failed: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("HOOKPRESS_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Register plugins and run the bootstrap stages
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting HookPress v{}", env!("CARGO_PKG_VERSION"));

    let hooks = HookRegistry::with_config(&config.hooks);
    let plugin_registry = PluginRegistry::new();
    plugin_registry
        .register(Arc::new(plugins::LifecycleLog))
        .await?;

    let mut plugin_config = config.plugins.clone();
    if !plugin_config.must_use.iter().any(|id| id == plugins::LIFECYCLE_LOG_ID) {
        plugin_config.must_use.insert(0, plugins::LIFECYCLE_LOG_ID.to_string());
    }

    let report = Bootstrap::new(&hooks, &plugin_registry).run(&plugin_config).await?;

    tracing::info!(
        report = %serde_json::to_string(&report)?,
        hooks = hooks.registered_hooks().len(),
        "HookPress ready"
    );

    Ok(())
}
