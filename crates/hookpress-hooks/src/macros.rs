//! Convenience macros for plugin development.

/// Macro for creating a plugin info struct.
///
/// # Example
/// ```rust,ignore
/// let info = plugin_info!(
///     id: "my-plugin",
///     name: "My Plugin",
///     version: "1.0.0"
/// );
/// ```
#[macro_export]
macro_rules! plugin_info {
    (
        id: $id:expr,
        name: $name:expr,
        version: $version:expr $(,)?
    ) => {
        $crate::prelude::PluginInfo {
            id: $id.to_string(),
            name: $name.to_string(),
            version: $version.to_string(),
        }
    };
    (
        id: $id:expr,
        name: $name:expr $(,)?
    ) => {
        $crate::plugin_info!(id: $id, name: $name, version: env!("CARGO_PKG_VERSION"))
    };
}
