//! Well-known hook names fired by the host.

use serde::{Deserialize, Serialize};

/// Filter deciding whether the advanced cache drop-in is loaded.
pub const ENABLE_ADVANCED_CACHE_FILTER: &str = "enable_loading_advanced_cache_dropin";

/// Fired at the start of every admin request.
pub const ADMIN_INIT: &str = "admin_init";
/// Fired for an authenticated admin-post request without an action.
pub const ADMIN_POST: &str = "admin_post";
/// Fired for an unauthenticated admin-post request without an action.
pub const ADMIN_POST_NOPRIV: &str = "admin_post_nopriv";

/// Request bootstrap stages, in the order they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapStage {
    /// Fired once all must-use plugins have loaded.
    MuPluginsLoaded,
    /// Fired once all regular plugins have loaded.
    PluginsLoaded,
    /// Fired before cookie values are sanitized.
    SanitizeCommentCookies,
    /// Fired before the theme is loaded.
    SetupTheme,
    /// Fired after the theme is loaded.
    AfterSetupTheme,
    /// Fired once the application has finished loading but before output.
    Init,
    /// Fired once everything is loaded and instantiated.
    Loaded,
}

impl BootstrapStage {
    /// All stages in firing order.
    pub const ALL: [BootstrapStage; 7] = [
        Self::MuPluginsLoaded,
        Self::PluginsLoaded,
        Self::SanitizeCommentCookies,
        Self::SetupTheme,
        Self::AfterSetupTheme,
        Self::Init,
        Self::Loaded,
    ];

    /// Returns the hook name of this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MuPluginsLoaded => "muplugins_loaded",
            Self::PluginsLoaded => "plugins_loaded",
            Self::SanitizeCommentCookies => "sanitize_comment_cookies",
            Self::SetupTheme => "setup_theme",
            Self::AfterSetupTheme => "after_setup_theme",
            Self::Init => "init",
            Self::Loaded => "wp_loaded",
        }
    }
}

impl std::fmt::Display for BootstrapStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the admin-post hook for a request.
///
/// `action` is the requested action; an empty action counts as none.
pub fn admin_post_hook(action: Option<&str>, authenticated: bool) -> String {
    let base = if authenticated {
        ADMIN_POST
    } else {
        ADMIN_POST_NOPRIV
    };
    match action.filter(|a| !a.is_empty()) {
        Some(action) => format!("{base}_{action}"),
        None => base.to_string(),
    }
}
