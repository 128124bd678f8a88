//! Generic admin-post request routing.
//!
//! Every request fires `admin_init` first, then exactly one of
//! `admin_post`, `admin_post_{action}`, `admin_post_nopriv` or
//! `admin_post_nopriv_{action}`.

use tracing::debug;

use hookpress_core::result::AppResult;

use crate::hooks::definitions::{ADMIN_INIT, admin_post_hook};
use crate::hooks::registry::HookRegistry;

/// Routes an admin-post request and returns the hook it was routed to.
pub async fn route_admin_post(
    hooks: &HookRegistry,
    action: Option<&str>,
    authenticated: bool,
) -> AppResult<String> {
    hooks.dispatch_action(ADMIN_INIT, Vec::new()).await?;

    let hook = admin_post_hook(action, authenticated);
    debug!(hook = %hook, authenticated = authenticated, "Routing admin-post request");
    hooks.dispatch_action(&hook, Vec::new()).await?;

    Ok(hook)
}
