//! Integration tests for the HookPress hook engine.

mod admin_post_test;
mod bootstrap_test;
mod helpers;
mod reentrancy_test;
