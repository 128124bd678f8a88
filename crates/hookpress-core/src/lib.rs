//! # hookpress-core
//!
//! Core crate for HookPress. Contains configuration schemas and the unified
//! error system shared by the hook engine, plugins and the host binary.
//!
//! This crate has **no** internal dependencies on other HookPress crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
