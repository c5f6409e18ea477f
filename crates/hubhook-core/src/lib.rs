//! # hubhook-core
//!
//! Core crate for hubhook. Contains the configuration schemas and the
//! unified error system shared by the dispatcher and the console host.
//!
//! This crate has **no** internal dependencies on other hubhook crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
