//! Type system utilities and aliases.
//!
//! This module provides type aliases used throughout the workspace.
//!
//! ## Modules
//!
//! - [`aliases`]: Item identifiers and callback types.

pub mod aliases;

pub use aliases::*;
