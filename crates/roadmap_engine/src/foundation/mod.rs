//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Handle types for the shape arena
//! - Time oracle used to budget queries
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
