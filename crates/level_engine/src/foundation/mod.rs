//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the interpreter:
//! - Math types
//! - Handle-based collections
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
