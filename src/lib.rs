//! Greenhollow library crate: re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can drive capture, restore and scene transitions without needing a
//! window or GPU.

pub mod shared;
pub mod calendar;
pub mod farming;
pub mod economy;
pub mod world;
pub mod save;
pub mod data;
