//! Core processing logic and orchestration.
//!
//! This module owns the run loop that walks item directories, repairs
//! their segments, and hands them to the external tools for reassembly.

/// Per-item orchestration: repair, classify, and reassemble.
pub mod item;

pub use item::{process_items, Item, Segment};
