//! Unit tests module organization

pub mod stats;

// Test utilities and helpers
pub mod helpers;
