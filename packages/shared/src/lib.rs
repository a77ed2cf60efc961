//! Utilities shared between the Tsunagi packages.

pub mod logger;
pub mod time;
