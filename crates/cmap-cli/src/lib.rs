//! CLI library components for the `cmap` terminology reconciler.

pub mod config;
pub mod logging;
pub mod pipeline;
