//! Shared models and configuration for the camscout workspace.
//!
//! * [`device`]: the inventory records produced by a device query.
//! * [`config`]: runtime settings and credentials, built by the CLI.
//! * Status macros ([`info!`], [`success!`], [`warn!`]) used across crates.

pub mod config;
pub mod device;
pub mod log;

#[doc(hidden)]
pub use tracing as __tracing;
