//! Status macros.
//!
//! Thin wrappers over `tracing` so every crate reports progress the same way.
//! `success!` logs at INFO under the `camscout::success` target, which the CLI
//! formatter renders with its own marker.

pub const SUCCESS_TARGET: &str = "camscout::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "camscout::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}
