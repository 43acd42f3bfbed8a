//! # Reachr Common
//!
//! Shared vocabulary of the reachr workspace: the host targets a check is
//! pointed at, the feature tags and boot state that decide whether a check
//! applies, the result of a shell invocation and the outcome of a check.
//!
//! The logging macros below are the only way library crates should emit
//! user-facing messages. The cli decides how they are rendered.

pub mod command;
pub mod config;
pub mod environment;
pub mod feature;
pub mod network;
pub mod outcome;

#[doc(hidden)]
pub use tracing as __tracing;

/// Target used by [`success!`] so formatters can tell it apart from plain info.
pub const SUCCESS_TARGET: &str = "reachr::success";

/// Target used for raw, pre-formatted terminal lines.
pub const PRINT_TARGET: &str = "reachr::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "reachr::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
