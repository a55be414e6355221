//! Logging facilities for Veneer.
//!
//! Veneer uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core plumbing target.
    pub const CORE: &str = "veneer_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "veneer_core::signal";
    /// Tree model target.
    pub const TREE_MODEL: &str = "veneer::tree";
    /// Check-state propagation target.
    pub const CHECK: &str = "veneer::tree::check";
    /// Hit-testing target.
    pub const HIT_TEST: &str = "veneer::tree::hit_test";
    /// Drag-and-drop session target.
    pub const DRAG: &str = "veneer::tree::drag";
}

/// Macros for common tracing patterns.
///
/// These are re-exported for convenience but are just wrappers around the
/// `tracing` crate macros with consistent target naming.
#[macro_export]
macro_rules! veneer_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "veneer_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! veneer_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "veneer_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! veneer_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "veneer_core", $($arg)*)
    };
}
