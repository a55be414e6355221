//! Core plumbing for the Veneer control layer.
//!
//! This crate provides the foundational pieces shared by every Veneer
//! control:
//!
//! - **Signal/Slot System**: Type-safe notification between a control and its
//!   host application. Each control owns its signals; there are no global
//!   handler tables.
//! - **Logging**: `tracing` target names for per-subsystem filtering.
//!
//! # Signal/Slot Example
//!
//! ```
//! use veneer_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use signal::{ConnectionId, Signal};
