//! # Adapters Layer (Outer Hexagon)
//!
//! In-process implementations of the driven ports.

pub mod counter_store;
pub mod event_sink;

pub use counter_store::*;
pub use event_sink::*;
