//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Port (Inbound)**: `StateSenderApi`
//! - **Driven Ports (Outbound)**: `CounterStore`, `EventSink`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
