//! # Domain Layer (Inner Hexagon)
//!
//! Pure state sender logic.
//! NO I/O, NO async.

pub mod abi;
pub mod entities;
pub mod invariants;
pub mod relay;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use relay::*;
pub use services::*;
pub use value_objects::*;
