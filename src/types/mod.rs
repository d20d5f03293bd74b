//! Type tag registry

pub mod type_system;

pub use type_system::*;
