//! Utility module

mod span;
mod error;

pub use span::TokenPos;
pub use error::{Error, Result};
