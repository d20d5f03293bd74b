//! Frontend module - Declarations, operator tokens and event scripts

pub mod decl;
pub mod events;
pub mod token;
