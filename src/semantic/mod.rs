//! Semantic module - Symbol table, scopes and name resolution

pub mod analyzer;
pub mod context;
pub mod enum_struct;
pub mod factory;
pub mod operator;
pub mod resolve;
pub mod scope;
pub mod symbol;
pub mod unused;
pub mod usage;

pub use analyzer::{Analysis, SemanticAnalyzer};
pub use context::CompileContext;
pub use resolve::NameStatus;
