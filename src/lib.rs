//! pawnsym
//!
//! Symbol table and name resolution core for a Pawn compiler front end.

pub mod feedback;
pub mod frontend;
pub mod middle;
pub mod semantic;
pub mod types;
pub mod utils;

pub use feedback::{DiagCode, Diagnostic, Diagnostics, Options, Severity};
pub use frontend::events::Script;
pub use semantic::{Analysis, CompileContext, SemanticAnalyzer};
pub use utils::{Error, Result, TokenPos};
