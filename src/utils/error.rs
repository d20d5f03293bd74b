//! Error handling for pawnsym
//!
//! These are internal invariant violations, not user diagnostics. Redefinition,
//! shadowing and similar user-facing problems go through
//! [`crate::feedback::Diagnostics`] and never surface as an `Error`.

use crate::utils::TokenPos;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Symbol table error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ==================== Construction Errors ====================

    #[error("Symbol for declaration #{decl} constructed with an invalid identifier kind")]
    InvalidIdentifierKind { decl: usize },

    #[error("Declaration `{name}` already owns a symbol")]
    SymbolAlreadyAttached { name: String, pos: TokenPos },

    // ==================== Scope Errors ====================

    #[error("Storage class {storage} cannot be redirected out of a file-static scope for `{name}`")]
    BadFileStaticRedirect {
        name: String,
        storage: String,
        pos: TokenPos,
    },

    #[error("File-static scope is not a direct child of the global scope")]
    OrphanFileStatic,

    #[error("Name `{name}` is already bound in this scope")]
    AlreadyBound { name: String },

    #[error("Cannot leave the global scope")]
    ScopeUnderflow,

    #[error("Mismatched scope exit: expected {expected}, found {found}")]
    ScopeMismatch { expected: String, found: String },

    // ==================== Context Errors ====================

    #[error("No active function")]
    NoActiveFunction,

    #[error("`{name}` is not a function")]
    NotAFunction { name: String, pos: TokenPos },

    #[error("Unknown type tag: {0}")]
    UnknownTag(String),

    // ==================== Input Errors ====================

    #[error("Invalid event script: {0}")]
    Script(String),

    #[error("Storage for `{name}` exceeds the addressable range")]
    StorageOverflow { name: String, pos: TokenPos },
}

impl Error {
    /// Get the position associated with this error
    pub fn pos(&self) -> Option<TokenPos> {
        match self {
            Self::SymbolAlreadyAttached { pos, .. } => Some(*pos),
            Self::BadFileStaticRedirect { pos, .. } => Some(*pos),
            Self::NotAFunction { pos, .. } => Some(*pos),
            Self::StorageOverflow { pos, .. } => Some(*pos),
            Self::InvalidIdentifierKind { .. }
            | Self::AlreadyBound { .. }
            | Self::OrphanFileStatic
            | Self::ScopeUnderflow
            | Self::ScopeMismatch { .. }
            | Self::NoActiveFunction
            | Self::UnknownTag(_)
            | Self::Script(_) => None,
        }
    }
}
