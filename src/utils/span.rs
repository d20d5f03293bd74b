//! Source position tracking

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a token in the source, as reported with diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenPos {
    /// File ID
    pub file: u32,
    /// 1-based line number
    pub line: u32,
    /// 1-based column
    pub col: u32,
}

impl TokenPos {
    /// Create a new position
    pub fn new(file: u32, line: u32, col: u32) -> Self {
        Self { file, line, col }
    }

    /// Create a dummy position (for builtins and tests)
    pub fn dummy() -> Self {
        Self { file: 0, line: 0, col: 0 }
    }

    /// Check if this is the dummy position
    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }
}

impl Default for TokenPos {
    fn default() -> Self {
        Self::dummy()
    }
}

impl fmt::Display for TokenPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
