//! Operator tokens that may be overloaded

use std::fmt;

/// An overloadable operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorToken {
    // ============ Arithmetic ============
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ++
    Increment,
    /// --
    Decrement,

    // ============ Comparison ============
    /// ==
    EqEq,
    /// !=
    NotEq,
    /// <
    Lt,
    /// >
    Gt,
    /// <=
    LtEq,
    /// >=
    GtEq,

    // ============ Unary ============
    /// !
    Bang,
    /// ~
    Tilde,

    // ============ Assignment ============
    /// =
    Eq,
}

impl OperatorToken {
    /// Parse an operator from its source spelling
    pub fn from_symbol(s: &str) -> Option<OperatorToken> {
        match s {
            "+" => Some(OperatorToken::Plus),
            "-" => Some(OperatorToken::Minus),
            "*" => Some(OperatorToken::Star),
            "/" => Some(OperatorToken::Slash),
            "%" => Some(OperatorToken::Percent),
            "++" => Some(OperatorToken::Increment),
            "--" => Some(OperatorToken::Decrement),
            "==" => Some(OperatorToken::EqEq),
            "!=" => Some(OperatorToken::NotEq),
            "<" => Some(OperatorToken::Lt),
            ">" => Some(OperatorToken::Gt),
            "<=" => Some(OperatorToken::LtEq),
            ">=" => Some(OperatorToken::GtEq),
            "!" => Some(OperatorToken::Bang),
            "~" => Some(OperatorToken::Tilde),
            "=" => Some(OperatorToken::Eq),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorToken::Plus => "+",
            OperatorToken::Minus => "-",
            OperatorToken::Star => "*",
            OperatorToken::Slash => "/",
            OperatorToken::Percent => "%",
            OperatorToken::Increment => "++",
            OperatorToken::Decrement => "--",
            OperatorToken::EqEq => "==",
            OperatorToken::NotEq => "!=",
            OperatorToken::Lt => "<",
            OperatorToken::Gt => ">",
            OperatorToken::LtEq => "<=",
            OperatorToken::GtEq => ">=",
            OperatorToken::Bang => "!",
            OperatorToken::Tilde => "~",
            OperatorToken::Eq => "=",
        }
    }

    /// Operators whose result is a truth value
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            OperatorToken::Bang
                | OperatorToken::Lt
                | OperatorToken::Gt
                | OperatorToken::EqEq
                | OperatorToken::NotEq
                | OperatorToken::LtEq
                | OperatorToken::GtEq
        )
    }
}

impl fmt::Display for OperatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_parse_back() {
        for sym in ["+", "==", "<=", "!", "~", "--"] {
            let op = OperatorToken::from_symbol(sym).unwrap();
            assert_eq!(op.symbol(), sym);
        }
        assert!(OperatorToken::from_symbol("<<<").is_none());
    }

    #[test]
    fn test_relational_set() {
        assert!(OperatorToken::Bang.is_relational());
        assert!(OperatorToken::GtEq.is_relational());
        assert!(!OperatorToken::Tilde.is_relational());
        assert!(!OperatorToken::Plus.is_relational());
    }
}
