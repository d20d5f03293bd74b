//! Operator overload result tag validation

use crate::feedback::DiagCode;
use crate::frontend::token::OperatorToken;
use crate::semantic::context::CompileContext;
use crate::types::TypeTag;
use crate::utils::TokenPos;

impl CompileContext {
    /// Check that an overload of `op` declares the result tag its operator
    /// category demands: comparisons and `!` must return `bool:`, `~` must be
    /// untyped. Reports error 63 and returns false otherwise; the caller
    /// decides how to carry on.
    pub fn check_operator_tag(&mut self, op: OperatorToken, result_tag: TypeTag, opername: &str, pos: TokenPos) -> bool {
        debug_assert!(!opername.is_empty());
        let required = if op.is_relational() {
            Some((self.types.tag_bool(), "bool:"))
        } else if op == OperatorToken::Tilde {
            Some((TypeTag::UNTYPED, "_:"))
        } else {
            None
        };
        match required {
            Some((tag, spelling)) if tag != result_tag => {
                self.diags
                    .report(pos, DiagCode::OperatorResultTag)
                    .arg(opername)
                    .arg(spelling);
                false
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comparison_needs_bool() {
        let mut cc = CompileContext::new();
        let fixed = cc.types.find_or_add("Fixed");
        assert!(!cc.check_operator_tag(OperatorToken::Lt, fixed, "operator<", TokenPos::dummy()));
        let diags = cc.diags.with_code(DiagCode::OperatorResultTag);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].args, vec!["operator<".to_string(), "bool:".to_string()]);
    }

    #[test]
    fn test_comparison_with_bool_is_valid() {
        let mut cc = CompileContext::new();
        let tag_bool = cc.types.tag_bool();
        for op in [OperatorToken::EqEq, OperatorToken::NotEq, OperatorToken::Bang, OperatorToken::GtEq] {
            assert!(cc.check_operator_tag(op, tag_bool, "operator", TokenPos::dummy()));
        }
        assert!(cc.diags.is_empty());
    }

    #[test]
    fn test_bitwise_not_must_be_untyped() {
        let mut cc = CompileContext::new();
        assert!(cc.check_operator_tag(OperatorToken::Tilde, TypeTag::UNTYPED, "operator~", TokenPos::dummy()));
        let tag_bool = cc.types.tag_bool();
        assert!(!cc.check_operator_tag(OperatorToken::Tilde, tag_bool, "operator~", TokenPos::dummy()));
        assert_eq!(cc.diags.all()[0].args[1], "_:");
    }

    #[test]
    fn test_arithmetic_is_unconstrained() {
        let mut cc = CompileContext::new();
        let fixed = cc.types.find_or_add("Fixed");
        assert!(cc.check_operator_tag(OperatorToken::Plus, fixed, "operator+", TokenPos::dummy()));
        assert!(cc.check_operator_tag(OperatorToken::Star, TypeTag::UNTYPED, "operator*", TokenPos::dummy()));
        assert!(cc.diags.is_empty());
    }
}
