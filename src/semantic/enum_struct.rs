//! Enum struct member lookup

use crate::frontend::decl::{Decl, DeclId, FunctionDecl};
use crate::semantic::context::CompileContext;
use crate::types::TypeTag;
use crate::utils::{Error, Result, TokenPos};

impl CompileContext {
    /// Find a field or method named `name` in the enum struct `tag`. Fields
    /// are searched first, so a field hides a method of the same name.
    /// Returns `None` if `tag` is not an enum struct.
    pub fn resolve_field(&self, tag: TypeTag, name: &str) -> Option<DeclId> {
        let desc = self.types.get(tag)?.as_enum_struct()?;
        desc.fields
            .iter()
            .chain(desc.methods.iter())
            .copied()
            .find(|&id| self.decls.get(id).name == name)
    }

    /// Append a field to an enum struct
    pub fn add_enum_struct_field(&mut self, owner: TypeTag, name: &str, pos: TokenPos, tag: TypeTag) -> Result<DeclId> {
        let id = self.decls.alloc(Decl::variable(name, pos, tag));
        let desc = self
            .types
            .enum_struct_mut(owner)
            .ok_or_else(|| Error::UnknownTag(owner.to_string()))?;
        desc.fields.push(id);
        Ok(id)
    }

    /// Append a method to an enum struct
    pub fn add_enum_struct_method(&mut self, owner: TypeTag, name: &str, pos: TokenPos, return_tag: TypeTag) -> Result<DeclId> {
        let func = FunctionDecl {
            return_tag,
            method_of: Some(owner),
            ..FunctionDecl::default()
        };
        let id = self.decls.alloc(Decl::function(name, pos, func));
        let desc = self
            .types
            .enum_struct_mut(owner)
            .ok_or_else(|| Error::UnknownTag(owner.to_string()))?;
        desc.methods.push(id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(cc: &mut CompileContext) -> TypeTag {
        let tag = cc.types.define_enum_struct("Point").unwrap();
        let float = cc.types.tag_float();
        cc.add_enum_struct_method(tag, "x", TokenPos::dummy(), float).unwrap();
        cc.add_enum_struct_field(tag, "x", TokenPos::dummy(), float).unwrap();
        cc.add_enum_struct_field(tag, "y", TokenPos::dummy(), float).unwrap();
        cc.add_enum_struct_method(tag, "Length", TokenPos::dummy(), float).unwrap();
        tag
    }

    #[test]
    fn test_field_beats_method() {
        let mut cc = CompileContext::new();
        let tag = point(&mut cc);
        let found = cc.resolve_field(tag, "x").unwrap();
        assert!(cc.decl(found).as_variable().is_some());
    }

    #[test]
    fn test_method_found_when_no_field() {
        let mut cc = CompileContext::new();
        let tag = point(&mut cc);
        let found = cc.resolve_field(tag, "Length").unwrap();
        let method = cc.decl(found).as_function().unwrap();
        assert_eq!(method.method_of, Some(tag));
    }

    #[test]
    fn test_missing_member() {
        let mut cc = CompileContext::new();
        let tag = point(&mut cc);
        assert_eq!(cc.resolve_field(tag, "z"), None);
    }

    #[test]
    fn test_non_aggregate_type() {
        let mut cc = CompileContext::new();
        let fixed = cc.types.find_or_add("Fixed");
        assert_eq!(cc.resolve_field(fixed, "x"), None);
        assert_eq!(cc.resolve_field(TypeTag(999), "x"), None);
        assert!(cc.add_enum_struct_field(fixed, "x", TokenPos::dummy(), fixed).is_err());
    }
}
