//! Type tags for pawnsym
//!
//! The language is tag-based: every value carries a numeric tag naming its
//! static type. Tag 0 is the untyped tag `_`.

use std::collections::HashMap;
use std::fmt;

use crate::frontend::decl::DeclId;
use crate::utils::{Error, Result};

/// Numeric type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TypeTag(pub u32);

impl TypeTag {
    /// The untyped tag `_`
    pub const UNTYPED: Self = TypeTag(0);

    pub fn is_untyped(&self) -> bool {
        *self == Self::UNTYPED
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a tag stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Untyped,
    Bool,
    /// An ordinary tag with no further structure (`Float`, user tags)
    Plain,
    /// An aggregate with named fields and methods
    EnumStruct(EnumStructDesc),
}

/// Field and method lists of an enum struct, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumStructDesc {
    pub fields: Vec<DeclId>,
    pub methods: Vec<DeclId>,
}

/// A registered type
#[derive(Debug, Clone)]
pub struct Type {
    pub tag: TypeTag,
    pub name: String,
    pub kind: TypeKind,
}

impl Type {
    pub fn as_enum_struct(&self) -> Option<&EnumStructDesc> {
        match &self.kind {
            TypeKind::EnumStruct(desc) => Some(desc),
            _ => None,
        }
    }
}

/// Registry of all tags in a compilation unit
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<Type>,
    by_name: HashMap<String, TypeTag>,
    tag_bool: TypeTag,
    tag_float: TypeTag,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::new(),
            by_name: HashMap::new(),
            tag_bool: TypeTag::UNTYPED,
            tag_float: TypeTag::UNTYPED,
        };
        registry.add("_", TypeKind::Untyped);
        registry.tag_bool = registry.add("bool", TypeKind::Bool);
        registry.tag_float = registry.add("Float", TypeKind::Plain);
        registry
    }

    fn add(&mut self, name: &str, kind: TypeKind) -> TypeTag {
        let tag = TypeTag(self.types.len() as u32);
        self.types.push(Type {
            tag,
            name: name.to_string(),
            kind,
        });
        self.by_name.insert(name.to_string(), tag);
        tag
    }

    /// Tag of `bool`
    pub fn tag_bool(&self) -> TypeTag {
        self.tag_bool
    }

    /// Tag of `Float`
    pub fn tag_float(&self) -> TypeTag {
        self.tag_float
    }

    /// Look up a tag by name
    pub fn find(&self, name: &str) -> Option<TypeTag> {
        self.by_name.get(name).copied()
    }

    /// Look up a tag by name, creating a plain tag on first use.
    ///
    /// Tags spring into existence the first time a declaration names them, so
    /// `Fixed:x` is valid even if nothing declared `Fixed` beforehand.
    pub fn find_or_add(&mut self, name: &str) -> TypeTag {
        match self.find(name) {
            Some(tag) => tag,
            None => self.add(name, TypeKind::Plain),
        }
    }

    pub fn get(&self, tag: TypeTag) -> Option<&Type> {
        self.types.get(tag.0 as usize)
    }

    /// Human-readable name of a tag, `?` if unknown
    pub fn name_of(&self, tag: TypeTag) -> &str {
        self.get(tag).map(|t| t.name.as_str()).unwrap_or("?")
    }

    /// Register `name` as an enum struct. A plain tag that was already
    /// created by an earlier use is upgraded in place.
    pub fn define_enum_struct(&mut self, name: &str) -> Result<TypeTag> {
        let tag = self.find_or_add(name);
        let ty = self
            .types
            .get_mut(tag.0 as usize)
            .ok_or_else(|| Error::UnknownTag(name.to_string()))?;
        match ty.kind {
            TypeKind::Plain => {
                ty.kind = TypeKind::EnumStruct(EnumStructDesc::default());
                Ok(tag)
            }
            TypeKind::EnumStruct(_) => Ok(tag),
            TypeKind::Untyped | TypeKind::Bool => Err(Error::UnknownTag(name.to_string())),
        }
    }

    pub fn enum_struct_mut(&mut self, tag: TypeTag) -> Option<&mut EnumStructDesc> {
        match self.types.get_mut(tag.0 as usize).map(|t| &mut t.kind) {
            Some(TypeKind::EnumStruct(desc)) => Some(desc),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
