//! Symbol entries
//!
//! A [`Symbol`] is the per-name record attached to a declaration once it has
//! been analyzed: storage class, identifier kind, tag, address or constant
//! value, and array dimensions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::frontend::decl::DeclId;
use crate::types::TypeTag;
use crate::utils::{Error, Result};

/// A cell-sized value: addresses, offsets and constant values
pub type Cell = i32;

/// Handle to a symbol in the compilation context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

/// Where a symbol's storage lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    Global,
    FileStatic,
    Local,
    Argument,
}

impl StorageClass {
    pub fn is_global_or_file_static(&self) -> bool {
        matches!(self, StorageClass::Global | StorageClass::FileStatic)
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageClass::Global => "global",
            StorageClass::FileStatic => "file-static",
            StorageClass::Local => "local",
            StorageClass::Argument => "argument",
        };
        f.write_str(s)
    }
}

/// What kind of entity a symbol names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Function,
    Variable,
    ConstExpr,
    /// Placeholder; never valid on a constructed symbol
    Invalid,
}

/// Symbol entry
#[derive(Debug, Clone)]
pub struct Symbol {
    storage: StorageClass,
    ident: IdentifierKind,
    tag: TypeTag,
    addr: Cell,
    is_const: bool,
    /// Element tag for arrays
    semantic_tag: TypeTag,
    dims: Vec<i32>,
    /// Number of times the dimension storage was (re)allocated
    dim_allocations: u32,
    decl: DeclId,
}

impl Symbol {
    /// Build a symbol. Fails if `ident` is [`IdentifierKind::Invalid`].
    pub fn new(
        decl: DeclId,
        addr: Cell,
        ident: IdentifierKind,
        storage: StorageClass,
        tag: TypeTag,
    ) -> Result<Self> {
        if ident == IdentifierKind::Invalid {
            return Err(Error::InvalidIdentifierKind { decl: decl.0 });
        }
        Ok(Self {
            storage,
            ident,
            tag,
            addr,
            is_const: false,
            semantic_tag: TypeTag::UNTYPED,
            dims: Vec::new(),
            dim_allocations: 0,
            decl,
        })
    }

    pub fn storage(&self) -> StorageClass {
        self.storage
    }

    pub fn ident(&self) -> IdentifierKind {
        self.ident
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn addr(&self) -> Cell {
        self.addr
    }

    pub fn set_addr(&mut self, addr: Cell) {
        self.addr = addr;
    }

    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn set_is_const(&mut self, is_const: bool) {
        self.is_const = is_const;
    }

    pub fn semantic_tag(&self) -> TypeTag {
        self.semantic_tag
    }

    pub fn set_semantic_tag(&mut self, tag: TypeTag) {
        self.semantic_tag = tag;
    }

    pub fn decl(&self) -> DeclId {
        self.decl
    }

    /// Array rank, 0 for scalars
    pub fn dim_count(&self) -> usize {
        self.dims.len()
    }

    /// Change the array rank. Axis sizes are reset to zero when the rank
    /// changes; setting the current rank again keeps the existing storage.
    pub fn set_dim_count(&mut self, count: usize) {
        if self.dim_count() == count {
            return;
        }
        self.dims = vec![0; count];
        self.dim_allocations += 1;
    }

    /// Size of axis `axis`. Panics if `axis` is out of range.
    pub fn dim(&self, axis: usize) -> i32 {
        self.dims[axis]
    }

    /// Set the size of axis `axis`. Panics if `axis` is out of range.
    pub fn set_dim(&mut self, axis: usize, size: i32) {
        self.dims[axis] = size;
    }

    pub fn dims(&self) -> &[i32] {
        &self.dims
    }

    pub fn dim_allocations(&self) -> u32 {
        self.dim_allocations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var() -> Symbol {
        Symbol::new(
            DeclId(0),
            0,
            IdentifierKind::Variable,
            StorageClass::Local,
            TypeTag::UNTYPED,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_kind_rejected() {
        let result = Symbol::new(
            DeclId(7),
            0,
            IdentifierKind::Invalid,
            StorageClass::Global,
            TypeTag::UNTYPED,
        );
        assert_eq!(result.unwrap_err(), Error::InvalidIdentifierKind { decl: 7 });
    }

    #[test]
    fn test_scalar_by_default() {
        let sym = var();
        assert_eq!(sym.dim_count(), 0);
        assert_eq!(sym.dim_allocations(), 0);
        assert!(!sym.is_const());
    }

    #[test]
    fn test_same_rank_keeps_storage() {
        let mut sym = var();
        sym.set_dim_count(2);
        sym.set_dim(0, 4);
        sym.set_dim(1, 8);
        let before = sym.dims().as_ptr();
        sym.set_dim_count(2);
        assert_eq!(sym.dim_allocations(), 1);
        assert_eq!(sym.dims().as_ptr(), before);
        assert_eq!(sym.dims(), &[4, 8]);
    }

    #[test]
    fn test_rank_change_reallocates() {
        let mut sym = var();
        sym.set_dim_count(1);
        sym.set_dim(0, 3);
        sym.set_dim_count(3);
        assert_eq!(sym.dim_allocations(), 2);
        assert_eq!(sym.dims(), &[0, 0, 0]);
    }
}
