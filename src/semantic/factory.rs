//! Symbol and constant factories

use crate::frontend::decl::DeclId;
use crate::semantic::context::CompileContext;
use crate::semantic::symbol::{Cell, IdentifierKind, StorageClass, Symbol, SymbolId};
use crate::types::TypeTag;
use crate::utils::{Result, TokenPos};

impl CompileContext {
    /// Build a symbol for `decl` and attach it. A non-empty `dims` makes the
    /// symbol an array of that shape with element tag `semantic_tag`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_variable(
        &mut self,
        decl: DeclId,
        addr: Cell,
        ident: IdentifierKind,
        storage: StorageClass,
        tag: TypeTag,
        dims: &[i32],
        semantic_tag: TypeTag,
    ) -> Result<SymbolId> {
        let mut sym = Symbol::new(decl, addr, ident, storage, tag)?;
        if !dims.is_empty() {
            sym.set_dim_count(dims.len());
            for (axis, &size) in dims.iter().enumerate() {
                sym.set_dim(axis, size);
            }
            sym.set_semantic_tag(semantic_tag);
        }
        self.attach_symbol(sym)
    }

    /// Build a compile-time constant and register it unless it collides with
    /// an existing name. The symbol is returned either way, but a rejected
    /// constant is not reachable through lookup.
    pub fn define_constant(
        &mut self,
        decl: DeclId,
        pos: TokenPos,
        value: Cell,
        storage: StorageClass,
        tag: TypeTag,
    ) -> Result<SymbolId> {
        let mut sym = Symbol::new(decl, value, IdentifierKind::ConstExpr, storage, tag)?;
        sym.set_is_const(true);
        let id = self.attach_symbol(sym)?;

        let name = self.decls.get(decl).name.clone();
        if self.check_name_redefinition(&name, pos, storage) {
            self.define_symbol(decl, storage)?;
        }
        Ok(id)
    }
}
