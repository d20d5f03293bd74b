//! Compilation context
//!
//! One [`CompileContext`] exists per compilation unit. It owns every arena
//! (declarations, symbols, scopes), the type registry, the diagnostics sink,
//! the reference graph, and the active [`SemaContext`]. Operations take it by
//! reference; nothing is reachable through statics.

use crate::feedback::{Diagnostics, Options};
use crate::frontend::decl::{Decl, DeclArena, DeclId};
use crate::semantic::scope::{ScopeArena, ScopeId, ScopeKind};
use crate::semantic::symbol::{Symbol, SymbolId};
use crate::semantic::usage::ReferenceGraph;
use crate::types::TypeRegistry;
use crate::utils::{Error, Result};

/// Where the analyzer currently is: the innermost scope and the function
/// whose body is being analyzed, if any.
#[derive(Debug, Clone, Copy)]
pub struct SemaContext {
    scope: ScopeId,
    func: Option<DeclId>,
    /// The declaration whose parameters and body are being analyzed, which
    /// may differ from its canonical node
    entered: Option<DeclId>,
    /// Whether `entered` is bound in a scope. A declaration rejected as a
    /// redefinition is analyzed but never becomes a reference graph node.
    registered: bool,
}

impl SemaContext {
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Canonical declaration of the function being analyzed
    pub fn func_node(&self) -> Option<DeclId> {
        self.func
    }

    pub fn entered(&self) -> Option<DeclId> {
        self.entered
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

/// Per-unit compilation state
#[derive(Debug)]
pub struct CompileContext {
    pub decls: DeclArena,
    pub scopes: ScopeArena,
    pub types: TypeRegistry,
    pub diags: Diagnostics,
    pub graph: ReferenceGraph,
    symbols: Vec<Symbol>,
    sema: SemaContext,
}

impl CompileContext {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        let scopes = ScopeArena::new();
        let global = scopes.global();
        Self {
            decls: DeclArena::new(),
            scopes,
            types: TypeRegistry::new(),
            diags: Diagnostics::with_options(options),
            graph: ReferenceGraph::new(),
            symbols: Vec::new(),
            sema: SemaContext {
                scope: global,
                func: None,
                entered: None,
                registered: false,
            },
        }
    }

    // ==================== Scopes ====================

    /// The root global scope
    pub fn globals(&self) -> ScopeId {
        self.scopes.global()
    }

    pub fn sema(&self) -> &SemaContext {
        &self.sema
    }

    /// Innermost active scope
    pub fn scope(&self) -> ScopeId {
        self.sema.scope
    }

    /// Scope new declarations are inserted into
    pub fn scope_for_add(&self) -> ScopeId {
        self.sema.scope
    }

    /// Enter a new scope nested in the current one
    pub fn push_scope(&mut self, kind: ScopeKind) -> Result<ScopeId> {
        let parent = self.sema.scope;
        match kind {
            ScopeKind::Global => return Err(Error::ScopeMismatch {
                expected: "nested scope".to_string(),
                found: kind.to_string(),
            }),
            ScopeKind::FileStatic if self.scopes.kind(parent) != ScopeKind::Global => {
                return Err(Error::OrphanFileStatic);
            }
            _ => {}
        }
        let id = self.scopes.alloc(kind, parent);
        log::trace!("enter {} scope {:?} (parent {:?})", kind, id, parent);
        self.sema.scope = id;
        Ok(id)
    }

    /// Leave the current scope, which must be of `kind`. Locals of block and
    /// argument scopes are checked for usage on the way out.
    pub fn pop_scope(&mut self, kind: ScopeKind) -> Result<()> {
        let current = self.sema.scope;
        let found = self.scopes.kind(current);
        if found != kind {
            return Err(Error::ScopeMismatch {
                expected: kind.to_string(),
                found: found.to_string(),
            });
        }
        let parent = self.scopes.parent(current).ok_or(Error::ScopeUnderflow)?;
        let checked = match kind {
            ScopeKind::Block => true,
            // Parameters of a prototype or native can never be used
            ScopeKind::Argument => self.entered_has_body(),
            _ => false,
        };
        if checked {
            self.test_symbols(current);
        }
        log::trace!("leave {} scope {:?}", kind, current);
        self.sema.scope = parent;
        Ok(())
    }

    // ==================== Functions ====================

    /// Start analyzing the body (or parameter list) of `func`: makes it the
    /// active function and opens its argument scope.
    pub fn enter_function(&mut self, func: DeclId) -> Result<ScopeId> {
        let decl = self.decls.get(func);
        if !decl.is_function() {
            return Err(Error::NotAFunction {
                name: decl.name.clone(),
                pos: decl.pos,
            });
        }
        let canonical = self.decls.canonical(func);
        let registered = self
            .scopes
            .iter()
            .any(|(_, scope)| scope.declarations().contains(&func));
        log::debug!(
            "enter function `{}` ({:?}, registered: {})",
            decl.name,
            canonical,
            registered
        );
        self.sema.func = Some(canonical);
        self.sema.entered = Some(func);
        self.sema.registered = registered;
        self.push_scope(ScopeKind::Argument)
    }

    /// Close the argument scope opened by [`enter_function`](Self::enter_function)
    pub fn leave_function(&mut self) -> Result<()> {
        if self.sema.func.is_none() {
            return Err(Error::NoActiveFunction);
        }
        self.pop_scope(ScopeKind::Argument)?;
        self.sema.func = None;
        self.sema.entered = None;
        self.sema.registered = false;
        Ok(())
    }

    /// Canonical declaration of the function being analyzed
    pub fn func_node(&self) -> Option<DeclId> {
        self.sema.func
    }

    /// Whether the declaration being analyzed has a body
    fn entered_has_body(&self) -> bool {
        self.sema
            .entered
            .and_then(|f| self.decls.get(f).as_function())
            .map(|f| f.has_body())
            .unwrap_or(true)
    }

    /// Whether the active function is a native (bodiless, externally bound)
    pub fn in_native(&self) -> bool {
        self.sema
            .func
            .and_then(|f| self.decls.get(f).as_function())
            .map(|f| f.is_native)
            .unwrap_or(false)
    }

    // ==================== Declarations & Symbols ====================

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        self.decls.alloc(decl)
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        self.decls.get(id)
    }

    /// Store `sym` and attach it to its declaration
    pub(crate) fn attach_symbol(&mut self, sym: Symbol) -> Result<SymbolId> {
        let decl_id = sym.decl();
        let decl = self.decls.get(decl_id);
        if decl.sym.is_some() {
            return Err(Error::SymbolAlreadyAttached {
                name: decl.name.clone(),
                pos: decl.pos,
            });
        }
        let id = SymbolId(self.symbols.len());
        self.symbols.push(sym);
        self.decls.get_mut(decl_id).sym = Some(id);
        Ok(id)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    /// Symbol attached to a declaration, if analyzed
    pub fn symbol_of(&self, decl: DeclId) -> Option<&Symbol> {
        self.decls.get(decl).sym.map(|id| self.symbol(id))
    }

    /// Look up a name from the current scope outward
    pub fn find_symbol(&self, name: &str) -> Option<(DeclId, ScopeId)> {
        self.scopes.find(self.sema.scope, name)
    }
}

impl Default for CompileContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::decl::FunctionDecl;
    use crate::utils::TokenPos;

    #[test]
    fn test_starts_at_global() {
        let cc = CompileContext::new();
        assert_eq!(cc.scope(), cc.globals());
        assert_eq!(cc.func_node(), None);
    }

    #[test]
    fn test_push_pop_restores_parent() {
        let mut cc = CompileContext::new();
        let block = cc.push_scope(ScopeKind::Block).unwrap();
        assert_eq!(cc.scope(), block);
        cc.pop_scope(ScopeKind::Block).unwrap();
        assert_eq!(cc.scope(), cc.globals());
    }

    #[test]
    fn test_cannot_leave_global() {
        let mut cc = CompileContext::new();
        assert_eq!(cc.pop_scope(ScopeKind::Global), Err(Error::ScopeUnderflow));
    }

    #[test]
    fn test_mismatched_pop() {
        let mut cc = CompileContext::new();
        cc.push_scope(ScopeKind::Block).unwrap();
        assert!(matches!(
            cc.pop_scope(ScopeKind::Argument),
            Err(Error::ScopeMismatch { .. })
        ));
    }

    #[test]
    fn test_file_static_must_be_child_of_global() {
        let mut cc = CompileContext::new();
        cc.push_scope(ScopeKind::Block).unwrap();
        assert_eq!(
            cc.push_scope(ScopeKind::FileStatic),
            Err(Error::OrphanFileStatic)
        );
    }

    #[test]
    fn test_enter_function_sets_active_canonical() {
        let mut cc = CompileContext::new();
        let proto = FunctionDecl {
            is_forward: true,
            ..FunctionDecl::default()
        };
        let fwd = cc.alloc_decl(Decl::function("f", TokenPos::dummy(), proto));
        let def = cc.alloc_decl(Decl::function("f", TokenPos::dummy(), FunctionDecl::default()));
        cc.decls.link_canonical(def, fwd);

        let args = cc.enter_function(def).unwrap();
        assert_eq!(cc.func_node(), Some(fwd));
        assert_eq!(cc.scopes.kind(args), ScopeKind::Argument);
        cc.leave_function().unwrap();
        assert_eq!(cc.func_node(), None);
        assert_eq!(cc.scope(), cc.globals());
    }

    #[test]
    fn test_enter_function_rejects_variable() {
        let mut cc = CompileContext::new();
        let v = cc.alloc_decl(Decl::variable("v", TokenPos::dummy(), Default::default()));
        assert!(matches!(cc.enter_function(v), Err(Error::NotAFunction { .. })));
    }
}
