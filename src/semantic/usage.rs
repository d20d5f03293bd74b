//! Usage tracking and the reference graph
//!
//! Every use of a name inside a function body is reported through
//! [`CompileContext::record_usage`]. Variables get their read/written flags
//! set; uses of global or file-static functions add an edge from the active
//! function to the callee. Locals never enter the graph since they cannot be
//! referenced across function boundaries.

use std::collections::{BTreeMap, BTreeSet};

use bitflags::bitflags;

use crate::frontend::decl::DeclId;
use crate::semantic::context::CompileContext;
use crate::semantic::symbol::IdentifierKind;

bitflags! {
    /// How a name is accessed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Usage: u8 {
        const READ = 1 << 0;
        const WRITTEN = 1 << 1;
    }
}

/// Directed caller → callee graph over canonical function declarations
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    edges: BTreeMap<DeclId, BTreeSet<DeclId>>,
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge. Returns false if it was already present.
    pub fn add_edge(&mut self, from: DeclId, to: DeclId) -> bool {
        self.edges.entry(from).or_default().insert(to)
    }

    pub fn references(&self, from: DeclId, to: DeclId) -> bool {
        self.edges.get(&from).map(|s| s.contains(&to)).unwrap_or(false)
    }

    /// Functions referenced by `from`
    pub fn callees(&self, from: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.edges.get(&from).into_iter().flat_map(|s| s.iter().copied())
    }

    /// All edges, ordered by caller then callee
    pub fn edges(&self) -> impl Iterator<Item = (DeclId, DeclId)> + '_ {
        self.edges
            .iter()
            .flat_map(|(&from, tos)| tos.iter().map(move |&to| (from, to)))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }
}

impl CompileContext {
    /// Record that `decl` is used with access `usage` at the current point
    /// of analysis.
    pub fn record_usage(&mut self, decl: DeclId, usage: Usage) {
        if let Some(var) = self.decls.get_mut(decl).as_variable_mut() {
            if usage.contains(Usage::READ) {
                var.is_read = true;
            }
            if usage.contains(Usage::WRITTEN) {
                var.is_written = true;
            }
            return;
        }

        let Some(caller) = self.func_node() else {
            return;
        };
        if !self.sema().is_registered() {
            return;
        }
        if !self.decls.get(decl).is_function() {
            return;
        }
        let callee = self.decls.canonical(decl);
        let Some(sym) = self.symbol_of(callee) else {
            return;
        };
        if !sym.storage().is_global_or_file_static() || sym.ident() != IdentifierKind::Function {
            return;
        }

        debug_assert_eq!(self.decls.canonical(caller), caller);
        if self.graph.add_edge(caller, callee) {
            log::debug!(
                "reference `{}` -> `{}`",
                self.decls.get(caller).name,
                self.decls.get(callee).name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::decl::{Decl, FunctionDecl};
    use crate::semantic::symbol::StorageClass;
    use crate::types::TypeTag;
    use crate::utils::TokenPos;

    fn function(cc: &mut CompileContext, name: &str, func: FunctionDecl, storage: StorageClass) -> DeclId {
        let decl = cc.alloc_decl(Decl::function(name, TokenPos::dummy(), func));
        cc.new_variable(decl, 0, IdentifierKind::Function, storage, TypeTag::UNTYPED, &[], TypeTag::UNTYPED)
            .unwrap();
        cc.declare_function(decl, storage).unwrap();
        decl
    }

    fn variable(cc: &mut CompileContext, name: &str, storage: StorageClass) -> DeclId {
        let decl = cc.alloc_decl(Decl::variable(name, TokenPos::dummy(), TypeTag::UNTYPED));
        cc.new_variable(decl, 0, IdentifierKind::Variable, storage, TypeTag::UNTYPED, &[], TypeTag::UNTYPED)
            .unwrap();
        cc.declare(decl, storage).unwrap();
        decl
    }

    #[test]
    fn test_variable_usage_sets_flags_only() {
        let mut cc = CompileContext::new();
        let g = variable(&mut cc, "g", StorageClass::Global);
        let main = function(&mut cc, "main", FunctionDecl::default(), StorageClass::Global);
        cc.enter_function(main).unwrap();
        cc.record_usage(g, Usage::READ | Usage::WRITTEN);

        let var = cc.decl(g).as_variable().unwrap();
        assert!(var.is_read && var.is_written);
        assert!(cc.graph.is_empty());
    }

    #[test]
    fn test_written_only() {
        let mut cc = CompileContext::new();
        let g = variable(&mut cc, "g", StorageClass::Global);
        cc.record_usage(g, Usage::WRITTEN);
        let var = cc.decl(g).as_variable().unwrap();
        assert!(!var.is_read);
        assert!(var.is_written);
    }

    #[test]
    fn test_call_adds_single_edge() {
        let mut cc = CompileContext::new();
        let helper = function(&mut cc, "helper", FunctionDecl::default(), StorageClass::Global);
        let main = function(&mut cc, "main", FunctionDecl::default(), StorageClass::Global);
        cc.enter_function(main).unwrap();
        cc.record_usage(helper, Usage::READ);
        cc.record_usage(helper, Usage::READ);

        assert_eq!(cc.graph.edge_count(), 1);
        assert!(cc.graph.references(main, helper));
        assert_eq!(cc.graph.callees(main).collect::<Vec<_>>(), vec![helper]);
    }

    #[test]
    fn test_no_edge_outside_function() {
        let mut cc = CompileContext::new();
        let helper = function(&mut cc, "helper", FunctionDecl::default(), StorageClass::Global);
        cc.record_usage(helper, Usage::READ);
        assert!(cc.graph.is_empty());
    }

    #[test]
    fn test_edge_targets_canonical_callee() {
        let mut cc = CompileContext::new();
        let proto = FunctionDecl {
            is_forward: true,
            ..FunctionDecl::default()
        };
        let fwd = function(&mut cc, "helper", proto, StorageClass::Global);
        let main = function(&mut cc, "main", FunctionDecl::default(), StorageClass::Global);
        let def = function(&mut cc, "helper", FunctionDecl::default(), StorageClass::Global);

        cc.enter_function(main).unwrap();
        cc.record_usage(def, Usage::READ);
        cc.record_usage(fwd, Usage::READ);
        assert_eq!(cc.graph.edges().collect::<Vec<_>>(), vec![(main, fwd)]);
    }

    #[test]
    fn test_file_static_callee_gets_edge() {
        let mut cc = CompileContext::new();
        cc.push_scope(crate::semantic::scope::ScopeKind::FileStatic).unwrap();
        let helper = function(&mut cc, "helper", FunctionDecl::default(), StorageClass::FileStatic);
        let main = function(&mut cc, "main", FunctionDecl::default(), StorageClass::Global);
        cc.enter_function(main).unwrap();
        cc.record_usage(helper, Usage::READ);
        assert!(cc.graph.references(main, helper));
    }

    #[test]
    fn test_local_function_symbol_gets_no_edge() {
        let mut cc = CompileContext::new();
        let main = function(&mut cc, "main", FunctionDecl::default(), StorageClass::Global);
        cc.enter_function(main).unwrap();
        let local = cc.alloc_decl(Decl::function("inner", TokenPos::dummy(), FunctionDecl::default()));
        cc.new_variable(local, 0, IdentifierKind::Function, StorageClass::Local, TypeTag::UNTYPED, &[], TypeTag::UNTYPED)
            .unwrap();
        cc.record_usage(local, Usage::READ);
        assert!(cc.graph.is_empty());
    }

    #[test]
    fn test_constant_gets_no_edge() {
        let mut cc = CompileContext::new();
        let main = function(&mut cc, "main", FunctionDecl::default(), StorageClass::Global);
        let k = cc.alloc_decl(Decl::constant("K", TokenPos::dummy(), TypeTag::UNTYPED, 3));
        cc.define_constant(k, TokenPos::dummy(), 3, StorageClass::Global, TypeTag::UNTYPED)
            .unwrap();
        cc.enter_function(main).unwrap();
        cc.record_usage(k, Usage::READ);
        assert!(cc.graph.is_empty());
    }

    #[test]
    fn test_rejected_definition_records_no_edges() {
        let mut cc = CompileContext::new();
        let helper = function(&mut cc, "helper", FunctionDecl::default(), StorageClass::Global);
        function(&mut cc, "f", FunctionDecl::default(), StorageClass::Global);
        let again = function(&mut cc, "f", FunctionDecl::default(), StorageClass::Global);

        cc.enter_function(again).unwrap();
        assert!(!cc.sema().is_registered());
        cc.record_usage(helper, Usage::READ);
        assert!(cc.graph.is_empty());
    }
}
