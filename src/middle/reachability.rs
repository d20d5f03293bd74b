//! Dead function elimination
//!
//! Walks the reference graph from the unit's entry points (public functions
//! and `main`) and finds global and file-static functions nothing reaches.
//! Those are eligible for removal; the ones not marked `stock` also get a
//! "symbol is never used" warning.

use std::collections::{BTreeMap, BTreeSet};

use crate::feedback::DiagCode;
use crate::frontend::decl::DeclId;
use crate::semantic::context::CompileContext;
use crate::utils::TokenPos;

/// Attributes of one function merged over all its declarations
#[derive(Debug, Clone, Default)]
struct FunctionSummary {
    is_public: bool,
    is_stock: bool,
    is_native: bool,
    has_body: bool,
    /// Position of the definition, or of the first prototype
    pos: Option<TokenPos>,
}

/// Result of a reachability walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reachability {
    /// Canonical functions reachable from an entry point
    pub reachable: BTreeSet<DeclId>,
    /// Canonical functions nothing reaches, in declaration order
    pub removable: Vec<DeclId>,
}

impl Reachability {
    pub fn is_reachable(&self, canonical: DeclId) -> bool {
        self.reachable.contains(&canonical)
    }

    pub fn is_removable(&self, canonical: DeclId) -> bool {
        self.removable.contains(&canonical)
    }
}

/// Finds and reports unreferenced functions
pub struct DeadFunctionElimination {
    /// Name of the implicit entry point
    entry_name: String,
}

impl DeadFunctionElimination {
    pub fn new() -> Self {
        Self {
            entry_name: "main".to_string(),
        }
    }

    /// Use a different implicit entry point name
    pub fn with_entry(entry_name: impl Into<String>) -> Self {
        Self {
            entry_name: entry_name.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        "dead-function-elimination"
    }

    /// Collect every registered global or file-static function, keyed by its
    /// canonical declaration.
    fn summarize(&self, cc: &CompileContext) -> BTreeMap<DeclId, FunctionSummary> {
        let mut summaries: BTreeMap<DeclId, FunctionSummary> = BTreeMap::new();
        for (_, scope) in cc.scopes.iter() {
            if !scope.kind.is_global_or_file_static() {
                continue;
            }
            for &id in scope.declarations() {
                let decl = cc.decls.get(id);
                let Some(func) = decl.as_function() else {
                    continue;
                };
                let registered = cc
                    .symbol_of(id)
                    .map(|s| s.storage().is_global_or_file_static())
                    .unwrap_or(false);
                if !registered {
                    continue;
                }
                let summary = summaries.entry(cc.decls.canonical(id)).or_default();
                summary.is_public |= func.is_public || decl.name == self.entry_name;
                summary.is_stock |= func.is_stock;
                summary.is_native |= func.is_native;
                let body = func.has_body();
                if body || summary.pos.is_none() {
                    summary.pos = Some(decl.pos);
                }
                summary.has_body |= body;
            }
        }
        summaries
    }

    /// Compute reachability without reporting anything
    pub fn analyze(&self, cc: &CompileContext) -> Reachability {
        let summaries = self.summarize(cc);

        let mut reachable = BTreeSet::new();
        let mut worklist: Vec<DeclId> = summaries
            .iter()
            .filter(|(_, s)| s.is_public)
            .map(|(&id, _)| id)
            .collect();

        while let Some(id) = worklist.pop() {
            if !reachable.insert(id) {
                continue;
            }
            worklist.extend(cc.graph.callees(id).filter(|c| !reachable.contains(c)));
        }

        let removable = summaries
            .iter()
            .filter(|(id, s)| !reachable.contains(*id) && s.has_body && !s.is_native)
            .map(|(&id, _)| id)
            .collect();

        Reachability { reachable, removable }
    }

    /// Compute reachability and warn about unreferenced non-stock functions
    pub fn run(&mut self, cc: &mut CompileContext) -> Reachability {
        let result = self.analyze(cc);
        let summaries = self.summarize(cc);
        for id in &result.removable {
            let Some(summary) = summaries.get(id) else {
                continue;
            };
            if summary.is_stock {
                continue;
            }
            let name = cc.decls.get(*id).name.clone();
            let pos = summary.pos.unwrap_or_default();
            cc.diags.report(pos, DiagCode::SymbolNeverUsed).arg(name);
        }
        log::debug!(
            "{}: {} reachable, {} removable",
            self.name(),
            result.reachable.len(),
            result.removable.len()
        );
        result
    }
}

impl Default for DeadFunctionElimination {
    fn default() -> Self {
        Self::new()
    }
}
