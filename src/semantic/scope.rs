//! Scope chain
//!
//! Scopes form a parent-linked hierarchy: Global, then at most one FileStatic
//! child per file, then Argument scopes for function parameters and nested
//! Block scopes for bodies. All scopes of a compilation unit live in a
//! [`ScopeArena`] and are addressed by [`ScopeId`]. Leaving a scope only
//! detaches it from the active chain; its storage is released with the arena.

use std::collections::HashMap;
use std::fmt;

use crate::frontend::decl::{DeclArena, DeclId};
use crate::utils::{Error, Result};

/// Unique identifier for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

/// Scope tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    FileStatic,
    Argument,
    Block,
}

impl ScopeKind {
    pub fn is_global_or_file_static(&self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::FileStatic)
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScopeKind::Global => "global",
            ScopeKind::FileStatic => "file-static",
            ScopeKind::Argument => "argument",
            ScopeKind::Block => "block",
        };
        f.write_str(s)
    }
}

/// A scope containing name bindings
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Head of the declaration chain for each name
    names: HashMap<String, DeclId>,
    /// Every declaration added, in insertion order
    order: Vec<DeclId>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            names: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Look up a name in this scope only
    pub fn find(&self, name: &str) -> Option<DeclId> {
        self.names.get(name).copied()
    }

    /// Bind a declaration whose name must be new to this scope
    pub fn add(&mut self, decls: &DeclArena, decl: DeclId) -> Result<()> {
        let name = &decls.get(decl).name;
        if self.names.contains_key(name) {
            return Err(Error::AlreadyBound { name: name.clone() });
        }
        self.names.insert(name.clone(), decl);
        self.order.push(decl);
        Ok(())
    }

    /// Bind a declaration, chaining it in front of any existing declaration
    /// of the same name. Used for forward declarations and definitions at
    /// global and file-static scope.
    pub fn add_chain(&mut self, decls: &mut DeclArena, decl: DeclId) {
        let name = decls.get(decl).name.clone();
        if let Some(prev) = self.names.insert(name, decl) {
            decls.get_mut(decl).next = Some(prev);
        }
        self.order.push(decl);
    }

    /// Declarations in insertion order
    pub fn declarations(&self) -> &[DeclId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Owner for all scopes of a compilation unit
#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    /// Create an arena holding just the global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Global, None)],
        }
    }

    /// The root global scope
    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn alloc(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(kind, Some(parent)));
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn kind(&self, id: ScopeId) -> ScopeKind {
        self.get(id).kind
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    /// Look up a name, searching from `start` upward. Returns the declaration
    /// and the scope that holds it.
    pub fn find(&self, start: ScopeId, name: &str) -> Option<(DeclId, ScopeId)> {
        let mut scope_id = Some(start);
        while let Some(id) = scope_id {
            let scope = self.get(id);
            if let Some(decl) = scope.find(name) {
                return Some((decl, id));
            }
            scope_id = scope.parent;
        }
        None
    }

    /// Chain of declarations bound to `name` in exactly `scope`, newest first
    pub fn chain<'a>(
        &self,
        decls: &'a DeclArena,
        scope: ScopeId,
        name: &str,
    ) -> impl Iterator<Item = DeclId> + 'a {
        let mut cursor = self.get(scope).find(name);
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = decls.get(id).next;
            Some(id)
        })
    }

    /// All scopes, including ones already left
    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter().enumerate().map(|(i, s)| (ScopeId(i), s))
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}
