//! Name resolution engine
//!
//! Decides whether a new declaration is fresh, legally shadows an outer
//! declaration, or collides with an existing one, and inserts accepted
//! declarations into the right scope.

use crate::feedback::DiagCode;
use crate::frontend::decl::DeclId;
use crate::semantic::context::CompileContext;
use crate::semantic::scope::{ScopeId, ScopeKind};
use crate::semantic::symbol::StorageClass;
use crate::utils::{Error, Result, TokenPos};

/// Outcome of classifying a proposed declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStatus {
    Ok,
    Shadowed,
    Duplicated,
}

impl CompileContext {
    /// Classify a declaration of `name` with storage class `storage` against
    /// the current scope chain.
    pub fn new_name_status(&self, name: &str, storage: StorageClass) -> NameStatus {
        let current = self.scope_for_add();

        // A native's parameters only live in its own argument scope.
        let existing = if self.in_native() {
            self.scopes
                .get(self.scope())
                .find(name)
                .map(|decl| (decl, self.scope()))
        } else {
            self.find_symbol(name)
        };
        let Some((decl, found)) = existing else {
            return NameStatus::Ok;
        };

        if self.scopes.kind(found) == ScopeKind::Global
            && self.scopes.kind(current).is_global_or_file_static()
        {
            if storage == StorageClass::FileStatic {
                return NameStatus::Shadowed;
            }
            return NameStatus::Duplicated;
        }
        if found == current {
            return NameStatus::Duplicated;
        }
        if self.scopes.kind(current) == ScopeKind::Argument && self.decls.get(decl).is_function() {
            return NameStatus::Ok;
        }
        NameStatus::Shadowed
    }

    /// Report redefinition (error 21) or shadowing (warning 219). Returns
    /// false when the declaration must not be registered.
    pub fn check_name_redefinition(&mut self, name: &str, pos: TokenPos, storage: StorageClass) -> bool {
        let status = self.new_name_status(name, storage);
        log::debug!("name `{}` ({}) at {}: {:?}", name, storage, pos, status);
        match status {
            NameStatus::Duplicated => {
                self.diags.report(pos, DiagCode::SymbolAlreadyDefined).arg(name);
                false
            }
            NameStatus::Shadowed => {
                self.diags.report(pos, DiagCode::ShadowedSymbol).arg(name);
                true
            }
            NameStatus::Ok => true,
        }
    }

    /// Scope a declaration with storage class `storage` is inserted into.
    ///
    /// File-static scope sits between function scopes and the global scope,
    /// so a global-class declaration made while it is current skips past it.
    pub fn insertion_scope(&self, decl: DeclId, storage: StorageClass) -> Result<ScopeId> {
        let scope = self.scope_for_add();
        if self.scopes.kind(scope) != ScopeKind::FileStatic || storage == StorageClass::FileStatic {
            return Ok(scope);
        }
        if storage != StorageClass::Global {
            let d = self.decls.get(decl);
            return Err(Error::BadFileStaticRedirect {
                name: d.name.clone(),
                storage: storage.to_string(),
                pos: d.pos,
            });
        }
        match self.scopes.parent(scope) {
            Some(parent) if self.scopes.kind(parent) == ScopeKind::Global => Ok(parent),
            _ => Err(Error::OrphanFileStatic),
        }
    }

    /// Insert `decl` into the scope chosen for `storage`. Global and
    /// file-static scopes chain same-named declarations; all others require
    /// unique names.
    pub fn define_symbol(&mut self, decl: DeclId, storage: StorageClass) -> Result<ScopeId> {
        let scope = self.insertion_scope(decl, storage)?;
        if self.scopes.kind(scope).is_global_or_file_static() {
            self.scopes.get_mut(scope).add_chain(&mut self.decls, decl);
        } else {
            self.scopes.get_mut(scope).add(&self.decls, decl)?;
        }
        log::trace!("defined `{}` in {:?}", self.decls.get(decl).name, scope);
        Ok(scope)
    }

    /// Check and, if accepted, register `decl`. Returns whether it was
    /// registered.
    pub fn declare(&mut self, decl: DeclId, storage: StorageClass) -> Result<bool> {
        let (name, pos) = {
            let d = self.decls.get(decl);
            (d.name.clone(), d.pos)
        };
        if !self.check_name_redefinition(&name, pos, storage) {
            return Ok(false);
        }
        self.define_symbol(decl, storage)?;
        Ok(true)
    }

    /// Register a global-class declaration directly in the global scope.
    pub fn add_global(&mut self, decl: DeclId) -> Result<()> {
        let storage = self.symbol_of(decl).map(|s| s.storage());
        if storage != Some(StorageClass::Global) {
            let d = self.decls.get(decl);
            return Err(Error::BadFileStaticRedirect {
                name: d.name.clone(),
                storage: storage.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string()),
                pos: d.pos,
            });
        }
        let global = self.globals();
        self.scopes.get_mut(global).add_chain(&mut self.decls, decl);
        Ok(())
    }

    /// Register a function declaration.
    ///
    /// A function whose name is already bound in the target scope to a
    /// prototype (or which is itself a prototype of an existing function) is
    /// chained onto it and shares its canonical node. Two bodies, or any
    /// other collision, go through the regular redefinition check.
    pub fn declare_function(&mut self, decl: DeclId, storage: StorageClass) -> Result<bool> {
        let new_fn = self
            .decls
            .get(decl)
            .as_function()
            .cloned()
            .ok_or_else(|| {
                let d = self.decls.get(decl);
                Error::NotAFunction {
                    name: d.name.clone(),
                    pos: d.pos,
                }
            })?;

        if storage.is_global_or_file_static() {
            let scope = self.insertion_scope(decl, storage)?;
            let name = self.decls.get(decl).name.clone();
            let chain: Vec<DeclId> = self.scopes.chain(&self.decls, scope, &name).collect();
            if let Some(&prior) = chain.first() {
                let all_functions = chain.iter().all(|&d| self.decls.get(d).is_function());
                let has_body = chain.iter().any(|&d| {
                    self.decls
                        .get(d)
                        .as_function()
                        .map(|f| f.has_body())
                        .unwrap_or(false)
                });
                let new_has_body = new_fn.has_body();
                if all_functions && !(has_body && new_has_body) {
                    log::debug!("chaining `{}` onto earlier declaration {:?}", name, prior);
                    self.decls.link_canonical(decl, prior);
                    self.scopes.get_mut(scope).add_chain(&mut self.decls, decl);
                    return Ok(true);
                }
            }
        }
        self.declare(decl, storage)
    }
}
