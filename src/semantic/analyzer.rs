//! Semantic analyzer
//!
//! Replays a declaration event [`Script`] against a [`CompileContext`]:
//! - Declares functions, variables, parameters and constants
//! - Opens and closes file-static, argument and block scopes
//! - Reports name uses to the reference graph
//! - Validates operator overload result tags
//!
//! [`SemanticAnalyzer::finish`] runs dead function elimination over the
//! finished graph.

use crate::feedback::{DiagCode, Options};
use crate::frontend::decl::{Decl, DeclId, FunctionDecl};
use crate::frontend::events::{Event, EventKind, Member, Script};
use crate::frontend::token::OperatorToken;
use crate::middle::reachability::{DeadFunctionElimination, Reachability};
use crate::semantic::context::CompileContext;
use crate::semantic::scope::ScopeKind;
use crate::semantic::symbol::{Cell, IdentifierKind, StorageClass};
use crate::semantic::usage::Usage;
use crate::types::TypeTag;
use crate::utils::{Error, Result, TokenPos};

/// Bytes per cell
const CELL_SIZE: Cell = 4;
/// Frame offset of the first argument (past the saved frame, return address
/// and argument count)
const FIRST_ARG_OFFSET: Cell = 3 * CELL_SIZE;

/// Finished analysis of one compilation unit
#[derive(Debug)]
pub struct Analysis {
    pub file: String,
    pub cc: CompileContext,
    pub reachability: Reachability,
}

impl Analysis {
    /// Names of the functions eligible for removal
    pub fn removable_names(&self) -> Vec<&str> {
        self.reachability
            .removable
            .iter()
            .map(|&id| self.cc.decls.get(id).name.as_str())
            .collect()
    }

    /// Reference graph edges by name
    pub fn edge_names(&self) -> Vec<(&str, &str)> {
        self.cc
            .graph
            .edges()
            .map(|(from, to)| {
                (
                    self.cc.decls.get(from).name.as_str(),
                    self.cc.decls.get(to).name.as_str(),
                )
            })
            .collect()
    }
}

/// Event-driven semantic analyzer
pub struct SemanticAnalyzer {
    pub cc: CompileContext,
    file: String,
    /// Next free data segment address
    data_size: Cell,
    /// Current stack frame size, one entry per open function or block
    frames: Vec<Cell>,
    /// Argument count of the function being analyzed
    arg_count: Cell,
    /// Implicit entry point for reachability
    entry: String,
    /// Declaration made by the most recent `function` event
    last_function: Option<DeclId>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            cc: CompileContext::with_options(options),
            file: String::new(),
            data_size: 0,
            frames: Vec::new(),
            arg_count: 0,
            entry: "main".to_string(),
            last_function: None,
        }
    }

    /// Treat `entry` instead of `main` as the implicit entry point
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    /// Analyze a whole script and run the reachability pass
    pub fn analyze(mut self, script: &Script) -> Result<Analysis> {
        self.file = script.file.clone();
        for event in &script.events {
            self.apply(event)?;
        }
        self.finish()
    }

    /// Close the unit. All scopes opened by events must have been closed.
    pub fn finish(mut self) -> Result<Analysis> {
        if self.cc.scope() != self.cc.globals() {
            let found = self.cc.scopes.kind(self.cc.scope());
            return Err(Error::ScopeMismatch {
                expected: ScopeKind::Global.to_string(),
                found: found.to_string(),
            });
        }
        let reachability = DeadFunctionElimination::with_entry(self.entry.as_str()).run(&mut self.cc);
        Ok(Analysis {
            file: self.file,
            cc: self.cc,
            reachability,
        })
    }

    /// Apply one event
    pub fn apply(&mut self, event: &Event) -> Result<()> {
        let pos = event.pos();
        log::trace!("{:?} at {}", event.kind, pos);
        match &event.kind {
            EventKind::BeginFile => {
                self.cc.push_scope(ScopeKind::FileStatic)?;
            }
            EventKind::EndFile => self.cc.pop_scope(ScopeKind::FileStatic)?,

            EventKind::Function { name, storage, tag, native, public, stock, forward } => {
                let func = FunctionDecl {
                    return_tag: self.tag(tag.as_deref()),
                    is_native: *native,
                    is_public: *public,
                    is_stock: *stock,
                    is_forward: *forward,
                    ..FunctionDecl::default()
                };
                let decl = self.declare_function(name, pos, func, storage.unwrap_or(StorageClass::Global))?;
                self.last_function = Some(decl);
            }
            EventKind::BeginFunction { name } => self.begin_function(name, pos)?,
            EventKind::EndFunction => {
                self.cc.leave_function()?;
                self.frames.pop();
            }
            EventKind::Param { name, tag, dims } => {
                if self.cc.func_node().is_none() {
                    return Err(Error::NoActiveFunction);
                }
                let tag = self.tag(tag.as_deref());
                let addr = self
                    .arg_count
                    .checked_mul(CELL_SIZE)
                    .and_then(|offset| offset.checked_add(FIRST_ARG_OFFSET))
                    .ok_or_else(|| Error::StorageOverflow {
                        name: name.clone(),
                        pos,
                    })?;
                self.arg_count += 1;
                self.declare_variable(name, pos, StorageClass::Argument, tag, dims, false, addr)?;
            }

            EventKind::BeginBlock => {
                self.cc.push_scope(ScopeKind::Block)?;
                let frame = self.frames.last().copied().unwrap_or(0);
                self.frames.push(frame);
            }
            EventKind::EndBlock => {
                self.cc.pop_scope(ScopeKind::Block)?;
                self.frames.pop();
            }

            EventKind::Variable { name, storage, tag, dims, is_const } => {
                let storage = storage.unwrap_or_else(|| self.default_storage());
                let tag = self.tag(tag.as_deref());
                let addr = self.allocate(name, pos, storage, dims)?;
                self.declare_variable(name, pos, storage, tag, dims, *is_const, addr)?;
            }
            EventKind::Constant { name, value, storage, tag } => {
                let storage = storage.unwrap_or_else(|| self.default_storage());
                let tag = self.tag(tag.as_deref());
                let decl = self.cc.alloc_decl(Decl::constant(name.as_str(), pos, tag, *value));
                self.cc.define_constant(decl, pos, *value, storage, tag)?;
            }

            EventKind::Use { name, read, written } => {
                let mut usage = Usage::empty();
                if *read {
                    usage |= Usage::READ;
                }
                if *written {
                    usage |= Usage::WRITTEN;
                }
                if usage.is_empty() {
                    usage = Usage::READ;
                }
                match self.cc.find_symbol(name) {
                    Some((decl, _)) => self.cc.record_usage(decl, usage),
                    None => {
                        self.cc.diags.report(pos, DiagCode::UndefinedSymbol).arg(name);
                    }
                }
            }
            EventKind::Field { type_name, name } => {
                let owner = self.cc.types.find(type_name);
                match owner.and_then(|tag| self.cc.resolve_field(tag, name)) {
                    Some(member) => self.cc.record_usage(member, Usage::READ),
                    None => {
                        self.cc
                            .diags
                            .report(pos, DiagCode::UndefinedSymbol)
                            .arg(format!("{}.{}", type_name, name));
                    }
                }
            }

            EventKind::EnumStruct { name, fields, methods } => {
                self.define_enum_struct(name, pos, fields, methods)?;
            }
            EventKind::Operator { op, result_tag } => {
                let token = OperatorToken::from_symbol(op)
                    .ok_or_else(|| Error::Script(format!("unknown operator `{}`", op)))?;
                let result_tag = self.tag(result_tag.as_deref());
                let opername = format!("operator{}", token);
                self.cc.check_operator_tag(token, result_tag, &opername, pos);
            }
        }
        Ok(())
    }

    // ==================== Helpers ====================

    /// Resolve a tag name; no name means untyped
    fn tag(&mut self, name: Option<&str>) -> TypeTag {
        match name {
            Some(name) => self.cc.types.find_or_add(name.trim_end_matches(':')),
            None => TypeTag::UNTYPED,
        }
    }

    /// Storage class of an unqualified declaration at the current position
    fn default_storage(&self) -> StorageClass {
        if self.cc.scopes.kind(self.cc.scope()).is_global_or_file_static() {
            StorageClass::Global
        } else {
            StorageClass::Local
        }
    }

    /// Reserve storage and return its address. Globals and statics live in
    /// the data segment, locals at negative frame offsets.
    fn allocate(&mut self, name: &str, pos: TokenPos, storage: StorageClass, dims: &[i32]) -> Result<Cell> {
        let overflow = || Error::StorageOverflow {
            name: name.to_string(),
            pos,
        };
        let size = dims
            .iter()
            .try_fold(CELL_SIZE, |acc, &d| acc.checked_mul(d.max(1)))
            .ok_or_else(overflow)?;
        match (storage, self.frames.last_mut()) {
            (StorageClass::Local, Some(frame)) => {
                *frame = frame.checked_add(size).ok_or_else(overflow)?;
                Ok(-*frame)
            }
            _ => {
                let addr = self.data_size;
                self.data_size = addr.checked_add(size).ok_or_else(overflow)?;
                Ok(addr)
            }
        }
    }

    fn declare_function(&mut self, name: &str, pos: TokenPos, func: FunctionDecl, storage: StorageClass) -> Result<DeclId> {
        let tag = func.return_tag;
        let decl = self.cc.alloc_decl(Decl::function(name, pos, func));
        self.cc
            .new_variable(decl, 0, IdentifierKind::Function, storage, tag, &[], TypeTag::UNTYPED)?;
        self.cc.declare_function(decl, storage)?;
        Ok(decl)
    }

    #[allow(clippy::too_many_arguments)]
    fn declare_variable(
        &mut self,
        name: &str,
        pos: TokenPos,
        storage: StorageClass,
        tag: TypeTag,
        dims: &[i32],
        is_const: bool,
        addr: Cell,
    ) -> Result<DeclId> {
        let decl = self.cc.alloc_decl(Decl::variable(name, pos, tag));
        let (elem_tag, sym_tag) = if dims.is_empty() {
            (TypeTag::UNTYPED, tag)
        } else {
            (tag, TypeTag::UNTYPED)
        };
        let sym = self
            .cc
            .new_variable(decl, addr, IdentifierKind::Variable, storage, sym_tag, dims, elem_tag)?;
        self.cc.symbol_mut(sym).set_is_const(is_const);
        self.cc.declare(decl, storage)?;
        Ok(decl)
    }

    /// Enter the function named `name`. The declaration just made by the
    /// preceding `function` event takes precedence over lookup, so a body
    /// rejected as a redefinition is not mistaken for the first one.
    fn begin_function(&mut self, name: &str, pos: TokenPos) -> Result<()> {
        let decl = match self.last_function.take() {
            Some(decl) if self.cc.decl(decl).name == name => decl,
            _ => {
                let (decl, _) = self
                    .cc
                    .find_symbol(name)
                    .ok_or_else(|| Error::NotAFunction {
                        name: name.to_string(),
                        pos,
                    })?;
                decl
            }
        };
        self.cc.enter_function(decl)?;
        self.frames.push(0);
        self.arg_count = 0;
        Ok(())
    }

    fn define_enum_struct(&mut self, name: &str, pos: TokenPos, fields: &[Member], methods: &[Member]) -> Result<()> {
        let owner = self.cc.types.define_enum_struct(name)?;
        for field in fields {
            let tag = self.tag(field.tag.as_deref());
            self.cc.add_enum_struct_field(owner, &field.name, pos, tag)?;
        }
        for method in methods {
            let tag = self.tag(method.tag.as_deref());
            self.cc.add_enum_struct_method(owner, &method.name, pos, tag)?;
        }
        Ok(())
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
