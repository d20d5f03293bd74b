//! Declaration nodes
//!
//! The parser hands us one [`Decl`] per declared name. Declarations live in a
//! [`DeclArena`] owned by the compilation context and are addressed by
//! [`DeclId`]; they are never freed individually.

use crate::semantic::symbol::SymbolId;
use crate::types::TypeTag;
use crate::utils::TokenPos;

/// Handle to a declaration in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub usize);

/// A declaration node
#[derive(Debug, Clone)]
pub struct Decl {
    pub name: String,
    pub pos: TokenPos,
    pub kind: DeclKind,
    /// Symbol entry attached once the declaration is analyzed
    pub sym: Option<SymbolId>,
    /// Older declaration sharing the same name slot, see `Scope::add_chain`
    pub next: Option<DeclId>,
}

/// Kind of declaration
#[derive(Debug, Clone)]
pub enum DeclKind {
    Function(FunctionDecl),
    Variable(VarDecl),
    Constant(ConstDecl),
}

/// A function, native, forward declaration or enum struct method
#[derive(Debug, Clone, Default)]
pub struct FunctionDecl {
    pub return_tag: TypeTag,
    pub is_native: bool,
    pub is_public: bool,
    pub is_stock: bool,
    /// Prototype without a body
    pub is_forward: bool,
    /// Owning enum struct, for methods
    pub method_of: Option<TypeTag>,
    /// Representative among forward declarations and the definition.
    /// `None` means this declaration is its own canonical node.
    pub(crate) canonical: Option<DeclId>,
}

impl FunctionDecl {
    /// Natives and forward declarations have no body
    pub fn has_body(&self) -> bool {
        !self.is_native && !self.is_forward
    }
}

/// A variable, parameter or enum struct field
#[derive(Debug, Clone, Default)]
pub struct VarDecl {
    pub tag: TypeTag,
    pub is_read: bool,
    pub is_written: bool,
}

/// A named compile-time constant
#[derive(Debug, Clone, Default)]
pub struct ConstDecl {
    pub tag: TypeTag,
    pub value: i32,
}

impl Decl {
    pub fn new(name: impl Into<String>, pos: TokenPos, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            pos,
            kind,
            sym: None,
            next: None,
        }
    }

    pub fn function(name: impl Into<String>, pos: TokenPos, func: FunctionDecl) -> Self {
        Self::new(name, pos, DeclKind::Function(func))
    }

    pub fn variable(name: impl Into<String>, pos: TokenPos, tag: TypeTag) -> Self {
        Self::new(
            name,
            pos,
            DeclKind::Variable(VarDecl {
                tag,
                ..VarDecl::default()
            }),
        )
    }

    pub fn constant(name: impl Into<String>, pos: TokenPos, tag: TypeTag, value: i32) -> Self {
        Self::new(name, pos, DeclKind::Constant(ConstDecl { tag, value }))
    }

    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionDecl> {
        match &mut self.kind {
            DeclKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VarDecl> {
        match &self.kind {
            DeclKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_variable_mut(&mut self) -> Option<&mut VarDecl> {
        match &mut self.kind {
            DeclKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, DeclKind::Function(_))
    }
}

/// Owner for all declarations of a compilation unit
#[derive(Debug, Default)]
pub struct DeclArena {
    decls: Vec<Decl>,
}

impl DeclArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len());
        self.decls.push(decl);
        id
    }

    pub fn get(&self, id: DeclId) -> &Decl {
        &self.decls[id.0]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.0]
    }

    /// Canonical representative of a function; identity for everything else.
    pub fn canonical(&self, id: DeclId) -> DeclId {
        self.get(id)
            .as_function()
            .and_then(|f| f.canonical)
            .unwrap_or(id)
    }

    /// Make `id` a redeclaration of `prior`. The link always points at the
    /// prior's own representative, so lookups never walk more than one hop.
    pub fn link_canonical(&mut self, id: DeclId, prior: DeclId) {
        let target = self.canonical(prior);
        if target == id {
            return;
        }
        if let Some(func) = self.get_mut(id).as_function_mut() {
            func.canonical = Some(target);
        }
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.decls.iter().enumerate().map(|(i, d)| (DeclId(i), d))
    }
}
