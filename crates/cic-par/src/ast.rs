//! AST node definitions for the CI language.
//!
//! Nodes form three closed sums - [`Expr`], [`Stmt`] and [`TypeDecl`] - plus
//! the [`Program`] root that accumulates declarations across parsed files.
//! Every node records the 1-based source line its first token appeared on.
//! The tree is built bottom-up by the parser and owns its children; the only
//! cross-references are opaque handles ([`LoopId`], [`TypeId`]) into
//! structures that outlive them.

use cic_util::Symbol;
use indexmap::IndexMap;

/// Index of a type in [`Program::types`], in insertion order.
///
/// Method parameter lists carry the id of their declaring class so the
/// resolver can find it without a cyclic reference.
pub type TypeId = usize;

/// Opaque identity of a loop or switch statement.
///
/// Assigned by the parser in encounter order within one parsed file;
/// `break`/`continue` nodes store the id of their enclosing target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopId(pub u32);

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// Expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Interpolated(InterpolatedExpr),
    Symbol(SymbolExpr),
    Prefix(PrefixExpr),
    Postfix(PostfixExpr),
    Binary(BinaryExpr),
    Index(IndexExpr),
    Call(CallExpr),
    Select(SelectExpr),
    Aggregate(AggregateExpr),
    Var(Var),
}

impl Expr {
    /// Line of the expression's first token.
    pub fn line(&self) -> u32 {
        match self {
            Expr::Literal(e) => e.line,
            Expr::Interpolated(e) => e.line,
            Expr::Symbol(e) => e.line,
            Expr::Prefix(e) => e.line,
            Expr::Postfix(e) => e.line,
            Expr::Binary(e) => e.line,
            Expr::Index(e) => e.line,
            Expr::Call(e) => e.line,
            Expr::Select(e) => e.line,
            Expr::Aggregate(e) => e.line,
            Expr::Var(e) => e.line,
        }
    }
}

/// Literal value.
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub line: u32,
    pub value: Literal,
}

/// Decoded literal payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Long(i64),
    Double(f64),
    String(Symbol),
    Bool(bool),
    Null,
}

/// Interpolated string: `$"a{x,3:D2}b{y}c"`.
///
/// There are as many literal prefixes as arguments, interleaved, plus
/// exactly one trailing suffix.
#[derive(Debug, Clone)]
pub struct InterpolatedExpr {
    pub line: u32,
    pub parts: Vec<InterpolatedPart>,
    pub suffix: Symbol,
}

/// One `prefix{argument[,width][:format[precision]]}` part.
#[derive(Debug, Clone)]
pub struct InterpolatedPart {
    pub prefix: Symbol,
    pub argument: Expr,
    pub width: Option<Expr>,
    /// Format character from `DdEeFfGgXx`.
    pub format: Option<char>,
    /// 0..=99.
    pub precision: Option<u8>,
}

/// Symbol reference: `name`, `left.name`, or `Name<T>` for a known generic
/// class (`type_args` is empty for ordinary references).
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub line: u32,
    pub left: Option<Box<Expr>>,
    pub name: Symbol,
    pub type_args: Vec<Expr>,
}

/// Prefix operator application.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub line: u32,
    pub op: PrefixOp,
    pub inner: Box<Expr>,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Minus,
    Complement,
    Not,
    Increment,
    Decrement,
    New,
    Resource,
}

/// Postfix operator application.
#[derive(Debug, Clone)]
pub struct PostfixExpr {
    pub line: u32,
    pub inner: Box<Expr>,
    pub op: PostfixOp,
}

/// Postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Increment,
    Decrement,
    /// `!`
    Bang,
    /// `#`
    Hash,
}

/// Binary operator application.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub line: u32,
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub right: Box<Expr>,
}

/// Binary operators, assignments included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
    CondAnd,
    CondOr,
    Is,
    Range,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
}

/// Indexing: `a[i]`, or the array-type marker `T[]` when `index` is absent.
#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub line: u32,
    pub container: Box<Expr>,
    pub index: Option<Box<Expr>>,
}

/// Method call; `method` is always a [`SymbolExpr`].
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub line: u32,
    pub method: Box<Expr>,
    pub args: Vec<Expr>,
}

/// Ternary select: `cond ? on_true : on_false`.
#[derive(Debug, Clone)]
pub struct SelectExpr {
    pub line: u32,
    pub cond: Box<Expr>,
    pub on_true: Box<Expr>,
    pub on_false: Box<Expr>,
}

/// Brace-delimited aggregate initializer; items are expressions or
/// `field = value` assignments.
#[derive(Debug, Clone)]
pub struct AggregateExpr {
    pub line: u32,
    pub items: Vec<Expr>,
}

/// Variable declaration in expression position: `Type name [= value]`.
///
/// Also used for method parameters, `foreach` iterator variables, and the
/// binding form of `is`.
#[derive(Debug, Clone)]
pub struct Var {
    pub line: u32,
    pub doc: Option<Symbol>,
    pub type_expr: Box<Expr>,
    pub name: Symbol,
    pub value: Option<Box<Expr>>,
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// Statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    Block(BlockStmt),
    Assert(AssertStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Const(Const),
    DoWhile(DoWhileStmt),
    Expr(Expr),
    For(ForStmt),
    Foreach(ForeachStmt),
    If(IfStmt),
    Lock(LockStmt),
    Native(NativeStmt),
    Return(ReturnStmt),
    Switch(SwitchStmt),
    Throw(ThrowStmt),
    While(WhileStmt),
}

impl Stmt {
    /// Line of the statement's first token.
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Block(s) => s.line,
            Stmt::Assert(s) => s.line,
            Stmt::Break(s) => s.line,
            Stmt::Continue(s) => s.line,
            Stmt::Const(s) => s.line,
            Stmt::DoWhile(s) => s.line,
            Stmt::Expr(e) => e.line(),
            Stmt::For(s) => s.line,
            Stmt::Foreach(s) => s.line,
            Stmt::If(s) => s.line,
            Stmt::Lock(s) => s.line,
            Stmt::Native(s) => s.line,
            Stmt::Return(s) => s.line,
            Stmt::Switch(s) => s.line,
            Stmt::Throw(s) => s.line,
            Stmt::While(s) => s.line,
        }
    }
}

/// `{ ... }`
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub line: u32,
    pub stmts: Vec<Stmt>,
}

/// `assert cond [, message];`
#[derive(Debug, Clone)]
pub struct AssertStmt {
    pub line: u32,
    pub cond: Expr,
    pub message: Option<Expr>,
}

/// `break;` - `target` is the enclosing loop or switch.
#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub line: u32,
    pub target: LoopId,
}

/// `continue;` - `target` is the enclosing loop.
#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub line: u32,
    pub target: LoopId,
}

/// `do stmt while (cond);`
#[derive(Debug, Clone)]
pub struct DoWhileStmt {
    pub line: u32,
    pub id: LoopId,
    pub body: Box<Stmt>,
    pub cond: Expr,
    pub has_break: bool,
}

/// `for ([init]; [cond]; [advance]) stmt`
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub line: u32,
    pub id: LoopId,
    pub init: Option<Expr>,
    pub cond: Option<Expr>,
    pub advance: Option<Expr>,
    pub body: Box<Stmt>,
    pub has_break: bool,
}

/// `foreach (Type x in collection) stmt`, with one iterator variable, or
/// two for dictionary iteration.
#[derive(Debug, Clone)]
pub struct ForeachStmt {
    pub line: u32,
    pub id: LoopId,
    pub vars: Vec<Var>,
    pub collection: Expr,
    pub body: Box<Stmt>,
    pub has_break: bool,
}

/// `if (cond) stmt [else stmt]`
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub line: u32,
    pub cond: Expr,
    pub on_true: Box<Stmt>,
    pub on_false: Option<Box<Stmt>>,
}

/// `lock (expr) stmt`
#[derive(Debug, Clone)]
pub struct LockStmt {
    pub line: u32,
    pub lock: Expr,
    pub body: Box<Stmt>,
}

/// `native { ... }` - the content is carried through verbatim.
#[derive(Debug, Clone)]
pub struct NativeStmt {
    pub line: u32,
    pub content: String,
}

/// `return [value];`
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub line: u32,
    pub value: Option<Expr>,
}

/// `switch (value) { case ...: ... default: ... }`
#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub line: u32,
    pub id: LoopId,
    pub value: Expr,
    pub cases: Vec<SwitchCase>,
    pub default_body: Option<Vec<Stmt>>,
}

/// One group of `case value:` labels and the statements that follow.
#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub values: Vec<Expr>,
    pub body: Vec<Stmt>,
}

/// `throw message;`
#[derive(Debug, Clone)]
pub struct ThrowStmt {
    pub line: u32,
    pub message: Expr,
}

/// `while (cond) stmt`
#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub line: u32,
    pub id: LoopId,
    pub cond: Expr,
    pub body: Box<Stmt>,
    pub has_break: bool,
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// Member and type visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Internal,
    Protected,
    Public,
}

/// How a class or method participates in dispatch and inheritance.
///
/// Classes use Normal, Static, Abstract and Sealed; methods use all six.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Normal,
    Static,
    Abstract,
    Virtual,
    Override,
    Sealed,
}

impl CallKind {
    /// Lowercase keyword spelling, for error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            CallKind::Normal => "normal",
            CallKind::Static => "static",
            CallKind::Abstract => "abstract",
            CallKind::Virtual => "virtual",
            CallKind::Override => "override",
            CallKind::Sealed => "sealed",
        }
    }
}

/// A top-level type declaration.
#[derive(Debug, Clone)]
pub enum TypeDecl {
    Class(Class),
    Enum(Enum),
}

impl TypeDecl {
    pub fn name(&self) -> Symbol {
        match self {
            TypeDecl::Class(c) => c.name,
            TypeDecl::Enum(e) => e.name,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            TypeDecl::Class(c) => c.line,
            TypeDecl::Enum(e) => e.line,
        }
    }
}

/// Class declaration.
#[derive(Debug, Clone)]
pub struct Class {
    pub line: u32,
    pub doc: Option<Symbol>,
    pub visibility: Visibility,
    pub call_kind: CallKind,
    pub name: Symbol,
    pub base_class: Option<Symbol>,
    pub constructor: Option<Constructor>,
    pub consts: Vec<Const>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    /// Non-zero only for the built-in generic collection classes.
    pub type_parameter_count: usize,
}

impl Class {
    /// A built-in generic collection class seeded into every program.
    fn builtin(name: &str, type_parameter_count: usize) -> Self {
        Self {
            line: 0,
            doc: None,
            visibility: Visibility::Public,
            call_kind: CallKind::Normal,
            name: Symbol::intern(name),
            base_class: None,
            constructor: None,
            consts: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            type_parameter_count,
        }
    }
}

/// Class constructor.
#[derive(Debug, Clone)]
pub struct Constructor {
    pub line: u32,
    pub doc: Option<Symbol>,
    pub visibility: Visibility,
    pub body: Stmt,
}

/// Constant declaration, at class level or in a block.
#[derive(Debug, Clone)]
pub struct Const {
    pub line: u32,
    pub doc: Option<Symbol>,
    pub visibility: Visibility,
    pub type_expr: Expr,
    pub name: Symbol,
    pub value: Expr,
}

/// Field declaration.
#[derive(Debug, Clone)]
pub struct Field {
    pub line: u32,
    pub doc: Option<Symbol>,
    pub visibility: Visibility,
    pub type_expr: Expr,
    pub name: Symbol,
    pub value: Option<Expr>,
}

/// Method declaration.
#[derive(Debug, Clone)]
pub struct Method {
    pub line: u32,
    pub doc: Option<Symbol>,
    pub visibility: Visibility,
    pub call_kind: CallKind,
    /// `None` is void.
    pub return_type: Option<Expr>,
    pub name: Symbol,
    pub params: Parameters,
    pub is_mutator: bool,
    pub throws: bool,
    /// `None` for abstract methods; `=>` bodies become a single return.
    pub body: Option<Stmt>,
}

/// A method's parameter list, with a back-pointer to the declaring class.
#[derive(Debug, Clone)]
pub struct Parameters {
    pub owner: TypeId,
    pub list: Vec<Var>,
}

/// Enum declaration; `is_flags` marks the starred `enum*` form.
#[derive(Debug, Clone)]
pub struct Enum {
    pub line: u32,
    pub doc: Option<Symbol>,
    pub visibility: Visibility,
    pub name: Symbol,
    pub is_flags: bool,
    pub constants: Vec<EnumConstant>,
}

/// One enum constant.
#[derive(Debug, Clone)]
pub struct EnumConstant {
    pub line: u32,
    pub doc: Option<Symbol>,
    pub name: Symbol,
    pub value: Option<Expr>,
}

// ============================================================================
// PROGRAM
// ============================================================================

/// The accumulating root of one compilation.
///
/// Parsing a file appends its declarations here; a program may be built up
/// from several files in sequence. The built-in generic collection classes
/// are pre-seeded so the parser can validate type-argument arity.
#[derive(Debug, Clone)]
pub struct Program {
    /// Declared types by name, in declaration order (built-ins first).
    pub types: IndexMap<Symbol, TypeDecl>,
    /// Verbatim file-scope `native { ... }` blocks, in order.
    pub top_level_natives: Vec<String>,
}

impl Program {
    /// Creates an empty program with the built-in generic classes.
    pub fn new() -> Self {
        let mut types = IndexMap::new();
        for (name, arity) in [
            ("List", 1),
            ("Stack", 1),
            ("HashSet", 1),
            ("Dictionary", 2),
            ("SortedDictionary", 2),
        ] {
            let class = Class::builtin(name, arity);
            types.insert(class.name, TypeDecl::Class(class));
        }
        Self {
            types,
            top_level_natives: Vec::new(),
        }
    }

    /// Appends a type declaration. The parser has already rejected
    /// duplicates.
    pub fn add(&mut self, decl: TypeDecl) -> TypeId {
        let (id, _) = self.types.insert_full(decl.name(), decl);
        id
    }

    /// Locates a type by simple name.
    pub fn try_lookup(&self, name: Symbol) -> Option<&TypeDecl> {
        self.types.get(&name)
    }

    /// The [`TypeId`] the next added type will receive.
    pub fn next_type_id(&self) -> TypeId {
        self.types.len()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
