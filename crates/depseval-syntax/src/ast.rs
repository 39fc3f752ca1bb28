//! Expression and statement tree.
//!
//! Every node carries the 1-based line it starts on.

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
}

impl Expr {
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Self { kind, line }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// Text string literal; adjacent literals are already concatenated.
    Str(String),
    Bytes(String),
    FormattedStr(String),
    /// Numeric literal as written.
    Num(String),
    Ellipsis,
    Name(String),
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Set(Vec<Expr>),
    Dict(Vec<DictItem>),
    Starred(Box<Expr>),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
        starargs: Option<Box<Expr>>,
        kwargs: Option<Box<Expr>>,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },
    Comprehension {
        kind: ComprehensionKind,
        element: Box<Expr>,
        /// Value expression of a dict comprehension.
        value: Option<Box<Expr>>,
        generators: Vec<Generator>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Boolean chain; `a or b or c` is one node with three values.
    BoolOp {
        op: BoolOp,
        values: Vec<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Compare {
        left: Box<Expr>,
        comparisons: Vec<(CmpOp, Expr)>,
    },
    NamedExpr {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

impl ExprKind {
    /// Short node-kind name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Str(_) => "Str",
            ExprKind::Bytes(_) => "Bytes",
            ExprKind::FormattedStr(_) => "JoinedStr",
            ExprKind::Num(_) => "Num",
            ExprKind::Ellipsis => "Ellipsis",
            ExprKind::Name(_) => "Name",
            ExprKind::Tuple(_) => "Tuple",
            ExprKind::List(_) => "List",
            ExprKind::Set(_) => "Set",
            ExprKind::Dict(_) => "Dict",
            ExprKind::Starred(_) => "Starred",
            ExprKind::Call { .. } => "Call",
            ExprKind::Attribute { .. } => "Attribute",
            ExprKind::Subscript { .. } => "Subscript",
            ExprKind::Slice { .. } => "Slice",
            ExprKind::Lambda { .. } => "Lambda",
            ExprKind::Comprehension { kind, .. } => kind.name(),
            ExprKind::IfExp { .. } => "IfExp",
            ExprKind::BinOp { .. } => "BinOp",
            ExprKind::BoolOp { .. } => "BoolOp",
            ExprKind::UnaryOp { .. } => "UnaryOp",
            ExprKind::Compare { .. } => "Compare",
            ExprKind::NamedExpr { .. } => "NamedExpr",
        }
    }
}

/// One `key: value` entry of a dict display; `key` is `None` for `**mapping`.
#[derive(Clone, Debug, PartialEq)]
pub struct DictItem {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub value: Expr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

impl ComprehensionKind {
    pub fn name(self) -> &'static str {
        match self {
            ComprehensionKind::List => "ListComp",
            ComprehensionKind::Set => "SetComp",
            ComprehensionKind::Dict => "DictComp",
            ComprehensionKind::Generator => "GeneratorExp",
        }
    }
}

/// `for target in iter if cond...` clause of a comprehension.
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    pub target: Expr,
    pub iter: Expr,
    pub conditions: Vec<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mult => "*",
            BinOp::MatMult => "@",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn keyword(self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    Invert,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Invert => "~",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `a = b = value` has two targets.
    Assign { targets: Vec<Expr>, value: Expr },
    AugAssign { target: Expr, op: BinOp, value: Expr },
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },
    Expr(Expr),
    /// Single-line keyword statement (`pass`, `import`, `del`, ...), by keyword.
    Simple(String),
    /// Block statement (`if`, `for`, `def`, ...) including its indented body, by keyword.
    Compound(String),
}

impl StmtKind {
    pub fn name(&self) -> String {
        match self {
            StmtKind::Assign { .. } => "Assign".to_string(),
            StmtKind::AugAssign { .. } => "AugAssign".to_string(),
            StmtKind::AnnAssign { .. } => "AnnAssign".to_string(),
            StmtKind::Expr(_) => "Expr".to_string(),
            StmtKind::Simple(kw) | StmtKind::Compound(kw) => format!("'{kw}' statement"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

/// Either parse mode's result.
#[derive(Clone, Debug, PartialEq)]
pub enum Tree {
    Module(Module),
    Expression(Expr),
}

impl Tree {
    pub fn name(&self) -> &'static str {
        match self {
            Tree::Module(_) => "Module",
            Tree::Expression(_) => "Expression",
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Tree::Module(m) => m.body.first().map(|s| s.line).unwrap_or(1),
            Tree::Expression(e) => e.line,
        }
    }
}
