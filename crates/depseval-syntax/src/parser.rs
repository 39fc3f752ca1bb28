//! Recursive-descent parser over logical-line tokens.
//!
//! Grammar levels follow the usual expression precedence: lambda, conditional expression,
//! `or`, `and`, `not`, comparisons, `|`, `^`, `&`, shifts, `+ -`, `* / // % @`, unary, `**`,
//! then atoms with call/subscript/attribute trailers.

use crate::ast::{
    BinOp, BoolOp, CmpOp, ComprehensionKind, DictItem, Expr, ExprKind, Generator, Keyword,
    Module, Stmt, StmtKind, UnaryOp,
};
use crate::error::SyntaxError;
use crate::lexer::tokenize;
use crate::token::{Op, StrKind, Token, TokenKind};

type PResult<T> = Result<T, SyntaxError>;

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

const COMPOUND_KEYWORDS: &[&str] = &["if", "for", "while", "def", "class", "with", "try", "async"];

const SIMPLE_KEYWORDS: &[&str] = &[
    "pass", "break", "continue", "return", "raise", "global", "nonlocal", "del", "import", "from",
    "assert", "yield", "await",
];

/// Clauses that continue a block statement at the block's own indentation.
const BLOCK_CONTINUATIONS: &[&str] = &["elif", "else", "except", "finally"];

const BINARY_LEVELS: &[&[(Op, BinOp)]] = &[
    &[(Op::Pipe, BinOp::BitOr)],
    &[(Op::Caret, BinOp::BitXor)],
    &[(Op::Amp, BinOp::BitAnd)],
    &[(Op::Shl, BinOp::LShift), (Op::Shr, BinOp::RShift)],
    &[(Op::Plus, BinOp::Add), (Op::Minus, BinOp::Sub)],
    &[
        (Op::Star, BinOp::Mult),
        (Op::Slash, BinOp::Div),
        (Op::DoubleSlash, BinOp::FloorDiv),
        (Op::Percent, BinOp::Mod),
        (Op::At, BinOp::MatMult),
    ],
];

const AUG_ASSIGN: &[(Op, BinOp)] = &[
    (Op::PlusEq, BinOp::Add),
    (Op::MinusEq, BinOp::Sub),
    (Op::StarEq, BinOp::Mult),
    (Op::AtEq, BinOp::MatMult),
    (Op::SlashEq, BinOp::Div),
    (Op::DoubleSlashEq, BinOp::FloorDiv),
    (Op::PercentEq, BinOp::Mod),
    (Op::DoubleStarEq, BinOp::Pow),
    (Op::ShlEq, BinOp::LShift),
    (Op::ShrEq, BinOp::RShift),
    (Op::PipeEq, BinOp::BitOr),
    (Op::CaretEq, BinOp::BitXor),
    (Op::AmpEq, BinOp::BitAnd),
];

/// Parse manifest text as a sequence of statements.
pub fn parse_module(source: &str, filename: &str) -> Result<Module, SyntaxError> {
    let tokens = tokenize(source, filename)?;
    Parser::new(tokens, filename).module()
}

/// Parse text holding a single expression (a bare comma list is a tuple).
pub fn parse_expression(source: &str, filename: &str) -> Result<Expr, SyntaxError> {
    let tokens = tokenize(source, filename)?;
    let mut parser = Parser::new(tokens, filename);
    let expr = parser.testlist(false)?;
    parser.eat_newlines();
    if !parser.at_eof() {
        return Err(parser.unexpected());
    }
    Ok(expr)
}

struct Parser<'f> {
    tokens: Vec<Token>,
    pos: usize,
    filename: &'f str,
}

impl<'f> Parser<'f> {
    fn new(tokens: Vec<Token>, filename: &'f str) -> Self {
        Self {
            tokens,
            pos: 0,
            filename,
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn at_op(&self, op: Op) -> bool {
        self.peek().is_op(op)
    }

    fn eat_op(&mut self, op: Op) -> bool {
        if self.at_op(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_op(&mut self, op: Op) -> PResult<Token> {
        if self.at_op(op) {
            return Ok(self.advance());
        }
        Err(self.error(format!(
            "invalid syntax: expected '{}', found {}",
            op.as_str(),
            self.peek().kind
        )))
    }

    fn at_kw(&self, kw: &str) -> bool {
        self.peek().is_name(kw)
    }

    fn eat_kw(&mut self, kw: &str) -> bool {
        if self.at_kw(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_kw(&mut self, kw: &str) -> PResult<()> {
        if self.eat_kw(kw) {
            return Ok(());
        }
        Err(self.error(format!(
            "invalid syntax: expected '{kw}', found {}",
            self.peek().kind
        )))
    }

    fn expect_name(&mut self) -> PResult<String> {
        match &self.peek().kind {
            TokenKind::Name(n) if !KEYWORDS.contains(&n.as_str()) => {
                let n = n.clone();
                self.advance();
                Ok(n)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn eat_newlines(&mut self) {
        while self.peek().kind == TokenKind::Newline {
            self.advance();
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.filename, self.peek().line, message)
    }

    fn unexpected(&self) -> SyntaxError {
        self.error(format!("invalid syntax: unexpected {}", self.peek().kind))
    }

    /// Whether the current token can begin an expression.
    fn starts_expression(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Name(n) => {
                !KEYWORDS.contains(&n.as_str()) || matches!(n.as_str(), "not" | "lambda")
            }
            TokenKind::Str { .. } | TokenKind::Number(_) => true,
            TokenKind::Op(op) => matches!(
                op,
                Op::LParen
                    | Op::LBracket
                    | Op::LBrace
                    | Op::Minus
                    | Op::Plus
                    | Op::Tilde
                    | Op::Star
                    | Op::Ellipsis
            ),
            TokenKind::Newline | TokenKind::Eof => false,
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn module(&mut self) -> PResult<Module> {
        let mut body = Vec::new();
        loop {
            self.eat_newlines();
            if self.at_eof() {
                break;
            }
            self.statement_line(&mut body)?;
        }
        Ok(Module { body })
    }

    fn statement_line(&mut self, body: &mut Vec<Stmt>) -> PResult<()> {
        let at_compound = match &self.peek().kind {
            TokenKind::Name(n) => COMPOUND_KEYWORDS.contains(&n.as_str()),
            TokenKind::Op(Op::At) => true,
            _ => false,
        };
        if at_compound {
            body.push(self.compound_statement());
            return Ok(());
        }

        loop {
            body.push(self.simple_statement()?);
            if self.eat_op(Op::Semi) && !self.at_line_end() {
                continue;
            }
            break;
        }
        if !self.at_line_end() {
            return Err(self.unexpected());
        }
        self.eat_newlines();
        Ok(())
    }

    /// Consume a block statement and its indented body without interpreting it.
    fn compound_statement(&mut self) -> Stmt {
        let start = self.advance();
        let keyword = match &start.kind {
            TokenKind::Name(n) => n.clone(),
            other => other.to_string().trim_matches('\'').to_string(),
        };

        loop {
            while !self.at_line_end() {
                self.advance();
            }
            if self.at_eof() {
                break;
            }
            self.advance();
            let next = self.peek();
            if next.kind == TokenKind::Eof {
                break;
            }
            let continues_block = next.col > start.col
                || (next.col == start.col
                    && BLOCK_CONTINUATIONS.iter().any(|kw| next.is_name(kw)));
            if !continues_block {
                break;
            }
        }

        Stmt {
            kind: StmtKind::Compound(keyword),
            line: start.line,
        }
    }

    fn simple_statement(&mut self) -> PResult<Stmt> {
        let line = self.peek().line;

        if let TokenKind::Name(n) = &self.peek().kind
            && SIMPLE_KEYWORDS.contains(&n.as_str())
        {
            let keyword = n.clone();
            self.advance();
            while !self.at_line_end() && !self.at_op(Op::Semi) {
                self.advance();
            }
            return Ok(Stmt {
                kind: StmtKind::Simple(keyword),
                line,
            });
        }

        let first = self.testlist(true)?;

        if self.at_op(Op::Assign) {
            let mut targets = vec![first];
            let value = loop {
                self.expect_op(Op::Assign)?;
                let next = self.testlist(true)?;
                if !self.at_op(Op::Assign) {
                    break next;
                }
                targets.push(next);
            };
            return Ok(Stmt {
                kind: StmtKind::Assign { targets, value },
                line,
            });
        }

        if let Some(&(_, op)) = AUG_ASSIGN.iter().find(|(tok, _)| self.at_op(*tok)) {
            self.advance();
            let value = self.testlist(true)?;
            return Ok(Stmt {
                kind: StmtKind::AugAssign {
                    target: first,
                    op,
                    value,
                },
                line,
            });
        }

        if self.eat_op(Op::Colon) {
            let annotation = self.test()?;
            let value = if self.eat_op(Op::Assign) {
                Some(self.testlist(true)?)
            } else {
                None
            };
            return Ok(Stmt {
                kind: StmtKind::AnnAssign {
                    target: first,
                    annotation,
                    value,
                },
                line,
            });
        }

        Ok(Stmt {
            kind: StmtKind::Expr(first),
            line,
        })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Comma-separated expressions; more than one (or a trailing comma) makes a tuple.
    fn testlist(&mut self, allow_star: bool) -> PResult<Expr> {
        let line = self.peek().line;
        let first = self.test_or_star(allow_star)?;
        if !self.at_op(Op::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat_op(Op::Comma) {
            if !self.starts_expression() {
                break;
            }
            items.push(self.test_or_star(allow_star)?);
        }
        Ok(Expr::new(ExprKind::Tuple(items), line))
    }

    fn test_or_star(&mut self, allow_star: bool) -> PResult<Expr> {
        if allow_star && self.at_op(Op::Star) {
            let line = self.advance().line;
            let inner = self.bitor()?;
            return Ok(Expr::new(ExprKind::Starred(Box::new(inner)), line));
        }
        self.test()
    }

    fn test(&mut self) -> PResult<Expr> {
        if self.at_kw("lambda") {
            return self.lambda();
        }
        let body = self.or_test()?;
        let line = body.line;

        if self.eat_kw("if") {
            let test = self.or_test()?;
            self.expect_kw("else")?;
            let orelse = self.test()?;
            return Ok(Expr::new(
                ExprKind::IfExp {
                    test: Box::new(test),
                    body: Box::new(body),
                    orelse: Box::new(orelse),
                },
                line,
            ));
        }

        if self.eat_op(Op::Walrus) {
            let value = self.test()?;
            return Ok(Expr::new(
                ExprKind::NamedExpr {
                    target: Box::new(body),
                    value: Box::new(value),
                },
                line,
            ));
        }

        Ok(body)
    }

    fn lambda(&mut self) -> PResult<Expr> {
        let line = self.advance().line;
        let mut params = Vec::new();
        while !self.at_op(Op::Colon) {
            if !self.eat_op(Op::Star) {
                self.eat_op(Op::DoubleStar);
            }
            params.push(self.expect_name()?);
            if self.eat_op(Op::Assign) {
                self.test()?;
            }
            if !self.eat_op(Op::Comma) {
                break;
            }
        }
        self.expect_op(Op::Colon)?;
        let body = self.test()?;
        Ok(Expr::new(
            ExprKind::Lambda {
                params,
                body: Box::new(body),
            },
            line,
        ))
    }

    fn or_test(&mut self) -> PResult<Expr> {
        self.bool_chain(BoolOp::Or)
    }

    fn bool_operand(&mut self, op: BoolOp) -> PResult<Expr> {
        match op {
            BoolOp::Or => self.bool_chain(BoolOp::And),
            BoolOp::And => self.not_test(),
        }
    }

    fn bool_chain(&mut self, op: BoolOp) -> PResult<Expr> {
        let first = self.bool_operand(op)?;
        if !self.at_kw(op.keyword()) {
            return Ok(first);
        }
        let line = first.line;
        let mut values = vec![first];
        while self.eat_kw(op.keyword()) {
            values.push(self.bool_operand(op)?);
        }
        Ok(Expr::new(ExprKind::BoolOp { op, values }, line))
    }

    fn not_test(&mut self) -> PResult<Expr> {
        if self.at_kw("not") {
            let line = self.advance().line;
            let operand = self.not_test()?;
            return Ok(Expr::new(
                ExprKind::UnaryOp {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                line,
            ));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> PResult<Expr> {
        let left = self.bitor()?;
        let mut comparisons = Vec::new();
        loop {
            let (op, width) = match &self.peek().kind {
                TokenKind::Op(Op::Lt) => (CmpOp::Lt, 1),
                TokenKind::Op(Op::Gt) => (CmpOp::Gt, 1),
                TokenKind::Op(Op::LtEq) => (CmpOp::LtE, 1),
                TokenKind::Op(Op::GtEq) => (CmpOp::GtE, 1),
                TokenKind::Op(Op::EqEq) => (CmpOp::Eq, 1),
                TokenKind::Op(Op::NotEq) => (CmpOp::NotEq, 1),
                TokenKind::Name(n) if n == "in" => (CmpOp::In, 1),
                TokenKind::Name(n) if n == "not" && self.peek_at(1).is_name("in") => {
                    (CmpOp::NotIn, 2)
                }
                TokenKind::Name(n) if n == "is" => {
                    if self.peek_at(1).is_name("not") {
                        (CmpOp::IsNot, 2)
                    } else {
                        (CmpOp::Is, 1)
                    }
                }
                _ => break,
            };
            for _ in 0..width {
                self.advance();
            }
            comparisons.push((op, self.bitor()?));
        }
        if comparisons.is_empty() {
            return Ok(left);
        }
        let line = left.line;
        Ok(Expr::new(
            ExprKind::Compare {
                left: Box::new(left),
                comparisons,
            },
            line,
        ))
    }

    fn bitor(&mut self) -> PResult<Expr> {
        self.binary(0)
    }

    fn binary(&mut self, level: usize) -> PResult<Expr> {
        if level == BINARY_LEVELS.len() {
            return self.factor();
        }
        let mut left = self.binary(level + 1)?;
        while let Some(&(_, op)) = BINARY_LEVELS[level]
            .iter()
            .find(|(tok, _)| self.at_op(*tok))
        {
            self.advance();
            let right = self.binary(level + 1)?;
            let line = left.line;
            left = Expr::new(
                ExprKind::BinOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                line,
            );
        }
        Ok(left)
    }

    fn factor(&mut self) -> PResult<Expr> {
        let op = match self.peek().kind {
            TokenKind::Op(Op::Minus) => Some(UnaryOp::Neg),
            TokenKind::Op(Op::Plus) => Some(UnaryOp::Pos),
            TokenKind::Op(Op::Tilde) => Some(UnaryOp::Invert),
            _ => None,
        };
        if let Some(op) = op {
            let line = self.advance().line;
            let operand = self.factor()?;
            return Ok(Expr::new(
                ExprKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
                line,
            ));
        }
        self.power()
    }

    fn power(&mut self) -> PResult<Expr> {
        let base = self.atom_expr()?;
        if !self.eat_op(Op::DoubleStar) {
            return Ok(base);
        }
        let exponent = self.factor()?;
        let line = base.line;
        Ok(Expr::new(
            ExprKind::BinOp {
                op: BinOp::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
            },
            line,
        ))
    }

    fn atom_expr(&mut self) -> PResult<Expr> {
        let mut expr = self.atom()?;
        loop {
            if self.at_op(Op::LParen) {
                expr = self.call(expr)?;
            } else if self.at_op(Op::LBracket) {
                expr = self.subscript(expr)?;
            } else if self.eat_op(Op::Dot) {
                let attr = self.expect_name()?;
                let line = expr.line;
                expr = Expr::new(
                    ExprKind::Attribute {
                        value: Box::new(expr),
                        attr,
                    },
                    line,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn call(&mut self, func: Expr) -> PResult<Expr> {
        let line = func.line;
        self.expect_op(Op::LParen)?;
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        let mut starargs = None;
        let mut kwargs = None;

        while !self.at_op(Op::RParen) {
            if self.eat_op(Op::Star) {
                starargs = Some(Box::new(self.test()?));
            } else if self.eat_op(Op::DoubleStar) {
                kwargs = Some(Box::new(self.test()?));
            } else if matches!(self.peek().kind, TokenKind::Name(_))
                && self.peek_at(1).is_op(Op::Assign)
            {
                let name = self.expect_name()?;
                self.advance();
                let value = self.test()?;
                keywords.push(Keyword { name, value });
            } else {
                let arg = self.test()?;
                if self.at_kw("for") {
                    let arg_line = arg.line;
                    args.push(self.comprehension(
                        ComprehensionKind::Generator,
                        arg,
                        None,
                        arg_line,
                    )?);
                } else {
                    args.push(arg);
                }
            }
            if !self.eat_op(Op::Comma) {
                break;
            }
        }
        self.expect_op(Op::RParen)?;

        Ok(Expr::new(
            ExprKind::Call {
                func: Box::new(func),
                args,
                keywords,
                starargs,
                kwargs,
            },
            line,
        ))
    }

    fn subscript(&mut self, value: Expr) -> PResult<Expr> {
        let line = value.line;
        let open = self.expect_op(Op::LBracket)?;
        let first = self.subscript_item()?;
        let index = if self.at_op(Op::Comma) {
            let mut items = vec![first];
            while self.eat_op(Op::Comma) {
                if self.at_op(Op::RBracket) {
                    break;
                }
                items.push(self.subscript_item()?);
            }
            Expr::new(ExprKind::Tuple(items), open.line)
        } else {
            first
        };
        self.expect_op(Op::RBracket)?;
        Ok(Expr::new(
            ExprKind::Subscript {
                value: Box::new(value),
                index: Box::new(index),
            },
            line,
        ))
    }

    fn subscript_item(&mut self) -> PResult<Expr> {
        let line = self.peek().line;
        let lower = if self.at_op(Op::Colon) {
            None
        } else {
            let expr = self.test()?;
            if !self.at_op(Op::Colon) {
                return Ok(expr);
            }
            Some(Box::new(expr))
        };
        self.expect_op(Op::Colon)?;
        let slice_end = |p: &Self| p.at_op(Op::Colon) || p.at_op(Op::RBracket) || p.at_op(Op::Comma);
        let upper = if slice_end(self) {
            None
        } else {
            Some(Box::new(self.test()?))
        };
        let step = if self.eat_op(Op::Colon) && !slice_end(self) {
            Some(Box::new(self.test()?))
        } else {
            None
        };
        Ok(Expr::new(ExprKind::Slice { lower, upper, step }, line))
    }

    fn atom(&mut self) -> PResult<Expr> {
        let line = self.peek().line;
        match &self.peek().kind {
            TokenKind::Name(n) => {
                if KEYWORDS.contains(&n.as_str()) {
                    return Err(self.unexpected());
                }
                let name = n.clone();
                self.advance();
                Ok(Expr::new(ExprKind::Name(name), line))
            }
            TokenKind::Number(n) => {
                let text = n.clone();
                self.advance();
                Ok(Expr::new(ExprKind::Num(text), line))
            }
            TokenKind::Str { .. } => self.strings(),
            TokenKind::Op(Op::LParen) => self.paren(),
            TokenKind::Op(Op::LBracket) => self.list(),
            TokenKind::Op(Op::LBrace) => self.brace(),
            TokenKind::Op(Op::Ellipsis) => {
                self.advance();
                Ok(Expr::new(ExprKind::Ellipsis, line))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Adjacent string literals concatenate into one node.
    fn strings(&mut self) -> PResult<Expr> {
        let line = self.peek().line;
        let mut value = String::new();
        let mut kinds = Vec::new();
        while let TokenKind::Str { kind, value: part } = &self.peek().kind {
            value.push_str(part);
            kinds.push(*kind);
            self.advance();
        }

        let has_bytes = kinds.contains(&StrKind::Bytes);
        if has_bytes && kinds.iter().any(|k| *k != StrKind::Bytes) {
            return Err(SyntaxError::new(
                self.filename,
                line,
                "cannot mix bytes and nonbytes literals",
            ));
        }
        let kind = if has_bytes {
            ExprKind::Bytes(value)
        } else if kinds.contains(&StrKind::Formatted) {
            ExprKind::FormattedStr(value)
        } else {
            ExprKind::Str(value)
        };
        Ok(Expr::new(kind, line))
    }

    fn paren(&mut self) -> PResult<Expr> {
        let line = self.advance().line;
        if self.eat_op(Op::RParen) {
            return Ok(Expr::new(ExprKind::Tuple(Vec::new()), line));
        }
        let first = self.test_or_star(true)?;
        if self.at_kw("for") {
            let genexp = self.comprehension(ComprehensionKind::Generator, first, None, line)?;
            self.expect_op(Op::RParen)?;
            return Ok(genexp);
        }
        if self.eat_op(Op::RParen) {
            return Ok(first);
        }
        let items = self.sequence_rest(first, Op::RParen)?;
        Ok(Expr::new(ExprKind::Tuple(items), line))
    }

    fn list(&mut self) -> PResult<Expr> {
        let line = self.advance().line;
        if self.eat_op(Op::RBracket) {
            return Ok(Expr::new(ExprKind::List(Vec::new()), line));
        }
        let first = self.test_or_star(true)?;
        if self.at_kw("for") {
            let comp = self.comprehension(ComprehensionKind::List, first, None, line)?;
            self.expect_op(Op::RBracket)?;
            return Ok(comp);
        }
        let items = self.sequence_rest(first, Op::RBracket)?;
        Ok(Expr::new(ExprKind::List(items), line))
    }

    /// Remaining `, item` elements of a display up to and including `close`.
    fn sequence_rest(&mut self, first: Expr, close: Op) -> PResult<Vec<Expr>> {
        let mut items = vec![first];
        while self.eat_op(Op::Comma) {
            if self.at_op(close) {
                break;
            }
            items.push(self.test_or_star(true)?);
        }
        self.expect_op(close)?;
        Ok(items)
    }

    fn brace(&mut self) -> PResult<Expr> {
        let line = self.advance().line;
        if self.eat_op(Op::RBrace) {
            return Ok(Expr::new(ExprKind::Dict(Vec::new()), line));
        }

        if self.eat_op(Op::DoubleStar) {
            let value = self.bitor()?;
            let items = self.dict_rest(DictItem { key: None, value })?;
            return Ok(Expr::new(ExprKind::Dict(items), line));
        }

        let first = self.test_or_star(true)?;
        if self.eat_op(Op::Colon) {
            let value = self.test()?;
            if self.at_kw("for") {
                let comp =
                    self.comprehension(ComprehensionKind::Dict, first, Some(value), line)?;
                self.expect_op(Op::RBrace)?;
                return Ok(comp);
            }
            let items = self.dict_rest(DictItem {
                key: Some(first),
                value,
            })?;
            return Ok(Expr::new(ExprKind::Dict(items), line));
        }

        if self.at_kw("for") {
            let comp = self.comprehension(ComprehensionKind::Set, first, None, line)?;
            self.expect_op(Op::RBrace)?;
            return Ok(comp);
        }
        let items = self.sequence_rest(first, Op::RBrace)?;
        Ok(Expr::new(ExprKind::Set(items), line))
    }

    fn dict_rest(&mut self, first: DictItem) -> PResult<Vec<DictItem>> {
        let mut items = vec![first];
        while self.eat_op(Op::Comma) {
            if self.at_op(Op::RBrace) {
                break;
            }
            if self.eat_op(Op::DoubleStar) {
                let value = self.bitor()?;
                items.push(DictItem { key: None, value });
                continue;
            }
            let key = self.test()?;
            self.expect_op(Op::Colon)?;
            let value = self.test()?;
            items.push(DictItem {
                key: Some(key),
                value,
            });
        }
        self.expect_op(Op::RBrace)?;
        Ok(items)
    }

    fn comprehension(
        &mut self,
        kind: ComprehensionKind,
        element: Expr,
        value: Option<Expr>,
        line: u32,
    ) -> PResult<Expr> {
        let mut generators = Vec::new();
        while self.eat_kw("for") {
            let target = self.target_list()?;
            self.expect_kw("in")?;
            let iter = self.or_test()?;
            let mut conditions = Vec::new();
            while self.eat_kw("if") {
                conditions.push(self.or_test()?);
            }
            generators.push(Generator {
                target,
                iter,
                conditions,
            });
        }
        Ok(Expr::new(
            ExprKind::Comprehension {
                kind,
                element: Box::new(element),
                value: value.map(Box::new),
                generators,
            },
            line,
        ))
    }

    fn target_list(&mut self) -> PResult<Expr> {
        let line = self.peek().line;
        let first = self.target()?;
        if !self.at_op(Op::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat_op(Op::Comma) {
            if self.at_kw("in") {
                break;
            }
            items.push(self.target()?);
        }
        Ok(Expr::new(ExprKind::Tuple(items), line))
    }

    fn target(&mut self) -> PResult<Expr> {
        if self.at_op(Op::Star) {
            let line = self.advance().line;
            let inner = self.bitor()?;
            return Ok(Expr::new(ExprKind::Starred(Box::new(inner)), line));
        }
        self.bitor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(source: &str) -> Module {
        parse_module(source, "<test>").expect("parse module")
    }

    fn expr(source: &str) -> Expr {
        parse_expression(source, "<test>").expect("parse expression")
    }

    fn s(v: &str) -> ExprKind {
        ExprKind::Str(v.to_string())
    }

    fn name(v: &str) -> ExprKind {
        ExprKind::Name(v.to_string())
    }

    #[test]
    fn parses_flat_assignments_with_lines() {
        let m = module("vars = {'a': 'x'}\n\ndeps = {\n  'src': Var('a') + '@1',\n}\n");
        assert_eq!(m.body.len(), 2);
        assert_eq!(m.body[0].line, 1);
        assert_eq!(m.body[1].line, 3);

        let StmtKind::Assign { targets, value } = &m.body[1].kind else {
            panic!("expected assignment");
        };
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].kind, name("deps"));
        let ExprKind::Dict(items) = &value.kind else {
            panic!("expected dict");
        };
        assert_eq!(items.len(), 1);
        let ExprKind::BinOp { op, left, .. } = &items[0].value.kind else {
            panic!("expected binop");
        };
        assert_eq!(*op, BinOp::Add);
        assert!(matches!(left.kind, ExprKind::Call { .. }));
        assert_eq!(items[0].value.line, 4);
    }

    #[test]
    fn boolean_chains_stay_n_ary() {
        let e = expr("a or b or c");
        let ExprKind::BoolOp { op, values } = e.kind else {
            panic!("expected boolop");
        };
        assert_eq!(op, BoolOp::Or);
        assert_eq!(values.len(), 3);

        let e = expr("a and b or c");
        let ExprKind::BoolOp { op, values } = e.kind else {
            panic!("expected boolop");
        };
        assert_eq!(op, BoolOp::Or);
        assert_eq!(values.len(), 2);
        assert!(matches!(values[0].kind, ExprKind::BoolOp { op: BoolOp::And, .. }));
    }

    #[test]
    fn chained_assignment_has_several_targets() {
        let m = module("a = b = 'x'");
        let StmtKind::Assign { targets, value } = &m.body[0].kind else {
            panic!("expected assignment");
        };
        assert_eq!(targets.len(), 2);
        assert_eq!(value.kind, s("x"));
    }

    #[test]
    fn destructuring_target_is_a_tuple() {
        let m = module("a, b = 'x', 'y'");
        let StmtKind::Assign { targets, value } = &m.body[0].kind else {
            panic!("expected assignment");
        };
        assert!(matches!(targets[0].kind, ExprKind::Tuple(ref t) if t.len() == 2));
        assert!(matches!(value.kind, ExprKind::Tuple(ref t) if t.len() == 2));
    }

    #[test]
    fn compound_statements_swallow_their_block() {
        let m = module(
            "if x:\n    y = 'a'\nelif z:\n    y = 'b'\nelse:\n    y = 'c'\n\n@dec\ndef f():\n    return 1\nw = 'd'\n",
        );
        let kinds: Vec<_> = m.body.iter().map(|s| s.kind.name()).collect();
        assert_eq!(
            kinds,
            vec!["'if' statement", "'@' statement", "'def' statement", "Assign"]
        );
        assert_eq!(m.body[3].line, 11);
    }

    #[test]
    fn simple_keyword_and_other_statements() {
        let m = module("import os; pass\nx += 'a'\ny: str = 'b'\nf()\n");
        let kinds: Vec<_> = m.body.iter().map(|s| s.kind.name()).collect();
        assert_eq!(
            kinds,
            vec![
                "'import' statement",
                "'pass' statement",
                "AugAssign",
                "AnnAssign",
                "Expr"
            ]
        );
    }

    #[test]
    fn calls_keep_argument_shapes_apart() {
        let e = expr("f('a', b='c', *rest, **kw)");
        let ExprKind::Call {
            args,
            keywords,
            starargs,
            kwargs,
            ..
        } = e.kind
        else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 1);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].name, "b");
        assert!(starargs.is_some());
        assert!(kwargs.is_some());
    }

    #[test]
    fn parses_constructs_the_evaluator_rejects() {
        assert_eq!(expr("lambda x, y=1: x").kind.name(), "Lambda");
        assert_eq!(expr("[x for x in y if x]").kind.name(), "ListComp");
        assert_eq!(expr("{k: v for k, v in items}").kind.name(), "DictComp");
        assert_eq!(expr("{'a', 'b'}").kind.name(), "Set");
        assert_eq!(expr("x[1:2]").kind.name(), "Subscript");
        assert_eq!(expr("os.path").kind.name(), "Attribute");
        assert_eq!(expr("a if b else c").kind.name(), "IfExp");
        assert_eq!(expr("a == b < c").kind.name(), "Compare");
        assert_eq!(expr("a not in b").kind.name(), "Compare");
        assert_eq!(expr("-1").kind.name(), "UnaryOp");
        assert_eq!(expr("2 ** 3").kind.name(), "BinOp");
        assert_eq!(expr("f(x for x in y)").kind.name(), "Call");
        assert_eq!(expr("f'{x}'").kind.name(), "JoinedStr");
        assert_eq!(expr("b'x'").kind.name(), "Bytes");
    }

    #[test]
    fn tuples_and_parentheses() {
        assert_eq!(expr("('a')").kind, s("a"));
        assert!(matches!(expr("('a',)").kind, ExprKind::Tuple(ref t) if t.len() == 1));
        assert!(matches!(expr("()").kind, ExprKind::Tuple(ref t) if t.is_empty()));
        assert!(matches!(expr("'a', 'b'").kind, ExprKind::Tuple(ref t) if t.len() == 2));
    }

    #[test]
    fn adjacent_strings_concatenate() {
        assert_eq!(expr("('a' \"b\"\n'''c''')").kind, s("abc"));
        let err = parse_expression("'a' b'c'", "<test>").unwrap_err();
        assert!(err.message.contains("cannot mix bytes"));
    }

    #[test]
    fn precedence_of_modulo_over_add() {
        let e = expr("'a' + '%s' % 'b'");
        let ExprKind::BinOp { op, right, .. } = e.kind else {
            panic!("expected binop");
        };
        assert_eq!(op, BinOp::Add);
        assert!(matches!(right.kind, ExprKind::BinOp { op: BinOp::Mod, .. }));
    }

    #[test]
    fn not_binds_looser_than_comparison() {
        let e = expr("not a");
        assert!(matches!(e.kind, ExprKind::UnaryOp { op: UnaryOp::Not, .. }));
    }

    #[test]
    fn syntax_errors_carry_line() {
        let err = parse_module("x = 'a'\ny = \n", "DEPS").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("invalid syntax"));

        let err = parse_module("x = 'a' y", "DEPS").unwrap_err();
        assert!(err.message.contains("unexpected 'y'"));

        let err = parse_expression("x = 1", "<expr>").unwrap_err();
        assert!(err.message.contains("unexpected '='"));
    }

    #[test]
    fn empty_module_has_no_statements() {
        assert!(module("").body.is_empty());
        assert!(module("# only a comment\n\n").body.is_empty());
    }
}
