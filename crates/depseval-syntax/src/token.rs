use std::fmt;

/// Operators and delimiters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semi,
    Dot,
    Ellipsis,
    Arrow,
    Walrus,
    Assign,
    At,
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    PlusEq,
    MinusEq,
    StarEq,
    DoubleStarEq,
    SlashEq,
    DoubleSlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    AtEq,
}

impl Op {
    pub fn parse(s: &str) -> Option<Op> {
        Some(match s {
            "(" => Op::LParen,
            ")" => Op::RParen,
            "[" => Op::LBracket,
            "]" => Op::RBracket,
            "{" => Op::LBrace,
            "}" => Op::RBrace,
            "," => Op::Comma,
            ":" => Op::Colon,
            ";" => Op::Semi,
            "." => Op::Dot,
            "..." => Op::Ellipsis,
            "->" => Op::Arrow,
            ":=" => Op::Walrus,
            "=" => Op::Assign,
            "@" => Op::At,
            "+" => Op::Plus,
            "-" => Op::Minus,
            "*" => Op::Star,
            "**" => Op::DoubleStar,
            "/" => Op::Slash,
            "//" => Op::DoubleSlash,
            "%" => Op::Percent,
            "&" => Op::Amp,
            "|" => Op::Pipe,
            "^" => Op::Caret,
            "~" => Op::Tilde,
            "<<" => Op::Shl,
            ">>" => Op::Shr,
            "<" => Op::Lt,
            ">" => Op::Gt,
            "<=" => Op::LtEq,
            ">=" => Op::GtEq,
            "==" => Op::EqEq,
            "!=" => Op::NotEq,
            "+=" => Op::PlusEq,
            "-=" => Op::MinusEq,
            "*=" => Op::StarEq,
            "**=" => Op::DoubleStarEq,
            "/=" => Op::SlashEq,
            "//=" => Op::DoubleSlashEq,
            "%=" => Op::PercentEq,
            "&=" => Op::AmpEq,
            "|=" => Op::PipeEq,
            "^=" => Op::CaretEq,
            "<<=" => Op::ShlEq,
            ">>=" => Op::ShrEq,
            "@=" => Op::AtEq,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::LParen => "(",
            Op::RParen => ")",
            Op::LBracket => "[",
            Op::RBracket => "]",
            Op::LBrace => "{",
            Op::RBrace => "}",
            Op::Comma => ",",
            Op::Colon => ":",
            Op::Semi => ";",
            Op::Dot => ".",
            Op::Ellipsis => "...",
            Op::Arrow => "->",
            Op::Walrus => ":=",
            Op::Assign => "=",
            Op::At => "@",
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Star => "*",
            Op::DoubleStar => "**",
            Op::Slash => "/",
            Op::DoubleSlash => "//",
            Op::Percent => "%",
            Op::Amp => "&",
            Op::Pipe => "|",
            Op::Caret => "^",
            Op::Tilde => "~",
            Op::Shl => "<<",
            Op::Shr => ">>",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::LtEq => "<=",
            Op::GtEq => ">=",
            Op::EqEq => "==",
            Op::NotEq => "!=",
            Op::PlusEq => "+=",
            Op::MinusEq => "-=",
            Op::StarEq => "*=",
            Op::DoubleStarEq => "**=",
            Op::SlashEq => "/=",
            Op::DoubleSlashEq => "//=",
            Op::PercentEq => "%=",
            Op::AmpEq => "&=",
            Op::PipeEq => "|=",
            Op::CaretEq => "^=",
            Op::ShlEq => "<<=",
            Op::ShrEq => ">>=",
            Op::AtEq => "@=",
        }
    }

    pub fn opens_group(self) -> bool {
        matches!(self, Op::LParen | Op::LBracket | Op::LBrace)
    }

    pub fn closes_group(self) -> bool {
        matches!(self, Op::RParen | Op::RBracket | Op::RBrace)
    }
}

/// What a string literal's prefix made of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrKind {
    Text,
    Bytes,
    Formatted,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Name(String),
    /// Decoded string literal (escapes already processed unless raw).
    Str { kind: StrKind, value: String },
    /// Numeric literal, kept as written.
    Number(String),
    Op(Op),
    /// End of a logical line. Never emitted inside brackets.
    Newline,
    Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based line of the first character.
    pub line: u32,
    /// 0-based byte column of the first character.
    pub col: u32,
}

impl Token {
    pub fn is_op(&self, op: Op) -> bool {
        self.kind == TokenKind::Op(op)
    }

    pub fn is_name(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Name(n) if n == name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Name(n) => write!(f, "'{n}'"),
            TokenKind::Str { .. } => f.write_str("string literal"),
            TokenKind::Number(n) => write!(f, "number {n}"),
            TokenKind::Op(op) => write!(f, "'{}'", op.as_str()),
            TokenKind::Newline => f.write_str("end of line"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
