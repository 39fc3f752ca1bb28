//! Tokenizer built on logos.
//!
//! Produces logical-line tokens: newlines inside brackets, comments, blank lines and explicit
//! `\` continuations never reach the parser. Indentation is not tokenized; every token keeps
//! its column so the parser can find the end of an indented block.

use crate::error::SyntaxError;
use crate::token::{Op, StrKind, Token, TokenKind};
use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"([ \t\f]+|#[^\n]*|\\\r?\n)")]
enum RawToken {
    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Name,

    // Prefix and opening quote; the callback consumes the rest of the literal.
    #[regex(r#"[rRuUbBfF]?[rRuUbBfF]?["']"#, lex_string)]
    Str,

    #[regex(r"(0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|([0-9][0-9_]*(\.[0-9_]*)?|\.[0-9][0-9_]*)([eE][+-]?[0-9]+)?[jJlL]?)")]
    Number,

    #[regex(
        r"(\*\*=|//=|>>=|<<=|\.\.\.|\*\*|//|<<|>>|<=|>=|==|!=|->|:=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|@=|[()\[\]{},:;.=@+\-*/%&|^~<>])",
        |lex| Op::parse(lex.slice())
    )]
    Op(Op),
}

/// Scan the body of a string literal whose opening quote has just been matched.
fn lex_string(lex: &mut logos::Lexer<RawToken>) -> bool {
    let Some(&quote) = lex.slice().as_bytes().last() else {
        return false;
    };
    let rest = lex.remainder().as_bytes();
    let triple = rest.len() >= 2 && rest[0] == quote && rest[1] == quote;

    let mut i = if triple { 2 } else { 0 };
    while i < rest.len() {
        match rest[i] {
            b'\\' => {
                if rest.get(i + 1) == Some(&b'\r') && rest.get(i + 2) == Some(&b'\n') {
                    i += 3;
                } else {
                    i += 2;
                }
            }
            b'\n' if !triple => return false,
            b if b == quote => {
                if !triple {
                    lex.bump(i + 1);
                    return true;
                }
                if rest.get(i + 1) == Some(&quote) && rest.get(i + 2) == Some(&quote) {
                    lex.bump(i + 3);
                    return true;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    false
}

/// Byte offsets of line starts, for offset → (line, column) lookups.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    fn position(&self, offset: usize) -> (u32, u32) {
        let idx = self.starts.partition_point(|&s| s <= offset).max(1);
        let col = offset - self.starts[idx - 1];
        (idx as u32, col as u32)
    }
}

/// Tokenize manifest text into logical-line tokens, ending with `Newline` + `Eof`.
pub fn tokenize(source: &str, filename: &str) -> Result<Vec<Token>, SyntaxError> {
    let lines = LineIndex::new(source);
    let mut out: Vec<Token> = Vec::new();
    let mut open: Vec<(Op, u32)> = Vec::new();
    let mut lex = RawToken::lexer(source);

    while let Some(result) = lex.next() {
        let (line, col) = lines.position(lex.span().start);
        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                let slice = lex.slice();
                let message = if slice.ends_with('\'') || slice.ends_with('"') {
                    "unterminated string literal".to_string()
                } else {
                    match slice.chars().next() {
                        Some(c) => format!("invalid character {c:?}"),
                        None => "invalid token".to_string(),
                    }
                };
                return Err(SyntaxError::new(filename, line, message));
            }
        };

        let kind = match raw {
            RawToken::Newline => {
                let after_newline =
                    matches!(out.last(), None | Some(Token { kind: TokenKind::Newline, .. }));
                if !open.is_empty() || after_newline {
                    continue;
                }
                TokenKind::Newline
            }
            RawToken::Name => TokenKind::Name(lex.slice().to_string()),
            RawToken::Str => {
                decode_string(lex.slice()).map_err(|m| SyntaxError::new(filename, line, m))?
            }
            RawToken::Number => TokenKind::Number(lex.slice().to_string()),
            RawToken::Op(op) => {
                if op.opens_group() {
                    open.push((op, line));
                } else if op.closes_group() {
                    match open.pop() {
                        Some((opener, _)) if closes(opener, op) => {}
                        Some((opener, _)) => {
                            return Err(SyntaxError::new(
                                filename,
                                line,
                                format!(
                                    "closing '{}' does not match opening '{}'",
                                    op.as_str(),
                                    opener.as_str()
                                ),
                            ));
                        }
                        None => {
                            return Err(SyntaxError::new(
                                filename,
                                line,
                                format!("unmatched '{}'", op.as_str()),
                            ));
                        }
                    }
                }
                TokenKind::Op(op)
            }
        };
        out.push(Token { kind, line, col });
    }

    if let Some((opener, line)) = open.pop() {
        return Err(SyntaxError::new(
            filename,
            line,
            format!("'{}' was never closed", opener.as_str()),
        ));
    }

    let (end_line, _) = lines.position(source.len());
    if !matches!(out.last(), None | Some(Token { kind: TokenKind::Newline, .. })) {
        out.push(Token {
            kind: TokenKind::Newline,
            line: end_line,
            col: 0,
        });
    }
    out.push(Token {
        kind: TokenKind::Eof,
        line: end_line,
        col: 0,
    });
    Ok(out)
}

fn closes(opener: Op, closer: Op) -> bool {
    matches!(
        (opener, closer),
        (Op::LParen, Op::RParen) | (Op::LBracket, Op::RBracket) | (Op::LBrace, Op::RBrace)
    )
}

fn decode_string(slice: &str) -> Result<TokenKind, String> {
    let prefix_len = slice.find(['\'', '"']).unwrap_or(0);
    let (prefix, quoted) = slice.split_at(prefix_len);
    let quote_len = if quoted.len() >= 6 && (quoted.starts_with("'''") || quoted.starts_with("\"\"\""))
    {
        3
    } else {
        1
    };
    let body = &quoted[quote_len..quoted.len() - quote_len];

    let has = |c: char| prefix.chars().any(|p| p.eq_ignore_ascii_case(&c));
    let kind = if has('b') {
        StrKind::Bytes
    } else if has('f') {
        StrKind::Formatted
    } else {
        StrKind::Text
    };
    let value = if has('r') {
        body.to_string()
    } else {
        unescape(body)?
    };
    Ok(TokenKind::Str { kind, value })
}

fn unescape(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(e) = chars.next() else {
            out.push('\\');
            break;
        };
        match e {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut code = e.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            'x' => out.push(hex_escape(&mut chars, 2, 'x')?),
            'u' => out.push(hex_escape(&mut chars, 4, 'u')?),
            'U' => out.push(hex_escape(&mut chars, 8, 'U')?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Ok(out)
}

fn hex_escape(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    digits: usize,
    marker: char,
) -> Result<char, String> {
    let mut code: u32 = 0;
    for _ in 0..digits {
        let d = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| format!("truncated \\{marker} escape"))?;
        code = code * 16 + d;
    }
    char::from_u32(code).ok_or_else(|| format!("invalid \\{marker} escape: code point {code:#x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, "<test>")
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn text(value: &str) -> TokenKind {
        TokenKind::Str {
            kind: StrKind::Text,
            value: value.to_string(),
        }
    }

    #[test]
    fn tokenizes_assignment() {
        assert_eq!(
            kinds("x = 'a' + \"b\"\n"),
            vec![
                TokenKind::Name("x".into()),
                TokenKind::Op(Op::Assign),
                text("a"),
                TokenKind::Op(Op::Plus),
                text("b"),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newlines_inside_brackets_and_comments_are_dropped() {
        let toks = kinds("# header\n\nd = {\n  'a': 'b',  # trailing\n}\n\n");
        assert_eq!(
            toks.iter().filter(|k| **k == TokenKind::Newline).count(),
            1
        );
        assert_eq!(toks.first(), Some(&TokenKind::Name("d".into())));
    }

    #[test]
    fn explicit_continuation_joins_lines() {
        let toks = tokenize("x = 'a' + \\\n  'b'\ny = 'c'", "<test>").expect("tokenize");
        let y = toks.iter().find(|t| t.is_name("y")).expect("y token");
        assert_eq!(y.line, 3);
        assert_eq!(y.col, 0);
    }

    #[test]
    fn string_prefixes_and_escapes() {
        assert_eq!(kinds(r"r'\n'")[0], text("\\n"));
        assert_eq!(kinds(r"'\x41é\t\q'")[0], text("A\u{e9}\t\\q"));
        assert_eq!(kinds(r"'\101'")[0], text("A"));
        assert_eq!(
            kinds("b'x'")[0],
            TokenKind::Str {
                kind: StrKind::Bytes,
                value: "x".into()
            }
        );
        assert_eq!(
            kinds("f'{x}'")[0],
            TokenKind::Str {
                kind: StrKind::Formatted,
                value: "{x}".into()
            }
        );
    }

    #[test]
    fn triple_quoted_strings_span_lines() {
        let toks = tokenize("x = '''a\n'b'\nc'''\ny = ''", "<test>").expect("tokenize");
        assert_eq!(toks[2].kind, text("a\n'b'\nc"));
        assert!(toks.iter().any(|t| t.is_name("y") && t.line == 4));
        assert_eq!(kinds("''''''")[0], text(""));
        assert_eq!(kinds("''")[0], text(""));
    }

    #[test]
    fn numbers_are_kept_verbatim() {
        assert_eq!(kinds("0x1F")[0], TokenKind::Number("0x1F".into()));
        assert_eq!(kinds("1.5e3")[0], TokenKind::Number("1.5e3".into()));
        assert_eq!(kinds(".5")[0], TokenKind::Number(".5".into()));
    }

    #[test]
    fn reports_unterminated_string_with_line() {
        let err = tokenize("x = 'a'\ny = 'oops\n", "DEPS").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("unterminated string"));
        assert_eq!(err.filename, "DEPS");
    }

    #[test]
    fn reports_bracket_mismatches() {
        assert!(tokenize("x = (]", "<t>").unwrap_err().message.contains("does not match"));
        assert!(tokenize("x = )", "<t>").unwrap_err().message.contains("unmatched"));
        let err = tokenize("x = [\n'a',\n", "<t>").unwrap_err();
        assert!(err.message.contains("never closed"));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn rejects_invalid_characters() {
        let err = tokenize("x = $", "<t>").unwrap_err();
        assert!(err.message.contains("invalid character '$'"));
    }
}
