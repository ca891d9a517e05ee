use crate::error::CompileError;
use crate::span::{SourceMap, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Func,
    If,
    Else,
    While,
    Break,
    Continue,
    Return,
    Const,
    True,
    False,
    BoolType,
    IntType,
    StrType,
    ObjType,
    VoidType,
    Ident(String),
    Number(i64),
    String(String),
    Comment(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Colon,
    Dot,
    Equals,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    AndAnd,
    OrOr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    pos: usize,
    sm: &'a SourceMap,
    file: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(sm: &'a SourceMap, file: &'a str) -> Self {
        Lexer {
            chars: sm.src().chars().peekable(),
            pos: 0,
            sm,
            file,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.pos += ch.len_utf8();
        }
        c
    }

    fn error<T>(&self, msg: &str, start: usize) -> Result<T, CompileError> {
        let span = Span::new(start, self.pos.max(start + 1));
        Err(CompileError::new(
            self.sm.format_diagnostic(self.file, msg, span),
        ))
    }
}

pub fn lex(sm: &SourceMap, file: &str) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut lexer = Lexer::new(sm, file);

    while let Some(&c) = lexer.peek() {
        let start = lexer.pos;
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                lexer.next();
            }
            '(' => { lexer.next(); tokens.push(Token { kind: TokenKind::LParen, span: Span::new(start, lexer.pos) }); }
            ')' => { lexer.next(); tokens.push(Token { kind: TokenKind::RParen, span: Span::new(start, lexer.pos) }); }
            '{' => { lexer.next(); tokens.push(Token { kind: TokenKind::LBrace, span: Span::new(start, lexer.pos) }); }
            '}' => { lexer.next(); tokens.push(Token { kind: TokenKind::RBrace, span: Span::new(start, lexer.pos) }); }
            '[' => { lexer.next(); tokens.push(Token { kind: TokenKind::LBracket, span: Span::new(start, lexer.pos) }); }
            ']' => { lexer.next(); tokens.push(Token { kind: TokenKind::RBracket, span: Span::new(start, lexer.pos) }); }
            ',' => { lexer.next(); tokens.push(Token { kind: TokenKind::Comma, span: Span::new(start, lexer.pos) }); }
            ';' => { lexer.next(); tokens.push(Token { kind: TokenKind::Semi, span: Span::new(start, lexer.pos) }); }
            ':' => { lexer.next(); tokens.push(Token { kind: TokenKind::Colon, span: Span::new(start, lexer.pos) }); }
            '.' => { lexer.next(); tokens.push(Token { kind: TokenKind::Dot, span: Span::new(start, lexer.pos) }); }
            '+' => { lexer.next(); tokens.push(Token { kind: TokenKind::Plus, span: Span::new(start, lexer.pos) }); }
            '-' => { lexer.next(); tokens.push(Token { kind: TokenKind::Minus, span: Span::new(start, lexer.pos) }); }
            '*' => { lexer.next(); tokens.push(Token { kind: TokenKind::Star, span: Span::new(start, lexer.pos) }); }
            '=' => {
                lexer.next();
                if lexer.peek() == Some(&'=') {
                    lexer.next();
                    tokens.push(Token { kind: TokenKind::EqEq, span: Span::new(start, lexer.pos) });
                } else {
                    tokens.push(Token { kind: TokenKind::Equals, span: Span::new(start, lexer.pos) });
                }
            }
            '!' => {
                lexer.next();
                if lexer.peek() == Some(&'=') {
                    lexer.next();
                    tokens.push(Token { kind: TokenKind::NotEq, span: Span::new(start, lexer.pos) });
                } else {
                    return lexer.error("Unexpected character: !", start);
                }
            }
            '<' => {
                lexer.next();
                if lexer.peek() == Some(&'=') {
                    lexer.next();
                    tokens.push(Token { kind: TokenKind::Le, span: Span::new(start, lexer.pos) });
                } else {
                    tokens.push(Token { kind: TokenKind::Lt, span: Span::new(start, lexer.pos) });
                }
            }
            '>' => {
                lexer.next();
                if lexer.peek() == Some(&'=') {
                    lexer.next();
                    tokens.push(Token { kind: TokenKind::Ge, span: Span::new(start, lexer.pos) });
                } else {
                    tokens.push(Token { kind: TokenKind::Gt, span: Span::new(start, lexer.pos) });
                }
            }
            '&' => {
                lexer.next();
                if lexer.peek() == Some(&'&') {
                    lexer.next();
                    tokens.push(Token { kind: TokenKind::AndAnd, span: Span::new(start, lexer.pos) });
                } else {
                    return lexer.error("Unexpected character: & (did you mean &&?)", start);
                }
            }
            '|' => {
                lexer.next();
                if lexer.peek() == Some(&'|') {
                    lexer.next();
                    tokens.push(Token { kind: TokenKind::OrOr, span: Span::new(start, lexer.pos) });
                } else {
                    return lexer.error("Unexpected character: | (did you mean ||?)", start);
                }
            }
            '/' => {
                lexer.next();
                if lexer.peek() == Some(&'/') {
                    lexer.next();
                    let mut text = String::new();
                    while let Some(&ch) = lexer.peek() {
                        if ch == '\n' {
                            break;
                        }
                        text.push(ch);
                        lexer.next();
                    }
                    tokens.push(Token {
                        kind: TokenKind::Comment(text.trim().to_string()),
                        span: Span::new(start, lexer.pos),
                    });
                } else {
                    tokens.push(Token { kind: TokenKind::Slash, span: Span::new(start, lexer.pos) });
                }
            }
            '"' => {
                lexer.next();
                let mut s = String::new();
                loop {
                    match lexer.peek() {
                        Some(&'"') => {
                            lexer.next();
                            break;
                        }
                        Some(&'\\') => {
                            lexer.next();
                            match lexer.next() {
                                Some('n') => s.push('\n'),
                                Some('t') => s.push('\t'),
                                Some('r') => s.push('\r'),
                                Some('\\') => s.push('\\'),
                                Some('"') => s.push('"'),
                                Some(other) => s.push(other),
                                None => {
                                    return lexer.error("Unexpected EOF in string escape", start);
                                }
                            }
                        }
                        Some(&ch) => {
                            s.push(ch);
                            lexer.next();
                        }
                        None => {
                            return lexer.error("Unterminated string (missing closing quote)", start);
                        }
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::String(s),
                    span: Span::new(start, lexer.pos),
                });
            }
            _ if c.is_ascii_digit() => {
                let mut num_str = String::new();
                while let Some(&ch) = lexer.peek() {
                    if !ch.is_ascii_digit() {
                        break;
                    }
                    num_str.push(ch);
                    lexer.next();
                }
                let n: i64 = match num_str.parse() {
                    Ok(n) => n,
                    Err(_) => {
                        return lexer.error(
                            &format!("Integer literal {} does not fit in 64 bits", num_str),
                            start,
                        );
                    }
                };
                tokens.push(Token {
                    kind: TokenKind::Number(n),
                    span: Span::new(start, lexer.pos),
                });
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&ch) = lexer.peek() {
                    if !ch.is_ascii_alphanumeric() && ch != '_' {
                        break;
                    }
                    ident.push(ch);
                    lexer.next();
                }

                let kind = match ident.as_str() {
                    "func" => TokenKind::Func,
                    "if" => TokenKind::If,
                    "else" => TokenKind::Else,
                    "while" => TokenKind::While,
                    "break" => TokenKind::Break,
                    "continue" => TokenKind::Continue,
                    "return" => TokenKind::Return,
                    "const" => TokenKind::Const,
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    "bool" => TokenKind::BoolType,
                    "int" => TokenKind::IntType,
                    "str" => TokenKind::StrType,
                    "obj" => TokenKind::ObjType,
                    "void" => TokenKind::VoidType,
                    _ => TokenKind::Ident(ident),
                };
                tokens.push(Token {
                    kind,
                    span: Span::new(start, lexer.pos),
                });
            }
            _ => {
                lexer.next();
                return lexer.error(&format!("Unexpected character: {}", c), start);
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let sm = SourceMap::new(src.to_string());
        lex(&sm, "test.tysh")
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_declaration() {
        assert_eq!(
            kinds("int i = 42;"),
            vec![
                TokenKind::IntType,
                TokenKind::Ident("i".into()),
                TokenKind::Equals,
                TokenKind::Number(42),
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn lexes_comparison_operators() {
        assert_eq!(
            kinds("< <= > >= == !="),
            vec![
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::EqEq,
                TokenKind::NotEq,
            ]
        );
    }

    #[test]
    fn comments_become_tokens() {
        assert_eq!(
            kinds("// a note\nbreak;"),
            vec![
                TokenKind::Comment("a note".into()),
                TokenKind::Break,
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let sm = SourceMap::new("str s = \"abc".to_string());
        let err = lex(&sm, "test.tysh").unwrap_err();
        assert!(err.message.contains("Unterminated string"));
    }
}
