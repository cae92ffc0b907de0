//! Parser for rules file lines.
//!
//! ```text
//! line    := expr '=' expr [comment]
//! expr    := term ('+' term)*
//! term    := string | call
//! call    := ident ['.' ident] '(' [expr (',' expr)*] ')'
//! string  := [u|b|r] ( '...' | "..." | '''...''' | """...""" )
//! ```

use regex::Regex;
use std::iter::Peekable;
use std::str::CharIndices;
use std::sync::LazyLock;

use super::Environment;

static IMPORT_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s*import\s+(?P<modules>[A-Za-z_][\w.]*(?:\s*,\s*[A-Za-z_][\w.]*)*)\s*$")
        .expect("Invalid regex")
});

/// What one line of a rules file amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Rule { key: String, value: String, regex: bool },
    Import(Vec<String>),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Str { value: String, raw: bool },
    Ident(String),
    LParen,
    RParen,
    Comma,
    Plus,
    Dot,
    Equals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Str { value: String, raw: bool },
    Call { name: String, args: Vec<Expr> },
    Concat(Vec<Expr>),
}

impl Expr {
    fn eval(&self, environment: &Environment) -> Result<String, String> {
        match self {
            Expr::Str { value, .. } => Ok(value.clone()),
            Expr::Call { name, args } => {
                let args =
                    args.iter().map(|arg| arg.eval(environment)).collect::<Result<Vec<_>, _>>()?;
                environment.call(name, &args)
            }
            Expr::Concat(parts) => {
                parts.iter().map(|part| part.eval(environment)).collect::<Result<String, _>>()
            }
        }
    }

    fn is_raw_string(&self) -> bool {
        matches!(self, Expr::Str { raw: true, .. })
    }
}

pub fn parse_line(line: &str, environment: &Environment) -> Result<Line, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Ignored);
    }
    if line.starts_with('#') {
        return Ok(match IMPORT_DIRECTIVE.captures(line) {
            Some(caps) => Line::Import(
                caps["modules"].split(',').map(|module| module.trim().to_string()).collect(),
            ),
            None => Line::Ignored,
        });
    }

    let tokens = tokenize(line)?;
    let mut parser = Parser { tokens, position: 0 };

    let key = parser.expression()?;
    parser.expect(&Token::Equals)?;
    let value = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(format!("unexpected {token:?} after value"));
    }

    let regex = key.is_raw_string();
    let key = key.eval(environment)?;
    if key.is_empty() {
        return Err("empty search key".to_string());
    }
    let value = value.eval(environment)?;
    Ok(Line::Rule { key, value, regex })
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        match self.next() {
            Some(ref token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected {expected:?}, found {token:?}")),
            None => Err(format!("expected {expected:?}, found end of line")),
        }
    }

    fn expression(&mut self) -> Result<Expr, String> {
        let mut parts = vec![self.term()?];
        while self.peek() == Some(&Token::Plus) {
            self.position += 1;
            parts.push(self.term()?);
        }
        Ok(if parts.len() == 1 { parts.remove(0) } else { Expr::Concat(parts) })
    }

    fn term(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::Str { value, raw }) => Ok(Expr::Str { value, raw }),
            Some(Token::Ident(mut name)) => {
                if self.peek() == Some(&Token::Dot) {
                    self.position += 1;
                    match self.next() {
                        Some(Token::Ident(member)) => {
                            name.push('.');
                            name.push_str(&member);
                        }
                        _ => return Err(format!("expected a name after '{name}.'")),
                    }
                }
                self.expect(&Token::LParen)?;
                let mut args = Vec::new();
                if self.peek() != Some(&Token::RParen) {
                    args.push(self.expression()?);
                    while self.peek() == Some(&Token::Comma) {
                        self.position += 1;
                        args.push(self.expression()?);
                    }
                }
                self.expect(&Token::RParen)?;
                Ok(Expr::Call { name, args })
            }
            Some(token) => Err(format!("unexpected {token:?}")),
            None => Err("unexpected end of line".to_string()),
        }
    }
}

fn tokenize(line: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '#' => break,
            '(' | ')' | ',' | '+' | '.' | '=' => {
                chars.next();
                tokens.push(match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    '+' => Token::Plus,
                    '.' => Token::Dot,
                    _ => Token::Equals,
                });
            }
            '\'' | '"' => tokens.push(string(&mut chars, line, false)?),
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let word = &line[start..end];
                let quote_follows = matches!(chars.peek(), Some((_, '\'' | '"')));
                match word.to_ascii_lowercase().as_str() {
                    prefix @ ("r" | "u" | "b" | "ur" | "br" | "rb") if quote_follows => {
                        tokens.push(string(&mut chars, line, prefix.contains('r'))?);
                    }
                    _ => tokens.push(Token::Ident(word.to_string())),
                }
            }
            c => return Err(format!("unexpected character '{c}' at column {}", start + 1)),
        }
    }

    Ok(tokens)
}

fn string(
    chars: &mut Peekable<CharIndices<'_>>,
    line: &str,
    raw: bool,
) -> Result<Token, String> {
    let Some((start, quote)) = chars.next() else {
        return Err("expected a string".to_string());
    };

    let rest = &line[start..];
    let triple: String = std::iter::repeat(quote).take(3).collect();
    let delimiter_len = if rest.starts_with(&triple) {
        chars.next();
        chars.next();
        3
    } else {
        1
    };

    let mut value = String::new();
    loop {
        let Some((i, c)) = chars.next() else {
            return Err(format!("unterminated string starting at column {}", start + 1));
        };
        if c == quote && line[i..].starts_with(&triple[..delimiter_len]) {
            for _ in 1..delimiter_len {
                chars.next();
            }
            break;
        }
        if c != '\\' {
            value.push(c);
            continue;
        }
        if raw {
            value.push(c);
            if let Some(&(_, next)) = chars.peek() {
                // r'\'' keeps both characters and does not end the string
                if next == quote || next == '\\' {
                    value.push(next);
                    chars.next();
                }
            }
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => value.push('\n'),
            Some((_, 't')) => value.push('\t'),
            Some((_, 'r')) => value.push('\r'),
            Some((_, '0')) => value.push('\0'),
            Some((_, '\\')) => value.push('\\'),
            Some((_, '\'')) => value.push('\''),
            Some((_, '"')) => value.push('"'),
            Some((_, 'x')) => value.push(hex_escape(chars, 2)?),
            Some((_, 'u')) => value.push(hex_escape(chars, 4)?),
            Some((_, other)) => {
                value.push('\\');
                value.push(other);
            }
            None => return Err("unterminated string".to_string()),
        }
    }

    Ok(Token::Str { value, raw })
}

fn hex_escape(chars: &mut Peekable<CharIndices<'_>>, digits: usize) -> Result<char, String> {
    let mut code = String::with_capacity(digits);
    for _ in 0..digits {
        match chars.next() {
            Some((_, c)) if c.is_ascii_hexdigit() => code.push(c),
            _ => return Err(format!("truncated \\{} escape", if digits == 2 { 'x' } else { 'u' })),
        }
    }
    u32::from_str_radix(&code, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid escape value {code}"))
}
