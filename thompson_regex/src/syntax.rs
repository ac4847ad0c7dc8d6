//! Tokenizing a pattern and reordering it into postfix form.
//!
//! [`normalize`] turns the pattern into tokens and makes every implicit
//! concatenation explicit. [`to_postfix`] then runs the shunting-yard
//! algorithm over that stream, which is what the [`Compiler`] consumes.
//!
//! [`Compiler`]: crate::Compiler

use crate::{CompileError, CompileResult};

/// The kind of a pattern token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A character that matches itself.
    Literal(char),
    /// Explicit concatenation. It never appears in source patterns, so it
    /// cannot collide with any literal.
    Concat,
    /// `|`
    Alternate,
    /// `*`
    Star,
    /// `?`
    Optional,
    /// `+`
    Plus,
    /// `(`
    OpenGroup,
    /// `)`
    CloseGroup,
}

impl TokenKind {
    fn from_char(ch: char) -> TokenKind {
        match ch {
            '|' => TokenKind::Alternate,
            '*' => TokenKind::Star,
            '?' => TokenKind::Optional,
            '+' => TokenKind::Plus,
            '(' => TokenKind::OpenGroup,
            ')' => TokenKind::CloseGroup,
            ch => TokenKind::Literal(ch),
        }
    }

    /// Binding strength of an operator; `None` for everything else.
    pub fn precedence(self) -> Option<u8> {
        match self {
            TokenKind::Alternate => Some(0),
            TokenKind::Concat => Some(1),
            TokenKind::Star | TokenKind::Optional | TokenKind::Plus => Some(2),
            _ => None,
        }
    }

    /// Whether this is one of the postfix repetition operators.
    pub fn is_repetition(self) -> bool {
        matches!(self, TokenKind::Star | TokenKind::Optional | TokenKind::Plus)
    }

    /// The number of operands the operator consumes.
    pub fn arity(self) -> usize {
        match self {
            TokenKind::Alternate | TokenKind::Concat => 2,
            TokenKind::Star | TokenKind::Optional | TokenKind::Plus => 1,
            _ => 0,
        }
    }

    /// The character used when rendering a token stream. Concatenation
    /// has no source character and renders as `·`.
    pub fn as_char(self) -> char {
        match self {
            TokenKind::Literal(ch) => ch,
            TokenKind::Concat => '·',
            TokenKind::Alternate => '|',
            TokenKind::Star => '*',
            TokenKind::Optional => '?',
            TokenKind::Plus => '+',
            TokenKind::OpenGroup => '(',
            TokenKind::CloseGroup => ')',
        }
    }

    pub(crate) fn describe(self) -> String {
        match self {
            TokenKind::Concat => "concatenation".to_string(),
            kind => format!("'{}'", kind.as_char()),
        }
    }
}

/// A token along with the character offset in the pattern it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// For an inserted [`TokenKind::Concat`], the offset of the token that
    /// follows it.
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        Token { kind, offset }
    }
}

/// Tokenize `pattern` and insert an explicit [`TokenKind::Concat`] between
/// any two tokens that are sequenced without an operator.
///
/// No marker follows `(` or `|`, and none precedes `*`, `?`, `+`, `|` or
/// `)`.
pub fn normalize(pattern: &str) -> Vec<Token> {
    let tokens: Vec<Token> = pattern
        .chars()
        .enumerate()
        .map(|(offset, ch)| Token::new(TokenKind::from_char(ch), offset))
        .collect();

    let mut output = Vec::with_capacity(tokens.len() * 2);
    for (i, &token) in tokens.iter().enumerate() {
        output.push(token);

        if matches!(token.kind, TokenKind::OpenGroup | TokenKind::Alternate) {
            continue;
        }

        if let Some(next) = tokens.get(i + 1) {
            let joined = next.kind.is_repetition()
                || matches!(next.kind, TokenKind::Alternate | TokenKind::CloseGroup);
            if !joined {
                output.push(Token::new(TokenKind::Concat, next.offset));
            }
        }
    }
    output
}

/// Reorder a normalized token stream into postfix form.
///
/// Operators are left associative: an incoming operator first emits every
/// stacked operator of greater or equal precedence. Parentheses never reach
/// the output. Operand counts are not checked here.
pub fn to_postfix(tokens: &[Token]) -> CompileResult<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();

    for &token in tokens {
        match token.kind {
            TokenKind::Literal(_) => output.push(token),
            TokenKind::OpenGroup => operators.push(token),
            TokenKind::CloseGroup => loop {
                match operators.pop() {
                    Some(Token { kind: TokenKind::OpenGroup, .. }) => break,
                    Some(op) => output.push(op),
                    None => {
                        return Err(CompileError::MismatchedParentheses {
                            offset: token.offset,
                        })
                    }
                }
            },
            kind => {
                let precedence = kind.precedence();
                while let Some(&top) = operators.last() {
                    if top.kind == TokenKind::OpenGroup || top.kind.precedence() < precedence {
                        break;
                    }
                    output.push(top);
                    operators.pop();
                }
                operators.push(token);
            }
        }
    }

    while let Some(op) = operators.pop() {
        if op.kind == TokenKind::OpenGroup {
            return Err(CompileError::MismatchedParentheses { offset: op.offset });
        }
        output.push(op);
    }

    Ok(output)
}

/// Render a token stream as a string, for logs and diagnostics.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.kind.as_char()).collect()
}
