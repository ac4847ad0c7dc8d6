//! Thompson NFA regular expressions
//!
//! This library compiles a small regular expression language into a
//! nondeterministic finite automaton using Thompson's construction and
//! decides whether whole strings match by simulating all live states of the
//! automaton in parallel.
//!
//! The pipeline is:
//!
//! ```text
//! pattern ──normalize──> tokens ──to_postfix──> postfix ──Compiler──> NFA ──Matcher──> bool
//! ```
//!
//! Supported syntax:
//! - any character other than `( ) | * ? +` matches itself
//! - `(` and `)` group sub-expressions
//! - `|` is alternation, adjacency is concatenation
//! - `*`, `+` and `?` repeat the preceding expression zero or more, one or
//!   more, and zero or one times
//!
//! There are no escapes, anchors, character classes or capture groups. A
//! pattern always has to match the entire input.
//!
//! ```
//! let re = thompson_regex::compile("a*b").unwrap();
//! assert!(re.is_match("aaab"));
//! assert!(re.is_match("b"));
//! assert!(!re.is_match("aaa"));
//! ```

#[macro_use]
mod macros;

pub mod compiler;
pub mod matcher;
pub mod nfa;
pub mod regex;
pub mod syntax;

pub use compiler::{Compiler, Config};
pub use matcher::Matcher;
pub use nfa::{Fragment, State, StateId, NFA};
pub use regex::{compile, Regex, RegexBuilder};
pub use syntax::{Token, TokenKind};

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

/// The result of compiling a pattern.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during compilation.
///
/// Offsets count characters (not bytes) from the start of the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A `)` without a matching `(`, or a `(` that is never closed.
    MismatchedParentheses {
        /// Offset of the offending parenthesis.
        offset: usize,
    },
    /// An operator without enough operands, e.g. `a|` or `*a`.
    DanglingOperator {
        /// The operator that could not be applied.
        operator: TokenKind,
        /// Offset of the operator in the pattern.
        offset: usize,
    },
    /// More than one sub-expression was left over after building.
    MalformedPattern {
        /// Number of fragments left on the stack.
        fragments: usize,
    },
    /// The automaton would need more states than the configured limit.
    TooComplex {
        /// The configured state limit.
        limit: usize,
    },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::MismatchedParentheses { offset } => {
                write!(f, "mismatched parenthesis at offset {}", offset)
            }
            CompileError::DanglingOperator { operator, offset } => write!(
                f,
                "operator {} at offset {} is missing an operand",
                operator.describe(),
                offset
            ),
            CompileError::MalformedPattern { fragments } => write!(
                f,
                "malformed pattern: {} sub-expressions left unjoined",
                fragments
            ),
            CompileError::TooComplex { limit } => {
                write!(f, "pattern needs more than {} states", limit)
            }
        }
    }
}

impl std::error::Error for CompileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = CompileError::MismatchedParentheses { offset: 3 };
        assert_eq!(err.to_string(), "mismatched parenthesis at offset 3");

        let err = CompileError::DanglingOperator {
            operator: TokenKind::Alternate,
            offset: 1,
        };
        assert_eq!(
            err.to_string(),
            "operator '|' at offset 1 is missing an operand"
        );

        let err = CompileError::DanglingOperator {
            operator: TokenKind::Concat,
            offset: 2,
        };
        assert_eq!(
            err.to_string(),
            "operator concatenation at offset 2 is missing an operand"
        );

        let err = CompileError::MalformedPattern { fragments: 2 };
        assert_eq!(
            err.to_string(),
            "malformed pattern: 2 sub-expressions left unjoined"
        );

        let err = CompileError::TooComplex { limit: 8 };
        assert_eq!(err.to_string(), "pattern needs more than 8 states");
    }
}
