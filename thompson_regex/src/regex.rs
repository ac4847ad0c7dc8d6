use std::fmt;
use std::str::FromStr;

use crate::{
    compiler::{Compiler, Config},
    matcher::Matcher,
    nfa::NFA,
    syntax::{normalize, to_postfix},
    CompileError, CompileResult,
};

/// Compile `pattern` with the default configuration.
///
/// ```
/// let re = thompson_regex::compile("abcd|efgh").unwrap();
/// assert!(re.is_match("efgh"));
/// assert!(!re.is_match("abcdefgh"));
/// ```
pub fn compile(pattern: &str) -> CompileResult<Regex> {
    Regex::new(pattern)
}

/// A compiled pattern.
///
/// The automaton is never modified after compilation, so a `Regex` can be
/// shared freely between threads and matched any number of times.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    nfa: NFA,
}

impl Regex {
    /// Compile a pattern with the default configuration.
    pub fn new(pattern: &str) -> CompileResult<Regex> {
        RegexBuilder::new(pattern).build()
    }

    /// Whether `input` as a whole matches the pattern.
    pub fn is_match(&self, input: &str) -> bool {
        Matcher::new(&self.nfa).is_match(input)
    }

    /// The pattern this regex was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The compiled automaton.
    pub fn nfa(&self) -> &NFA {
        &self.nfa
    }
}

impl FromStr for Regex {
    type Err = CompileError;

    fn from_str(pattern: &str) -> CompileResult<Regex> {
        Regex::new(pattern)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Configures and compiles a [`Regex`].
///
/// ```
/// use thompson_regex::{CompileError, RegexBuilder};
///
/// let err = RegexBuilder::new("abcdef").state_limit(Some(8)).build().unwrap_err();
/// assert_eq!(err, CompileError::TooComplex { limit: 8 });
/// ```
#[derive(Debug, Clone)]
pub struct RegexBuilder {
    pattern: String,
    config: Config,
}

impl RegexBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            config: Config::new(),
        }
    }

    /// See [`Config::state_limit`].
    pub fn state_limit(&mut self, limit: Option<usize>) -> &mut Self {
        self.config = self.config.state_limit(limit);
        self
    }

    pub fn build(&self) -> CompileResult<Regex> {
        let normalized = normalize(&self.pattern);
        debug!("normalized {:?} to {:?}", self.pattern, crate::syntax::render(&normalized));

        let postfix = to_postfix(&normalized)?;
        debug!("postfix form of {:?}: {:?}", self.pattern, crate::syntax::render(&postfix));

        let nfa = Compiler::with_config(self.config).compile(&postfix)?;
        Ok(Regex {
            pattern: self.pattern.clone(),
            nfa,
        })
    }
}
