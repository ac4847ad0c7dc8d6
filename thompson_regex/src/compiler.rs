use crate::{
    nfa::{Fragment, StateId, NFA},
    syntax::{Token, TokenKind},
    CompileError, CompileResult,
};

/// Default cap on the number of states one pattern may compile to.
pub const DEFAULT_STATE_LIMIT: usize = 1 << 20;

/// Options for the [`Compiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    state_limit: Option<usize>,
}

impl Config {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            state_limit: Some(DEFAULT_STATE_LIMIT),
        }
    }

    /// Set the maximum number of states a compiled NFA may have. `None`
    /// removes the limit.
    pub fn state_limit(mut self, limit: Option<usize>) -> Self {
        self.state_limit = limit;
        self
    }

    pub fn get_state_limit(&self) -> Option<usize> {
        self.state_limit
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiler that turns a postfix token stream into a Thompson NFA.
///
/// A compiler is consumed by [`Compiler::compile`], so state IDs always
/// start from zero and two compilations never share anything.
pub struct Compiler {
    config: Config,
    nfa: NFA,
    fragments: Vec<Fragment>,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self::with_config(Config::new())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            nfa: NFA::new(),
            fragments: Vec::new(),
        }
    }

    /// Compile postfix tokens, as produced by [`to_postfix`], into an NFA.
    ///
    /// [`to_postfix`]: crate::syntax::to_postfix
    pub fn compile(mut self, postfix: &[Token]) -> CompileResult<NFA> {
        for &token in postfix {
            let fragment = match token.kind {
                TokenKind::Literal(ch) => self.compile_literal(ch)?,
                TokenKind::Concat => {
                    let (first, second) = self.pop_pair(token)?;
                    self.compile_concat(first, second)
                }
                TokenKind::Alternate => {
                    let (first, second) = self.pop_pair(token)?;
                    self.compile_alternation(first, second)?
                }
                TokenKind::Star => {
                    let expr = self.pop_one(token)?;
                    self.compile_star(expr)?
                }
                TokenKind::Optional => {
                    let expr = self.pop_one(token)?;
                    self.compile_question(expr)?
                }
                TokenKind::Plus => {
                    let expr = self.pop_one(token)?;
                    self.compile_plus(expr)?
                }
                TokenKind::OpenGroup | TokenKind::CloseGroup => {
                    return Err(CompileError::MismatchedParentheses {
                        offset: token.offset,
                    })
                }
            };
            self.fragments.push(fragment);
        }

        let fragment = match self.fragments.len() {
            0 => self.compile_empty()?,
            1 => self.fragments[0],
            fragments => return Err(CompileError::MalformedPattern { fragments }),
        };
        self.nfa.set_fragment(fragment);

        debug!(
            "compiled NFA with {} states (start {}, accepting {})",
            self.nfa.len(),
            fragment.start,
            fragment.end
        );
        Ok(self.nfa)
    }

    fn pop_one(&mut self, token: Token) -> CompileResult<Fragment> {
        self.fragments.pop().ok_or(CompileError::DanglingOperator {
            operator: token.kind,
            offset: token.offset,
        })
    }

    /// Pop two operands, returned in pattern order.
    fn pop_pair(&mut self, token: Token) -> CompileResult<(Fragment, Fragment)> {
        if self.fragments.len() < 2 {
            return Err(CompileError::DanglingOperator {
                operator: token.kind,
                offset: token.offset,
            });
        }
        let second = self.pop_one(token)?;
        let first = self.pop_one(token)?;
        Ok((first, second))
    }

    fn add_state(&mut self, accepting: bool) -> CompileResult<StateId> {
        if let Some(limit) = self.config.state_limit {
            if self.nfa.len() >= limit {
                return Err(CompileError::TooComplex { limit });
            }
        }
        Ok(self.nfa.add_state(accepting))
    }

    /// Fresh `start` and accepting `end` states for a composite fragment.
    fn new_fragment(&mut self) -> CompileResult<Fragment> {
        let start = self.add_state(false)?;
        let end = self.add_state(true)?;
        Ok(Fragment { start, end })
    }

    /// The empty pattern: a single epsilon edge.
    fn compile_empty(&mut self) -> CompileResult<Fragment> {
        let fragment = self.new_fragment()?;
        self.nfa.add_epsilon(fragment.start, fragment.end);
        Ok(fragment)
    }

    fn compile_literal(&mut self, ch: char) -> CompileResult<Fragment> {
        let fragment = self.new_fragment()?;
        self.nfa.add_transition(fragment.start, ch, fragment.end);
        Ok(fragment)
    }

    fn compile_concat(&mut self, first: Fragment, second: Fragment) -> Fragment {
        self.nfa.add_epsilon(first.end, second.start);
        self.nfa.set_accepting(first.end, false);
        Fragment {
            start: first.start,
            end: second.end,
        }
    }

    fn compile_alternation(&mut self, first: Fragment, second: Fragment) -> CompileResult<Fragment> {
        let fragment = self.new_fragment()?;
        for branch in [first, second] {
            self.nfa.add_epsilon(fragment.start, branch.start);
            self.nfa.add_epsilon(branch.end, fragment.end);
            self.nfa.set_accepting(branch.end, false);
        }
        Ok(fragment)
    }

    /// `expr*`: bypass edge plus a loop back into `expr`.
    fn compile_star(&mut self, expr: Fragment) -> CompileResult<Fragment> {
        let fragment = self.new_fragment()?;
        self.nfa.add_epsilon(fragment.start, fragment.end);
        self.nfa.add_epsilon(fragment.start, expr.start);
        self.nfa.add_epsilon(expr.end, fragment.end);
        self.nfa.add_epsilon(expr.end, expr.start);
        self.nfa.set_accepting(expr.end, false);
        Ok(fragment)
    }

    /// `expr?`: bypass edge, no loop.
    fn compile_question(&mut self, expr: Fragment) -> CompileResult<Fragment> {
        let fragment = self.new_fragment()?;
        self.nfa.add_epsilon(fragment.start, fragment.end);
        self.nfa.add_epsilon(fragment.start, expr.start);
        self.nfa.add_epsilon(expr.end, fragment.end);
        self.nfa.set_accepting(expr.end, false);
        Ok(fragment)
    }

    /// `expr+`: loop back into `expr` without a bypass.
    fn compile_plus(&mut self, expr: Fragment) -> CompileResult<Fragment> {
        let fragment = self.new_fragment()?;
        self.nfa.add_epsilon(fragment.start, expr.start);
        self.nfa.add_epsilon(expr.end, fragment.end);
        self.nfa.add_epsilon(expr.end, expr.start);
        self.nfa.set_accepting(expr.end, false);
        Ok(fragment)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{normalize, to_postfix};

    fn build(pattern: &str) -> CompileResult<NFA> {
        let postfix = to_postfix(&normalize(pattern))?;
        Compiler::new().compile(&postfix)
    }

    fn accepting_states(nfa: &NFA) -> Vec<StateId> {
        nfa.states()
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_accepting())
            .map(|(id, _)| id)
            .collect()
    }

    #[test]
    fn test_empty_pattern() {
        let nfa = build("").unwrap();
        assert_eq!(nfa.len(), 2);
        assert_eq!(nfa.state(nfa.start()).epsilons(), &[nfa.end()]);
        assert_eq!(accepting_states(&nfa), vec![nfa.end()]);
    }

    #[test]
    fn test_literal() {
        let nfa = build("a").unwrap();
        assert_eq!(nfa.len(), 2);
        assert_eq!(nfa.state(nfa.start()).transition('a'), Some(nfa.end()));
        assert_eq!(nfa.state(nfa.start()).transition('b'), None);
    }

    #[test]
    fn test_concat_links_fragments() {
        let nfa = build("ab").unwrap();
        // a: 0 -> 1, b: 2 -> 3
        assert_eq!(nfa.start(), 0);
        assert_eq!(nfa.end(), 3);
        assert_eq!(nfa.state(1).epsilons(), &[2]);
        assert_eq!(accepting_states(&nfa), vec![3]);
    }

    #[test]
    fn test_alternation_shape() {
        let nfa = build("a|b").unwrap();
        // a: 0 -> 1, b: 2 -> 3, split 4, join 5
        assert_eq!(nfa.start(), 4);
        assert_eq!(nfa.end(), 5);
        assert_eq!(nfa.state(4).epsilons(), &[0, 2]);
        assert_eq!(nfa.state(1).epsilons(), &[5]);
        assert_eq!(nfa.state(3).epsilons(), &[5]);
        assert_eq!(accepting_states(&nfa), vec![5]);
    }

    #[test]
    fn test_star_shape() {
        let nfa = build("a*").unwrap();
        assert_eq!((nfa.start(), nfa.end()), (2, 3));
        assert_eq!(nfa.state(2).epsilons(), &[3, 0]);
        assert_eq!(nfa.state(1).epsilons(), &[3, 0]);
        assert_eq!(accepting_states(&nfa), vec![3]);
    }

    #[test]
    fn test_question_has_no_cycle() {
        let nfa = build("a?").unwrap();
        assert_eq!(nfa.state(2).epsilons(), &[3, 0]);
        assert_eq!(nfa.state(1).epsilons(), &[3]);
        assert_eq!(accepting_states(&nfa), vec![3]);
    }

    #[test]
    fn test_plus_has_no_bypass() {
        let nfa = build("a+").unwrap();
        assert_eq!(nfa.state(2).epsilons(), &[0]);
        assert_eq!(nfa.state(1).epsilons(), &[3, 0]);
        assert_eq!(accepting_states(&nfa), vec![3]);
    }

    #[test]
    fn test_single_accepting_state() {
        for pattern in ["", "a", "ab", "a|b", "(ab|c)*d+e?", "((a*)*)*", "a(b|c)+"] {
            let nfa = build(pattern).unwrap();
            assert_eq!(accepting_states(&nfa), vec![nfa.end()], "{}", pattern);
        }
    }

    #[test]
    fn test_compiles_deterministically() {
        let first = build("(a|b)*abb").unwrap();
        let second = build("(a|b)*abb").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dangling_operators() {
        assert_eq!(
            build("a|").unwrap_err(),
            CompileError::DanglingOperator {
                operator: TokenKind::Alternate,
                offset: 1
            }
        );
        assert_eq!(
            build("*a").unwrap_err(),
            CompileError::DanglingOperator {
                operator: TokenKind::Star,
                offset: 0
            }
        );
        assert_eq!(
            build("|").unwrap_err(),
            CompileError::DanglingOperator {
                operator: TokenKind::Alternate,
                offset: 0
            }
        );
        assert!(matches!(
            build("a()").unwrap_err(),
            CompileError::DanglingOperator {
                operator: TokenKind::Concat,
                ..
            }
        ));
    }

    #[test]
    fn test_leftover_fragments() {
        // Without normalization nothing joins the two literals.
        let postfix = [
            Token::new(TokenKind::Literal('a'), 0),
            Token::new(TokenKind::Literal('b'), 1),
        ];
        assert_eq!(
            Compiler::new().compile(&postfix).unwrap_err(),
            CompileError::MalformedPattern { fragments: 2 }
        );
    }

    #[test]
    fn test_stray_parenthesis() {
        let postfix = [Token::new(TokenKind::OpenGroup, 4)];
        assert_eq!(
            Compiler::new().compile(&postfix).unwrap_err(),
            CompileError::MismatchedParentheses { offset: 4 }
        );
    }

    #[test]
    fn test_state_limit() {
        assert_eq!(Config::default().get_state_limit(), Some(DEFAULT_STATE_LIMIT));

        let postfix = to_postfix(&normalize("abc")).unwrap();
        let config = Config::new().state_limit(Some(4));
        assert_eq!(
            Compiler::with_config(config).compile(&postfix).unwrap_err(),
            CompileError::TooComplex { limit: 4 }
        );

        let config = Config::new().state_limit(Some(6));
        assert_eq!(Compiler::with_config(config).compile(&postfix).unwrap().len(), 6);

        let config = Config::new().state_limit(None);
        assert!(Compiler::with_config(config).compile(&postfix).is_ok());
    }
}
