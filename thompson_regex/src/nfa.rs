use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A state ID in the NFA
pub type StateId = usize;

/// A Thompson NFA state.
///
/// Every state has the same shape: a map of symbol transitions, a set of
/// epsilon transitions and an accepting flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    accepting: bool,
    transitions: BTreeMap<char, StateId>,
    epsilons: Vec<StateId>,
}

impl State {
    /// Whether this state accepts.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// The destination on `symbol`, if any.
    pub fn transition(&self, symbol: char) -> Option<StateId> {
        self.transitions.get(&symbol).copied()
    }

    /// All symbol transitions, ordered by symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (char, StateId)> + '_ {
        self.transitions.iter().map(|(&symbol, &target)| (symbol, target))
    }

    /// Destinations reachable without consuming input, in insertion order.
    pub fn epsilons(&self) -> &[StateId] {
        &self.epsilons
    }

    /// Whether the state can consume a symbol.
    pub fn has_transitions(&self) -> bool {
        !self.transitions.is_empty()
    }
}

/// Fragment of an NFA with start and end states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// A Thompson NFA.
///
/// States live in an arena and refer to each other by [`StateId`], so the
/// graph may share states and contain cycles. Only the compiler mutates an
/// NFA; once it is handed out it is read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NFA {
    states: Vec<State>,
    start: StateId,
    end: StateId,
    /// Next available state ID
    next_id: StateId,
}

impl NFA {
    /// Create a new empty NFA
    pub(crate) fn new() -> Self {
        Self {
            states: Vec::new(),
            start: 0,
            end: 0,
            next_id: 0,
        }
    }

    /// The entry state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The accepting state.
    pub fn end(&self) -> StateId {
        self.end
    }

    /// Look up a state. Panics if `id` did not come from this NFA.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    /// All states, indexed by [`StateId`].
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false for a compiled NFA, which has at least two states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub(crate) fn set_fragment(&mut self, fragment: Fragment) {
        self.start = fragment.start;
        self.end = fragment.end;
    }

    /// Add a new state and return its ID
    pub(crate) fn add_state(&mut self, accepting: bool) -> StateId {
        let id = self.next_id;
        self.states.push(State {
            accepting,
            ..State::default()
        });
        self.next_id += 1;
        id
    }

    pub(crate) fn set_accepting(&mut self, id: StateId, accepting: bool) {
        self.states[id].accepting = accepting;
    }

    /// Add (or replace) the transition from `from` on `symbol`.
    pub(crate) fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        self.states[from].transitions.insert(symbol, to);
    }

    /// Connect two states with an epsilon transition. Adding an edge that
    /// already exists does nothing.
    pub(crate) fn add_epsilon(&mut self, from: StateId, to: StateId) {
        let epsilons = &mut self.states[from].epsilons;
        if !epsilons.contains(&to) {
            epsilons.push(to);
        }
    }

    /// Compute the epsilon closure of `seeds`.
    ///
    /// Returns the frontier: every reached state that can consume a symbol
    /// or that accepts. States with only epsilon edges are passed through.
    /// Each state is visited at most once per call, which keeps epsilon
    /// cycles from looping and deduplicates across all seeds.
    pub fn epsilon_closure(&self, seeds: &[StateId]) -> Vec<StateId> {
        let mut frontier = Vec::new();
        let mut visited = HashSet::with_capacity(seeds.len());
        let mut stack: Vec<StateId> = seeds.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }

            let state = &self.states[id];
            if state.has_transitions() || state.accepting {
                frontier.push(id);
            }
            stack.extend(state.epsilons.iter().rev().filter(|&next| !visited.contains(next)));
        }

        frontier
    }

    /// Check if any state in the set is accepting
    pub fn is_accepting(&self, states: &[StateId]) -> bool {
        states.iter().any(|&id| self.states[id].accepting)
    }
}

impl fmt::Display for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}", self.start)?;
        writeln!(f, "accepting: {}", self.end)?;
        for (id, state) in self.states.iter().enumerate() {
            write!(f, "{:>4}:", id)?;
            if state.accepting {
                write!(f, " MATCH")?;
            }
            for (symbol, target) in state.transitions() {
                write!(f, " {:?} -> {}", symbol, target)?;
            }
            if !state.epsilons.is_empty() {
                write!(f, " ε -> {:?}", state.epsilons)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
