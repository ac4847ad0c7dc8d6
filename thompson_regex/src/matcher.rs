use crate::nfa::{StateId, NFA};

/// A matcher that simulates a Thompson NFA against whole inputs.
///
/// All live states advance together one character at a time, so the work
/// per character is bounded by the number of states and nothing is ever
/// retried.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    nfa: &'a NFA,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given NFA
    pub fn new(nfa: &'a NFA) -> Self {
        Self { nfa }
    }

    /// Check if the entire input matches
    pub fn is_match(&self, input: &str) -> bool {
        let mut current_states = self.nfa.epsilon_closure(&[self.nfa.start()]);

        for ch in input.chars() {
            let next_states = self.step_states(&current_states, ch);
            current_states = self.nfa.epsilon_closure(&next_states);
            trace!("after {:?}: {} live states", ch, current_states.len());

            if current_states.is_empty() {
                return false;
            }
        }

        self.nfa.is_accepting(&current_states)
    }

    /// Follow the transitions on `ch` out of every current state.
    fn step_states(&self, current_states: &[StateId], ch: char) -> Vec<StateId> {
        current_states
            .iter()
            .filter_map(|&id| self.nfa.state(id).transition(ch))
            .collect()
    }
}
