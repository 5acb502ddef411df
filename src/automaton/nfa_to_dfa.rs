// Subset construction: http://www.cs.nuim.ie/~jpower/Courses/Previous/parsing/node9.html

use super::{
    closure::ClosureCache,
    machine::{Automaton, Kind},
    stateid::StateId,
};
use crate::error::{Error, Result};
use log::debug;
use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    iter,
};

impl Automaton {
    fn any_final(&self, states: &BTreeSet<StateId>) -> bool {
        states.iter().any(|id| self[*id].is_final())
    }

    /// Builds an equivalent DFA by subset construction.
    ///
    /// DFA states are named `Q0`, `Q1`, … in the order their subsets are first
    /// seen; `Q0` is the epsilon closure of the initial state. A symbol whose
    /// move is empty gets no transition, which rejects on that input.
    pub fn determinize(&self) -> Result<Automaton> {
        self.validate_structure().into_result()?;
        let initial = self
            .initial()
            .ok_or_else(|| Error::InvalidAutomaton("no initial state".into()))?;

        let mut closures = ClosureCache::new(self);
        let mut nfa_to_dfa: BTreeMap<BTreeSet<StateId>, StateId> = BTreeMap::new();
        let mut dfa = Automaton::new(Kind::Dfa);

        // Create the start state of the DFA by taking the epsilon_closure of the start state of the NFA.
        let start_ids = closures.closure(&iter::once(initial).collect());
        let start = dfa.push_state(subset_name(0), self.any_final(&start_ids));
        nfa_to_dfa.insert(start_ids.clone(), start);

        let mut queue: VecDeque<BTreeSet<StateId>> = VecDeque::new();
        queue.push_back(start_ids);

        while let Some(nfa_ids) = queue.pop_front() {
            let dfa_id = nfa_to_dfa[&nfa_ids];

            for &symbol in self.alphabet() {
                let move_states = self.go(&nfa_ids, symbol);
                if move_states.is_empty() {
                    continue;
                }

                let move_state_e = closures.closure(&move_states);
                let dfa_e_id = match nfa_to_dfa.get(&move_state_e) {
                    Some(id) => *id,
                    None => {
                        let id = dfa.push_state(subset_name(dfa.len()), self.any_final(&move_state_e));
                        nfa_to_dfa.insert(move_state_e.clone(), id);

                        // Each new DFA state is expanded in turn; we are done once no new subsets appear.
                        queue.push_back(move_state_e);
                        id
                    }
                };

                dfa.connect(dfa_id, Some(symbol), dfa_e_id)?;
            }
        }

        debug!(
            "determinized {} NFA states into {} DFA states",
            self.len(),
            dfa.len()
        );
        Ok(dfa)
    }
}

fn subset_name(index: usize) -> String {
    format!("Q{}", index)
}
