use super::{
    closure::ClosureCache,
    machine::{Automaton, Kind},
    stateid::StateId,
};
use log::trace;
use std::{collections::BTreeSet, iter};

impl Automaton {
    /// Returns whether `input` belongs to the language of this automaton.
    ///
    /// Every `char` of `input` is one symbol. An automaton without an initial
    /// state accepts nothing.
    pub fn accept(&self, input: &str) -> bool {
        match self.kind() {
            Kind::Dfa => self.accept_deterministic(input),
            Kind::Nfa => self.simulate(input, |states| self.epsilon_closure(states.iter().cloned())),
        }
    }

    fn accept_deterministic(&self, input: &str) -> bool {
        let mut current = match self.initial() {
            Some(id) => id,
            None => return false,
        };

        for symbol in input.chars() {
            match self[(current, Some(symbol))].first() {
                Some(next) => current = *next,
                None => {
                    trace!("`{}` has no move on {:?}", self[current].name(), symbol);
                    return false;
                }
            }
        }

        self[current].is_final()
    }

    fn simulate<F>(&self, input: &str, mut closure: F) -> bool
    where
        F: FnMut(&BTreeSet<StateId>) -> BTreeSet<StateId>,
    {
        let initial = match self.initial() {
            Some(id) => id,
            None => return false,
        };
        let mut current = closure(&iter::once(initial).collect());

        for symbol in input.chars() {
            let moved = self.go(&current, symbol);
            if moved.is_empty() {
                trace!("no move on {:?} from {} states", symbol, current.len());
                return false;
            }
            current = closure(&moved);
            trace!("after {:?}: {} active states", symbol, current.len());
        }

        current.iter().any(|id| self[*id].is_final())
    }
}

impl<'a> ClosureCache<'a> {
    /// Same as `Automaton::accept`, with epsilon closures served from this cache.
    pub fn accept(&mut self, input: &str) -> bool {
        let automaton = self.automaton();
        match automaton.kind() {
            Kind::Dfa => automaton.accept_deterministic(input),
            Kind::Nfa => automaton.simulate(input, |states| self.closure(states)),
        }
    }
}
