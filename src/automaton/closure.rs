use super::{machine::Automaton, stateid::StateId};
use crate::config::Config;
use indexmap::IndexMap;
use std::collections::BTreeSet;

impl Automaton {
    /// Goes through all the states in 'from' and adds all the states one can get to by using epsilon
    /// transitions. The result always contains 'from'.
    pub fn epsilon_closure<I>(&self, from: I) -> BTreeSet<StateId>
    where
        I: IntoIterator<Item = StateId>,
    {
        let mut states = BTreeSet::new();
        let mut stack = vec![];
        for q in from {
            if states.insert(q) {
                stack.push(q);
            }
        }

        while let Some(q) = stack.pop() {
            for q_e in self[q].epsilons.iter() {
                if states.insert(*q_e) {
                    stack.push(*q_e)
                }
            }
        }
        states
    }

    /// The states reachable from 'states' by consuming 'symbol', without following epsilons.
    pub(crate) fn go(&self, states: &BTreeSet<StateId>, symbol: char) -> BTreeSet<StateId> {
        states
            .iter()
            .flat_map(|id| self[(*id, Some(symbol))].iter().cloned())
            .collect()
    }
}

/// Memoizes epsilon closures for a single automaton.
///
/// The cache borrows the automaton it serves, so it can never be consulted for a
/// different one. Keys are the sorted state lists of the queried sets. When full,
/// the oldest entry is evicted. A capacity of zero disables memoization.
#[derive(Debug)]
pub struct ClosureCache<'a> {
    automaton: &'a Automaton,
    capacity: usize,
    memo: IndexMap<Vec<StateId>, BTreeSet<StateId>>,
}

impl<'a> ClosureCache<'a> {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(automaton: &'a Automaton) -> Self {
        Self::with_capacity(automaton, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(automaton: &'a Automaton, capacity: usize) -> Self {
        Self {
            automaton,
            capacity,
            memo: IndexMap::new(),
        }
    }

    pub fn from_config(automaton: &'a Automaton, config: &Config) -> Self {
        Self::with_capacity(automaton, config.closure_cache_capacity)
    }

    pub fn automaton(&self) -> &'a Automaton {
        self.automaton
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of memoized closures.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    pub fn closure(&mut self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        // A BTreeSet iterates in order, so this is already the canonical key.
        let key: Vec<StateId> = states.iter().cloned().collect();
        if let Some(hit) = self.memo.get(&key) {
            return hit.clone();
        }

        let result = self.automaton.epsilon_closure(key.iter().cloned());
        if self.capacity > 0 {
            if self.memo.len() >= self.capacity {
                self.memo.shift_remove_index(0);
            }
            self.memo.insert(key, result.clone());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{qc::NfaCase, AddMode};
    use quickcheck_macros::quickcheck;
    use std::iter;

    fn chain() -> Automaton {
        // p -ε-> q -ε-> r, r -ε-> p, s isolated
        let mut nfa = Automaton::nfa();
        for name in &["p", "q", "r", "s"] {
            nfa.add_state(*name, false, AddMode::Strict).unwrap();
        }
        nfa.add_transition("p", None, "q").unwrap();
        nfa.add_transition("q", None, "r").unwrap();
        nfa.add_transition("r", None, "p").unwrap();
        nfa.add_transition("r", Some('a'), "s").unwrap();
        nfa
    }

    fn ids(nfa: &Automaton, names: &[&str]) -> BTreeSet<StateId> {
        names.iter().map(|n| nfa.state_id(n).unwrap()).collect()
    }

    #[test]
    fn follows_epsilon_cycles() {
        let nfa = chain();
        let closure = nfa.epsilon_closure(ids(&nfa, &["q"]));
        assert_eq!(closure, ids(&nfa, &["p", "q", "r"]));
    }

    #[test]
    fn ignores_symbol_transitions() {
        let nfa = chain();
        let closure = nfa.epsilon_closure(ids(&nfa, &["s"]));
        assert_eq!(closure, ids(&nfa, &["s"]));
    }

    #[test]
    fn empty_set_stays_empty() {
        let nfa = chain();
        assert!(nfa.epsilon_closure(iter::empty()).is_empty());
    }

    #[test]
    fn cache_returns_same_closures() {
        let nfa = chain();
        let mut cache = ClosureCache::new(&nfa);

        let first = cache.closure(&ids(&nfa, &["p"]));
        let again = cache.closure(&ids(&nfa, &["p"]));
        assert_eq!(first, again);
        assert_eq!(first, nfa.epsilon_closure(ids(&nfa, &["p"])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_evicts_oldest() {
        let nfa = chain();
        let mut cache = ClosureCache::with_capacity(&nfa, 2);

        cache.closure(&ids(&nfa, &["p"]));
        cache.closure(&ids(&nfa, &["q"]));
        cache.closure(&ids(&nfa, &["s"]));
        assert_eq!(cache.len(), 2);

        let uncached = ClosureCache::with_capacity(&nfa, 0);
        assert!(uncached.is_empty());
    }

    #[quickcheck]
    fn closure_contains_input(case: NfaCase, seed: Vec<usize>) -> bool {
        let nfa = case.nfa;
        let from: BTreeSet<StateId> = seed.iter().map(|i| StateId::of(i % nfa.len())).collect();
        nfa.epsilon_closure(from.iter().cloned()).is_superset(&from)
    }

    #[quickcheck]
    fn closure_is_idempotent(case: NfaCase, seed: Vec<usize>) -> bool {
        let nfa = case.nfa;
        let from: BTreeSet<StateId> = seed.iter().map(|i| StateId::of(i % nfa.len())).collect();
        let once = nfa.epsilon_closure(from);
        let twice = nfa.epsilon_closure(once.iter().cloned());
        once == twice
    }

    #[quickcheck]
    fn cache_agrees_with_direct(case: NfaCase, seeds: Vec<Vec<usize>>) -> bool {
        let nfa = case.nfa;
        let mut cache = ClosureCache::with_capacity(&nfa, 3);
        seeds.iter().chain(seeds.iter()).all(|seed| {
            let from: BTreeSet<StateId> =
                seed.iter().map(|i| StateId::of(i % nfa.len())).collect();
            cache.closure(&from) == nfa.epsilon_closure(from.iter().cloned())
        })
    }
}
