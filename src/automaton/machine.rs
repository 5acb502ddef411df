use super::stateid::StateId;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    collections::{hash_map::DefaultHasher, BTreeSet, HashMap},
    fmt,
    hash::{Hash, Hasher},
    ops::Index,
    str::FromStr,
};

/// Label used for epsilon transitions at the structured boundary.
pub const EPSILON: char = 'ε';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    #[serde(rename = "NFA", alias = "AFND")]
    Nfa,
    #[serde(rename = "DFA", alias = "AFD")]
    Dfa,
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NFA" | "AFND" => Ok(Kind::Nfa),
            "DFA" | "AFD" => Ok(Kind::Dfa),
            _ => Err(Error::InvalidAutomatonType(s.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Nfa => write!(f, "NFA"),
            Kind::Dfa => write!(f, "DFA"),
        }
    }
}

/// How `add_state` treats a name that is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMode {
    /// Fail with `DuplicateState`.
    Strict,
    /// Keep the existing state, OR-ing in the final flag.
    Merge,
}

#[derive(Debug, Clone)]
pub struct State {
    name: String,
    is_final: bool,

    // Destinations per symbol, both in insertion order.
    transitions: IndexMap<char, Vec<StateId>>,

    pub(crate) epsilons: Vec<StateId>,
}

impl State {
    fn new(name: String, is_final: bool) -> Self {
        Self {
            name,
            is_final,
            transitions: IndexMap::new(),
            epsilons: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Destinations reached on `symbol`, empty when there is no such transition.
    pub fn targets(&self, symbol: char) -> &[StateId] {
        self.transitions
            .get(&symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn transitions(&self) -> impl Iterator<Item = (char, &[StateId])> + '_ {
        self.transitions
            .iter()
            .map(|(symbol, targets)| (*symbol, targets.as_slice()))
    }

    pub fn epsilons(&self) -> &[StateId] {
        &self.epsilons
    }
}

/// A finite-state automaton whose states live in an arena owned by the automaton.
///
/// States are addressed by `StateId` handles internally and by name at the API
/// surface. Insertion order of states and of transitions is preserved.
#[derive(Debug, Clone)]
pub struct Automaton {
    kind: Kind,

    /// The nodes of the automaton, indexed by `StateId`.
    pub(crate) states: Vec<State>,

    names: HashMap<String, StateId>,
    initial: Option<StateId>,

    /// Every non-epsilon symbol used by some transition.
    alphabet: BTreeSet<char>,
}

impl Index<StateId> for Automaton {
    type Output = State;
    fn index(&self, StateId(index): StateId) -> &Self::Output {
        &self.states[index as usize]
    }
}

/// Returns the destinations of a state for a symbol, or its epsilon destinations for `None`.
impl Index<(StateId, Option<char>)> for Automaton {
    type Output = [StateId];
    fn index(&self, (id, step): (StateId, Option<char>)) -> &Self::Output {
        let state = &self[id];
        match step {
            Some(symbol) => state.targets(symbol),
            None => &state.epsilons,
        }
    }
}

impl Automaton {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            states: vec![],
            names: HashMap::new(),
            initial: None,
            alphabet: BTreeSet::new(),
        }
    }

    pub fn nfa() -> Self {
        Self::new(Kind::Nfa)
    }

    pub fn dfa() -> Self {
        Self::new(Kind::Dfa)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn initial(&self) -> Option<StateId> {
        self.initial
    }

    pub fn initial_state(&self) -> Option<&State> {
        self.initial.map(|id| &self[id])
    }

    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.names.get(name).copied()
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.state_id(name).map(|id| &self[id])
    }

    pub fn state_ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.states.len()).map(StateId::of)
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| (StateId::of(index), state))
    }

    pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states().filter(|(_, s)| s.is_final).map(|(id, _)| id)
    }

    /// Every `(origin, symbol, destination)` triple; `None` marks epsilon.
    ///
    /// Per state, symbol transitions come first in insertion order, then epsilon ones.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Option<char>, StateId)> + '_ {
        self.states().flat_map(|(from, state)| {
            let labelled = state.transitions().flat_map(move |(symbol, targets)| {
                targets.iter().map(move |to| (from, Some(symbol), *to))
            });
            let epsilons = state.epsilons.iter().map(move |to| (from, None, *to));
            labelled.chain(epsilons)
        })
    }

    /// Adds a state. The first state added to an empty automaton becomes the initial state.
    pub fn add_state<N: Into<String>>(
        &mut self,
        name: N,
        is_final: bool,
        mode: AddMode,
    ) -> Result<StateId> {
        let name = name.into();
        if let Some(&id) = self.names.get(&name) {
            return match mode {
                AddMode::Strict => Err(Error::DuplicateState(name)),
                AddMode::Merge => {
                    self.states[id.index()].is_final |= is_final;
                    Ok(id)
                }
            };
        }

        Ok(self.push_state(name, is_final))
    }

    pub fn set_initial(&mut self, name: &str) -> Result<()> {
        let id = self.require(name)?;
        self.initial = Some(id);
        Ok(())
    }

    /// Adds `origin --symbol--> destination`; a `None` symbol is an epsilon transition.
    ///
    /// `Some(EPSILON)` is rejected with `InvalidSymbol`: `ε` is reserved as the
    /// epsilon label of the structured and persisted forms.
    pub fn add_transition(
        &mut self,
        origin: &str,
        symbol: Option<char>,
        destination: &str,
    ) -> Result<()> {
        let from = self.require(origin)?;
        let to = self.require(destination)?;
        self.connect(from, symbol, to)
    }

    /// True iff every (state, symbol) pair has at most one destination. Epsilons are ignored.
    pub fn is_deterministic(&self) -> bool {
        self.states
            .iter()
            .all(|state| state.transitions.values().all(|targets| targets.len() <= 1))
    }

    /// A hash over kind, states, initial state and transitions.
    ///
    /// Structurally equal automata have equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.kind.hash(&mut hasher);
        for state in &self.states {
            state.name.hash(&mut hasher);
            state.is_final.hash(&mut hasher);
        }
        self.initial_state().map(State::name).hash(&mut hasher);
        for (from, symbol, to) in self.transitions() {
            self[from].name.hash(&mut hasher);
            symbol.hash(&mut hasher);
            self[to].name.hash(&mut hasher);
        }
        hasher.finish()
    }

    fn require(&self, name: &str) -> Result<StateId> {
        self.state_id(name)
            .ok_or_else(|| Error::UnknownState(name.to_string()))
    }

    /// Appends a state without checking the name. Callers guarantee uniqueness.
    pub(crate) fn push_state(&mut self, name: String, is_final: bool) -> StateId {
        let id = StateId::of(self.states.len());
        self.names.insert(name.clone(), id);
        self.states.push(State::new(name, is_final));
        if self.initial.is_none() {
            self.initial = Some(id);
        }
        id
    }

    pub(crate) fn set_initial_id(&mut self, id: StateId) {
        self.initial = Some(id);
    }

    pub(crate) fn set_final(&mut self, id: StateId, is_final: bool) {
        self.states[id.index()].is_final = is_final;
    }

    pub(crate) fn connect(&mut self, from: StateId, symbol: Option<char>, to: StateId) -> Result<()> {
        let kind = self.kind;
        let state = &mut self.states[from.index()];

        match symbol {
            None => {
                if kind == Kind::Dfa {
                    return Err(Error::NonDeterministicTransition {
                        state: state.name.clone(),
                        symbol: EPSILON.to_string(),
                    });
                }
                if !state.epsilons.contains(&to) {
                    state.epsilons.push(to);
                }
            }
            Some(EPSILON) => return Err(Error::InvalidSymbol(EPSILON.to_string())),
            Some(c) => {
                let targets = state.transitions.entry(c).or_insert_with(Vec::new);
                if targets.contains(&to) {
                    return Ok(());
                }
                if kind == Kind::Dfa && !targets.is_empty() {
                    return Err(Error::NonDeterministicTransition {
                        state: state.name.clone(),
                        symbol: c.to_string(),
                    });
                }
                targets.push(to);
                self.alphabet.insert(c);
            }
        }

        Ok(())
    }

    /// Moves every state of `other` into `self` and returns the offset added to its ids.
    ///
    /// The initial state of `self` is unchanged. Fails if a name is present in both.
    pub(crate) fn absorb(&mut self, other: Automaton) -> Result<usize> {
        let offset = self.states.len();

        for mut state in other.states {
            if self.names.contains_key(&state.name) {
                return Err(Error::DuplicateState(state.name));
            }

            // Every StateId from 'other' is shifted by 'offset'
            for targets in state.transitions.values_mut() {
                for id in targets.iter_mut() {
                    *id = id.add(offset);
                }
            }
            for id in state.epsilons.iter_mut() {
                *id = id.add(offset);
            }

            let id = StateId::of(self.states.len());
            self.names.insert(state.name.clone(), id);
            self.states.push(state);
        }
        self.alphabet.extend(other.alphabet);

        Ok(offset)
    }
}
