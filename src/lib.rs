//! Finite automata over character symbols: build NFAs and DFAs state by state
//! or from a regular expression, determinize, minimize and simulate them.
//!
//! ```
//! use regular_automata::Automaton;
//!
//! let nfa = Automaton::regex("(a|b)*abb").unwrap();
//! let dfa = nfa.determinize().unwrap().minimize().unwrap();
//! assert!(dfa.accept("babb"));
//! assert!(!dfa.accept("abba"));
//! ```

pub mod automaton;
mod cache;
mod config;
mod document;
mod error;
mod structured;

pub use automaton::{
    compile_regex, AddMode, Automaton, ClosureCache, Kind, State, StateId, ValidationReport,
    EPSILON,
};
pub use cache::AcceptCache;
pub use config::Config;
pub use document::{AutomatonDocument, StateRecord, TransitionRecord};
pub use error::{Error, Result};
pub use structured::{build_from_structured, to_structured, validate_graph, Edge, Graph, Node};
