pub type Result<T> = std::result::Result<T, Error>;

/// An error returned from building, transforming or validating an automaton.
///
/// Failures are reported to the direct caller only. Additions that succeeded
/// before a failing call are kept; nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The automaton kind is neither NFA nor DFA.
    #[error("unknown automaton type `{0}`")]
    InvalidAutomatonType(String),
    #[error("state `{0}` already exists")]
    DuplicateState(String),
    /// A transition or the initial state names a state that is not in the automaton.
    #[error("state `{0}` does not exist")]
    UnknownState(String),
    /// A DFA already has a different destination for this state and symbol,
    /// or an epsilon transition was added to a DFA.
    #[error("state `{state}` already has a transition on {symbol}")]
    NonDeterministicTransition { state: String, symbol: String },
    #[error("invalid regular expression: {0}")]
    InvalidExpression(String),
    /// The automaton failed structural validation.
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),
    /// A structured edge label that is neither epsilon nor a single symbol.
    #[error("invalid transition label `{0}`")]
    InvalidSymbol(String),
}
