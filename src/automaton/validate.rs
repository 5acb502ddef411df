use super::{machine::Automaton, stateid::StateId};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of a structural check. Errors make the automaton unusable for the
/// algorithms; warnings are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error<S: Into<String>>(&mut self, message: S) {
        self.errors.push(message.into())
    }

    pub(crate) fn warn<S: Into<String>>(&mut self, message: S) {
        self.warnings.push(message.into())
    }

    /// Turns the errors, if any, into `Error::InvalidAutomaton`; otherwise returns the warnings.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(Error::InvalidAutomaton(self.errors.join("; ")))
        }
    }
}

impl Automaton {
    /// Checks for an initial state and at least one final state.
    ///
    /// Destinations need no check: `add_transition` resolves both endpoints by
    /// name before storing anything, so every stored transition points into the
    /// arena.
    pub fn validate_structure(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.initial().is_none() {
            report.error("no initial state");
        }
        if self.final_states().next().is_none() {
            report.error("no final state");
        }

        if self.transitions().next().is_none() {
            report.warn("no transitions");
        }

        if self.initial().is_some() {
            let reachable = self.reachable();
            for (id, state) in self.states() {
                if !reachable.contains(&id) {
                    report.warn(format!("state `{}` is unreachable", state.name()));
                }
            }
        }

        report
    }

    /// States reachable from the initial state through any transition.
    pub fn reachable(&self) -> BTreeSet<StateId> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<StateId> = self.initial().into_iter().collect();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let state = &self[id];
            let next = state
                .transitions()
                .flat_map(|(_, targets)| targets.iter())
                .chain(state.epsilons.iter());
            for to in next {
                if !seen.contains(to) {
                    stack.push(*to);
                }
            }
        }

        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AddMode;

    #[test]
    fn empty_automaton_has_errors() {
        let report = Automaton::nfa().validate_structure();
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(
            report.into_result(),
            Err(Error::InvalidAutomaton(_))
        ));
    }

    #[test]
    fn missing_final_is_an_error() {
        let mut nfa = Automaton::nfa();
        nfa.add_state("q0", false, AddMode::Strict).unwrap();
        nfa.add_state("q1", false, AddMode::Strict).unwrap();
        nfa.add_transition("q0", Some('a'), "q1").unwrap();

        let report = nfa.validate_structure();
        assert_eq!(report.errors, vec!["no final state".to_string()]);
        // Nothing gets promoted to final behind the caller's back.
        assert_eq!(nfa.final_states().count(), 0);
    }

    #[test]
    fn unreachable_states_warn() {
        let mut nfa = Automaton::nfa();
        nfa.add_state("q0", false, AddMode::Strict).unwrap();
        nfa.add_state("q1", true, AddMode::Strict).unwrap();
        nfa.add_state("lost", false, AddMode::Strict).unwrap();
        nfa.add_transition("q0", None, "q1").unwrap();

        let report = nfa.validate_structure();
        assert!(report.is_valid());
        assert_eq!(report.warnings, vec!["state `lost` is unreachable".to_string()]);
    }

    #[test]
    fn unknown_destination_is_never_stored() {
        let mut nfa = Automaton::nfa();
        nfa.add_state("q0", true, AddMode::Strict).unwrap();
        assert_eq!(
            nfa.add_transition("q0", Some('a'), "nowhere"),
            Err(Error::UnknownState("nowhere".into()))
        );

        assert_eq!(nfa.transitions().count(), 0);
        let report = nfa.validate_structure();
        assert!(report.is_valid());
        assert!(nfa.transitions().all(|(_, _, to)| to.index() < nfa.len()));
    }

    #[test]
    fn no_transitions_warns() {
        let mut nfa = Automaton::nfa();
        nfa.add_state("q0", true, AddMode::Strict).unwrap();

        let warnings = nfa.validate_structure().into_result().unwrap();
        assert_eq!(warnings, vec!["no transitions".to_string()]);
    }
}
