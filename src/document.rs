use crate::{
    automaton::{AddMode, Automaton, Kind},
    structured::{parse_symbol, symbol_label},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub name: String,
    #[serde(rename = "final", default)]
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: String,
    pub symbol: String,
    pub to: String,
}

/// The persisted form of an automaton. Epsilon transitions use the symbol `ε`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDocument {
    pub initial: Option<String>,
    #[serde(default)]
    pub states: Vec<StateRecord>,
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
}

impl AutomatonDocument {
    pub fn from_automaton(automaton: &Automaton) -> Self {
        let states = automaton
            .states()
            .map(|(_, state)| StateRecord {
                name: state.name().to_string(),
                is_final: state.is_final(),
            })
            .collect();

        let transitions = automaton
            .transitions()
            .map(|(from, symbol, to)| TransitionRecord {
                from: automaton[from].name().to_string(),
                symbol: symbol_label(symbol),
                to: automaton[to].name().to_string(),
            })
            .collect();

        Self {
            initial: automaton.initial_state().map(|s| s.name().to_string()),
            states,
            transitions,
        }
    }

    /// Rebuilds the automaton. The kind is not part of the document.
    pub fn to_automaton(&self, kind: Kind) -> crate::Result<Automaton> {
        let mut automaton = Automaton::new(kind);

        for state in &self.states {
            automaton.add_state(state.name.as_str(), state.is_final, AddMode::Strict)?;
        }
        if let Some(initial) = &self.initial {
            automaton.set_initial(initial)?;
        }
        for t in &self.transitions {
            let symbol = parse_symbol(Some(t.symbol.as_str()))?;
            automaton.add_transition(&t.from, symbol, &t.to)?;
        }

        Ok(automaton)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing automaton document")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing automaton document")
    }
}

impl From<&Automaton> for AutomatonDocument {
    fn from(automaton: &Automaton) -> Self {
        Self::from_automaton(automaton)
    }
}
