use super::{
    machine::{Automaton, Kind},
    stateid::StateId,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, trace};

/// For each symbol in alphabet order, the block reached from a state, `None` when
/// the state has no transition on that symbol.
type Signature = Vec<Option<usize>>;

fn block_table(blocks: &[Vec<StateId>], len: usize) -> Vec<usize> {
    let mut block_of = vec![0; len];
    for (index, block) in blocks.iter().enumerate() {
        for id in block {
            block_of[id.index()] = index;
        }
    }
    block_of
}

impl Automaton {
    /// Minimizes a DFA by Moore partition refinement.
    ///
    /// Each resulting state stands for a block of equivalent states and is named
    /// after the block's first member. Unreachable states are not removed; they are
    /// merged like any other state.
    pub fn minimize(&self) -> Result<Automaton> {
        if self.kind() != Kind::Dfa {
            return Err(Error::InvalidAutomaton(format!(
                "minimization needs a DFA, got an {}",
                self.kind()
            )));
        }
        let initial = self
            .initial()
            .ok_or_else(|| Error::InvalidAutomaton("no initial state".into()))?;

        let symbols: Vec<char> = self.alphabet().iter().cloned().collect();

        let (finals, others): (Vec<StateId>, Vec<StateId>) =
            self.state_ids().partition(|id| self[*id].is_final());
        let mut blocks: Vec<Vec<StateId>> = vec![finals, others]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect();
        let mut block_of = block_table(&blocks, self.len());

        let mut pass = 0;
        loop {
            pass += 1;
            let mut refined = Vec::with_capacity(blocks.len());

            for block in &blocks {
                let mut groups: IndexMap<Signature, Vec<StateId>> = IndexMap::new();
                for &id in block {
                    let signature = symbols
                        .iter()
                        .map(|&symbol| self[(id, Some(symbol))].first().map(|t| block_of[t.index()]))
                        .collect();
                    groups.entry(signature).or_insert_with(Vec::new).push(id);
                }
                refined.extend(groups.into_iter().map(|(_, members)| members));
            }

            // Blocks only ever split, so an unchanged count means nothing split.
            let stable = refined.len() == blocks.len();
            trace!("refinement pass {}: {} blocks", pass, refined.len());

            blocks = refined;
            block_of = block_table(&blocks, self.len());
            if stable {
                break;
            }
        }

        // Output states follow the input state order.
        blocks.sort_by_key(|block| block[0]);
        block_of = block_table(&blocks, self.len());

        let mut dfa = Automaton::new(Kind::Dfa);
        for block in &blocks {
            let is_final = block.iter().any(|id| self[*id].is_final());
            dfa.push_state(self[block[0]].name().to_string(), is_final);
        }
        dfa.set_initial_id(StateId::of(block_of[initial.index()]));

        // Every member of a stable block has the same transitions up to renaming,
        // so the first member speaks for the block.
        for (index, block) in blocks.iter().enumerate() {
            for (symbol, targets) in self[block[0]].transitions() {
                for target in targets {
                    dfa.connect(
                        StateId::of(index),
                        Some(symbol),
                        StateId::of(block_of[target.index()]),
                    )?;
                }
            }
        }

        debug!(
            "minimized {} DFA states into {} after {} passes",
            self.len(),
            dfa.len(),
            pass
        );
        Ok(dfa)
    }
}
