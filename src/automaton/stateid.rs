/// Handle of a state inside the arena of one `Automaton`.
///
/// Handles are only meaningful for the automaton that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u32);

impl StateId {
    pub fn of(id: usize) -> Self {
        assert!(id < u32::MAX as usize);
        Self(id as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub(crate) fn add(&self, n: usize) -> Self {
        Self::of(self.0 as usize + n)
    }
}
