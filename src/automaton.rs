use crate::transition_system::{StateIndex, TransitionSystem};

mod dfa;
pub use dfa::DFA;

/// Iterator over the indices of all states of a transition system that have a particular color.
/// For a [`DFA`] this is used to list the accepting or the rejecting states.
pub struct StatesWithColor<'a, Ts> {
    ts: &'a Ts,
    indices: std::ops::Range<StateIndex>,
    color: bool,
}

impl<'a, Ts: TransitionSystem> StatesWithColor<'a, Ts> {
    /// Creates a new iterator over the states of `ts` that are colored `color`.
    pub fn new(ts: &'a Ts, color: bool) -> Self {
        Self {
            ts,
            indices: 0..(ts.size() as StateIndex),
            color,
        }
    }
}

impl<'a, Ts> Clone for StatesWithColor<'a, Ts> {
    fn clone(&self) -> Self {
        Self {
            ts: self.ts,
            indices: self.indices.clone(),
            color: self.color,
        }
    }
}

impl<'a, Ts: TransitionSystem> Iterator for StatesWithColor<'a, Ts> {
    type Item = StateIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let color = self.color;
        let ts = self.ts;
        self.indices
            .by_ref()
            .find(|&q| ts.state_color(q) == Some(color))
    }
}
