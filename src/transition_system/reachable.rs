use std::collections::VecDeque;

use bit_set::BitSet;

use super::{StateIndex, TransitionSystem};

/// Type alias for a minimal representative of a state which is its length-lexicographically minimal
/// access sequence and its state index.
pub type MinimalRepresentative = (Vec<char>, StateIndex);

/// Struct that can return the minimal representatives of a transition system. A minimal representative
/// for a state `q` of some transition system is the length-lexicographically minimal string with which
/// `q` can be reached from a given state. The states are produced in breadth-first order.
#[derive(Debug, Clone)]
pub struct MinimalRepresentatives<'a, Ts> {
    ts: &'a Ts,
    seen: BitSet,
    queue: VecDeque<MinimalRepresentative>,
}

impl<'a, Ts: TransitionSystem> MinimalRepresentatives<'a, Ts> {
    /// Starts the exploration in `origin`.
    pub fn new(ts: &'a Ts, origin: StateIndex) -> Self {
        let mut seen = BitSet::with_capacity(ts.size());
        seen.insert(origin as usize);
        let queue = [(vec![], origin)].into_iter().collect();
        Self { ts, seen, queue }
    }
}

impl<'a, Ts: TransitionSystem> Iterator for MinimalRepresentatives<'a, Ts> {
    type Item = MinimalRepresentative;

    fn next(&mut self) -> Option<Self::Item> {
        let (access, q) = self.queue.pop_front()?;
        if let Some(it) = self.ts.edges_from(q) {
            for edge in it {
                let p = edge.target();
                if self.seen.insert(p as usize) {
                    let mut new_access = access.clone();
                    new_access.push(edge.symbol());
                    self.queue.push_back((new_access, p))
                }
            }
        }
        Some((access, q))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    #[test]
    fn reachable_states() {
        let dfa = TSBuilder::default()
            .with_state_colors([false, false, true, false])
            .with_edges([
                (0, 'a', 1),
                (0, 'b', 0),
                (1, 'a', 2),
                (1, 'b', 0),
                (2, 'a', 2),
                (2, 'b', 2),
                (3, 'a', 0),
            ])
            .into_dfa(0)
            .unwrap();

        assert_eq!(
            dfa.minimal_representatives().collect_vec(),
            vec![(vec![], 0), (vec!['a'], 1), (vec!['a', 'a'], 2)]
        );
        assert_eq!(dfa.reachable_state_indices().collect_vec(), vec![0, 1, 2]);
        assert_eq!(
            dfa.minimal_representatives_from(3).collect_vec(),
            vec![
                (vec![], 3),
                (vec!['a'], 0),
                (vec!['a', 'a'], 1),
                (vec!['a', 'a', 'a'], 2)
            ]
        );
    }
}
