//! Subset construction: epsilon-NFA to DFA.

use crate::automaton::{Automaton, Dfa, EquivalenceMapping, Kind, Label, Nfa, StateId};
use bit_set::BitSet;
use indexmap::IndexMap;
use log::{debug, trace};
use std::collections::{BTreeMap, VecDeque};

/// Where a DFA move goes while the dead state does not exist yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Target {
    State(StateId),
    Dead,
}

impl Nfa {
    /// The smallest superset of `states` closed under epsilon moves, sorted.
    pub fn epsilon_closure(&self, states: &[StateId]) -> Vec<StateId> {
        let mut closure = BitSet::with_capacity(self.state_count());
        let mut stack = Vec::new();
        for &s in states {
            if closure.insert(s.0) {
                stack.push(s);
            }
        }
        while let Some(s) = stack.pop() {
            for &next in self.targets(s, Label::Epsilon) {
                if closure.insert(next.0) {
                    stack.push(next);
                }
            }
        }
        closure.iter().map(StateId).collect()
    }

    /// Every state reachable from `states` by one `symbol` move, sorted.
    pub fn move_on(&self, states: &[StateId], symbol: char) -> Vec<StateId> {
        let mut reached = BitSet::with_capacity(self.state_count());
        for &s in states {
            for &next in self.targets(s, Label::Symbol(symbol)) {
                reached.insert(next.0);
            }
        }
        reached.iter().map(StateId).collect()
    }

    /// Run the NFA on `input` by tracking the set of active states.
    pub fn accepts(&self, input: &str) -> bool {
        let mut active = self.epsilon_closure(&[self.start]);
        for c in input.chars() {
            active = self.epsilon_closure(&self.move_on(&active, c));
            if active.is_empty() {
                return false;
            }
        }
        active.iter().any(|&s| self.is_final(s))
    }
}

/// Convert `nfa` into a DFA whose states are sets of NFA states.
///
/// States are named in FIFO discovery order starting with the closure of the
/// NFA start (`D0`). If some set has no move on a symbol, one dead state is
/// appended after all others, with self-loops on every symbol; its entry in
/// the returned mapping is empty. The result is total over the alphabet.
pub fn determinize(nfa: &Nfa) -> (Dfa, EquivalenceMapping) {
    let mut sets: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut worklist: VecDeque<Vec<StateId>> = VecDeque::new();
    let mut rows: Vec<BTreeMap<char, Target>> = Vec::new();

    let start = nfa.epsilon_closure(&[nfa.start()]);
    sets.insert(start.clone(), StateId(0));
    worklist.push_back(start);

    while let Some(set) = worklist.pop_front() {
        let mut row = BTreeMap::new();
        for &symbol in nfa.alphabet() {
            let next = nfa.epsilon_closure(&nfa.move_on(&set, symbol));
            let target = if next.is_empty() {
                Target::Dead
            } else if let Some(&id) = sets.get(&next) {
                Target::State(id)
            } else {
                let id = StateId(sets.len());
                trace!("D{} = {:?}", id, next);
                sets.insert(next.clone(), id);
                worklist.push_back(next);
                Target::State(id)
            };
            row.insert(symbol, target);
        }
        rows.push(row);
    }

    let needs_dead = rows.iter().flat_map(|r| r.values()).any(|&t| t == Target::Dead);
    let dead_id = StateId(rows.len());

    let mut transitions: Vec<BTreeMap<Label, StateId>> = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(c, t)| {
                    let to = match t {
                        Target::State(s) => s,
                        Target::Dead => dead_id,
                    };
                    (Label::Symbol(c), to)
                })
                .collect()
        })
        .collect();

    let mut finals = BitSet::with_capacity(sets.len() + 1);
    for (set, id) in &sets {
        if set.iter().any(|&s| nfa.is_final(s)) {
            finals.insert(id.0);
        }
    }

    let mut classes: Vec<Vec<StateId>> = sets.into_keys().collect();
    let dead = if needs_dead {
        transitions.push(nfa.alphabet().iter().map(|&c| (Label::Symbol(c), dead_id)).collect());
        classes.push(Vec::new());
        Some(dead_id)
    } else {
        None
    };

    debug!(
        "subset construction: {} NFA states -> {} DFA states, dead state {:?}",
        nfa.state_count(),
        transitions.len(),
        dead
    );

    let dfa = Automaton {
        kind: Kind::Dfa,
        start: StateId(0),
        finals,
        alphabet: nfa.alphabet().to_vec(),
        transitions,
        dead,
    };
    let mapping = EquivalenceMapping {
        source: nfa.kind(),
        derived: Kind::Dfa,
        classes,
    };
    (dfa, mapping)
}
