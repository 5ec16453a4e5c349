//! Table-filling minimization.

use crate::automaton::{Automaton, Dfa, EquivalenceMapping, Kind, StateId};
use bit_set::BitSet;
use log::{debug, trace};
use std::collections::BTreeMap;

/// Symmetric n-by-n table of distinguishable state pairs.
struct PairTable {
    n: usize,
    marked: BitSet,
}

impl PairTable {
    fn new(n: usize) -> PairTable {
        PairTable { n, marked: BitSet::with_capacity(n * n) }
    }

    fn is_marked(&self, p: StateId, q: StateId) -> bool {
        self.marked.contains(p.0 * self.n + q.0)
    }

    fn mark(&mut self, p: StateId, q: StateId) {
        self.marked.insert(p.0 * self.n + q.0);
        self.marked.insert(q.0 * self.n + p.0);
    }
}

fn distinguishable(dfa: &Dfa, table: &PairTable, p: StateId, q: StateId) -> bool {
    dfa.alphabet().iter().any(|&c| match (dfa.transition(p, c), dfa.transition(q, c)) {
        (Some(a), Some(b)) => a != b && table.is_marked(a, b),
        (None, None) => false,
        _ => true,
    })
}

/// Merge behaviourally equivalent states of `dfa`.
///
/// Equivalence classes are numbered (`M0`, `M1`, ...) by their lowest member;
/// each class copies the transitions of that member. The returned mapping
/// lists the members of every class.
pub fn minimize(dfa: &Dfa) -> (Dfa, EquivalenceMapping) {
    let n = dfa.state_count();
    let mut table = PairTable::new(n);

    for p in dfa.states() {
        for q in dfa.states().skip(p.0 + 1) {
            if dfa.is_final(p) != dfa.is_final(q) {
                table.mark(p, q);
            }
        }
    }

    let mut passes = 0;
    loop {
        let mut changed = false;
        for p in dfa.states() {
            for q in dfa.states().skip(p.0 + 1) {
                if !table.is_marked(p, q) && distinguishable(dfa, &table, p, q) {
                    table.mark(p, q);
                    changed = true;
                }
            }
        }
        passes += 1;
        if !changed {
            break;
        }
    }
    trace!("table filling settled after {} passes", passes);

    let mut class_of: Vec<Option<StateId>> = vec![None; n];
    let mut classes: Vec<Vec<StateId>> = Vec::new();
    for p in dfa.states() {
        if class_of[p.0].is_some() {
            continue;
        }
        let class = StateId(classes.len());
        let mut members = vec![p];
        class_of[p.0] = Some(class);
        for q in dfa.states().skip(p.0 + 1) {
            if class_of[q.0].is_none() && !table.is_marked(p, q) {
                class_of[q.0] = Some(class);
                members.push(q);
            }
        }
        classes.push(members);
    }
    let class_of: Vec<StateId> = class_of.into_iter().flatten().collect();

    let transitions: Vec<BTreeMap<_, _>> = classes
        .iter()
        .map(|members| {
            dfa.row(members[0])
                .iter()
                .map(|(&label, &to)| (label, class_of[to.0]))
                .collect()
        })
        .collect();

    let mut finals = BitSet::with_capacity(classes.len());
    for f in dfa.final_states() {
        finals.insert(class_of[f.0].0);
    }

    debug!("minimization: {} states -> {} states", n, classes.len());

    let minimized = Automaton {
        kind: Kind::MinimizedDfa,
        start: class_of[dfa.start().0],
        finals,
        alphabet: dfa.alphabet().to_vec(),
        transitions,
        dead: dfa.dead_state().map(|d| class_of[d.0]),
    };
    let mapping = EquivalenceMapping {
        source: dfa.kind(),
        derived: Kind::MinimizedDfa,
        classes,
    };
    (minimized, mapping)
}
