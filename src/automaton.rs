//! Automaton values shared by every stage of the pipeline.
//!
//! All three automata (Thompson NFA, subset DFA, minimized DFA) use the same
//! [`Automaton`] shape; they differ in the target type of a transition and in
//! their [`Kind`], which also decides how states are named (`q0`, `D0`, `M0`).

use bit_set::BitSet;
use indexmap::IndexMap;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::{fmt, slice};

/// Index of a state inside one automaton. States are numbered densely from 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of a transition. `Epsilon` sorts after every symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Symbol(char),
    Epsilon,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Label::Symbol(c) => write!(f, "{}", c),
            Label::Epsilon => write!(f, "ε"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Nfa,
    Dfa,
    MinimizedDfa,
}

impl Kind {
    fn prefix(self) -> char {
        match self {
            Kind::Nfa => 'q',
            Kind::Dfa => 'D',
            Kind::MinimizedDfa => 'M',
        }
    }

    /// The display name of `state` in an automaton of this kind.
    pub fn state_name(self, state: StateId) -> String {
        format!("{}{}", self.prefix(), state.0)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Kind::Nfa => "NFA",
            Kind::Dfa => "DFA",
            Kind::MinimizedDfa => "Minimized DFA",
        })
    }
}

/// Anything that can sit on the right-hand side of a transition.
pub trait Targets {
    fn targets(&self) -> &[StateId];
}

impl Targets for StateId {
    fn targets(&self) -> &[StateId] {
        slice::from_ref(self)
    }
}

impl Targets for Vec<StateId> {
    fn targets(&self) -> &[StateId] {
        self
    }
}

/// A finite automaton. Immutable once built: every stage returns a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Automaton<T> {
    pub(crate) kind: Kind,
    pub(crate) start: StateId,
    pub(crate) finals: BitSet,
    pub(crate) alphabet: Vec<char>,
    pub(crate) transitions: Vec<BTreeMap<Label, T>>,
    pub(crate) dead: Option<StateId>,
}

/// Epsilon-NFA: targets are sorted, duplicate-free state lists.
pub type Nfa = Automaton<Vec<StateId>>;

/// DFA or minimized DFA: at most one target per symbol.
pub type Dfa = Automaton<StateId>;

impl<T: Targets> Automaton<T> {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> {
        (0..self.transitions.len()).map(StateId)
    }

    pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.finals.iter().map(StateId)
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(state.0)
    }

    pub fn is_start(&self, state: StateId) -> bool {
        self.start == state
    }

    pub fn dead_state(&self) -> Option<StateId> {
        self.dead
    }

    pub fn is_dead(&self, state: StateId) -> bool {
        self.dead == Some(state)
    }

    /// The sorted set of literal symbols; never contains epsilon.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Outgoing transitions of `state`, ordered by label.
    pub fn row(&self, state: StateId) -> &BTreeMap<Label, T> {
        &self.transitions[state.0]
    }

    pub fn name(&self, state: StateId) -> String {
        self.kind.state_name(state)
    }

    pub fn has_epsilon(&self) -> bool {
        self.transitions.iter().any(|row| row.contains_key(&Label::Epsilon))
    }

    /// Tabular view: one row per state, one column per symbol (plus `ε`).
    pub fn table(&self) -> TransitionTable {
        let epsilon = self.has_epsilon();
        let mut columns: Vec<Label> = self.alphabet.iter().map(|&c| Label::Symbol(c)).collect();
        if epsilon {
            columns.push(Label::Epsilon);
        }
        let mut headers = vec!["State".to_string()];
        headers.extend(columns.iter().map(Label::to_string));

        let rows = self
            .states()
            .map(|s| TableRow {
                state: self.name(s),
                start: self.is_start(s),
                accepting: self.is_final(s),
                dead: self.is_dead(s),
                cells: columns
                    .iter()
                    .map(|label| match self.row(s).get(label) {
                        Some(t) if !t.targets().is_empty() => {
                            t.targets().iter().map(|&to| self.name(to)).join(", ")
                        }
                        _ => "-".to_string(),
                    })
                    .collect(),
            })
            .collect();

        TransitionTable { headers, rows }
    }

    /// Graph view: one edge per (source, target) pair carrying every label
    /// on it, in state order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut grouped: IndexMap<(StateId, StateId), Vec<Label>> = IndexMap::new();
        for from in self.states() {
            for (&label, targets) in self.row(from) {
                for &to in targets.targets() {
                    grouped.entry((from, to)).or_default().push(label);
                }
            }
        }
        grouped
            .into_iter()
            .map(|((from, to), labels)| Edge { from, to, labels })
            .collect()
    }
}

impl Nfa {
    /// States reachable from `state` on `label` in one step.
    pub fn targets(&self, state: StateId, label: Label) -> &[StateId] {
        self.transitions[state.0]
            .get(&label)
            .map_or(&[][..], |t| &t[..])
    }
}

impl Dfa {
    pub fn transition(&self, state: StateId, symbol: char) -> Option<StateId> {
        self.transitions[state.0].get(&Label::Symbol(symbol)).copied()
    }

    /// Whether every state has a move on every symbol.
    pub fn is_total(&self) -> bool {
        self.states()
            .all(|s| self.alphabet.iter().all(|&c| self.transition(s, c).is_some()))
    }

    pub fn accepts(&self, input: &str) -> bool {
        let mut state = self.start;
        for c in input.chars() {
            match self.transition(state, c) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.is_final(state)
    }
}

impl<T: Targets> fmt::Display for Automaton<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} ({} states)", self.kind, self.state_count())?;
        write!(f, "{}", self.table())
    }
}

/// A directed edge of the state graph with all the labels that share it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: StateId,
    pub to: StateId,
    pub labels: Vec<Label>,
}

impl Edge {
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub state: String,
    pub start: bool,
    pub accepting: bool,
    pub dead: bool,
    pub cells: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

fn write_row(f: &mut fmt::Formatter, widths: &[usize], marker: &str, cells: &[&str]) -> fmt::Result {
    let padded = cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| format!("{:<w$}", c, w = w))
        .join(" | ");
    writeln!(f, "{:<4}{}", marker, padded.trim_end())
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            let cells = Some(&row.state).into_iter().chain(&row.cells);
            for (w, cell) in widths.iter_mut().zip(cells) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let headers: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        write_row(f, &widths, "", &headers)?;
        for row in &self.rows {
            let marker = format!(
                "{}{}{}",
                if row.start { "->" } else { "" },
                if row.accepting { "*" } else { "" },
                if row.dead { "!" } else { "" },
            );
            let cells: Vec<&str> = Some(&row.state)
                .into_iter()
                .chain(&row.cells)
                .map(String::as_str)
                .collect();
            write_row(f, &widths, &marker, &cells)?;
        }
        Ok(())
    }
}

/// Which source states each derived state stands for.
///
/// Produced by subset construction (DFA state -> NFA states) and by
/// minimization (minimized state -> DFA states).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquivalenceMapping {
    pub(crate) source: Kind,
    pub(crate) derived: Kind,
    pub(crate) classes: Vec<Vec<StateId>>,
}

impl EquivalenceMapping {
    pub fn source_kind(&self) -> Kind {
        self.source
    }

    pub fn derived_kind(&self) -> Kind {
        self.derived
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Sorted source states behind `state`; empty for a materialized dead state.
    pub fn get(&self, state: StateId) -> Option<&[StateId]> {
        self.classes.get(state.0).map(|c| &c[..])
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &[StateId])> {
        self.classes.iter().enumerate().map(|(i, c)| (StateId(i), &c[..]))
    }

    /// `D0 = {q0, q1}` lines, one per derived state.
    pub fn legend(&self) -> Vec<String> {
        self.iter()
            .map(|(state, members)| {
                let name = self.derived.state_name(state);
                if members.is_empty() {
                    format!("{} = ∅", name)
                } else {
                    let members = members.iter().map(|&m| self.source.state_name(m)).join(", ");
                    format!("{} = {{{}}}", name, members)
                }
            })
            .collect()
    }
}

impl fmt::Display for EquivalenceMapping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in self.legend() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_dfa() -> Dfa {
        // D0 -a-> D1(final), D0 -b-> D0, D1 -a,b-> D1
        let mut finals = BitSet::new();
        finals.insert(1);
        let mut row0 = BTreeMap::new();
        row0.insert(Label::Symbol('a'), StateId(1));
        row0.insert(Label::Symbol('b'), StateId(0));
        let mut row1 = BTreeMap::new();
        row1.insert(Label::Symbol('a'), StateId(1));
        row1.insert(Label::Symbol('b'), StateId(1));
        Automaton {
            kind: Kind::Dfa,
            start: StateId(0),
            finals,
            alphabet: vec!['a', 'b'],
            transitions: vec![row0, row1],
            dead: None,
        }
    }

    #[test]
    fn test_state_names() {
        assert_eq!(Kind::Nfa.state_name(StateId(3)), "q3");
        assert_eq!(Kind::Dfa.state_name(StateId(0)), "D0");
        assert_eq!(Kind::MinimizedDfa.state_name(StateId(12)), "M12");
    }

    #[test]
    fn test_epsilon_sorts_last() {
        assert!(Label::Symbol('z') < Label::Epsilon);
        assert!(Label::Symbol('0') < Label::Symbol('a'));
    }

    #[test]
    fn test_table() {
        let table = two_state_dfa().table();
        assert_eq!(table.headers, vec!["State", "a", "b"]);
        assert_eq!(table.rows[0].cells, vec!["D1", "D0"]);
        assert!(table.rows[0].start);
        assert!(table.rows[1].accepting);
        let text = table.to_string();
        assert!(text.contains("->"));
        assert!(text.contains("D1"));
    }

    #[test]
    fn test_edges_group_labels() {
        let edges = two_state_dfa().edges();
        assert_eq!(edges.len(), 3);
        let self_loop = edges.iter().find(|e| e.from == StateId(1)).unwrap();
        assert!(self_loop.is_self_loop());
        assert_eq!(self_loop.labels, vec![Label::Symbol('a'), Label::Symbol('b')]);
    }

    #[test]
    fn test_accepts() {
        let dfa = two_state_dfa();
        assert!(dfa.is_total());
        assert!(dfa.accepts("ba"));
        assert!(dfa.accepts("bbab"));
        assert!(!dfa.accepts("bbb"));
        assert!(!dfa.accepts("c"));
    }

    #[test]
    fn test_legend() {
        let mapping = EquivalenceMapping {
            source: Kind::Nfa,
            derived: Kind::Dfa,
            classes: vec![vec![StateId(0), StateId(2)], vec![]],
        };
        assert_eq!(mapping.legend(), vec!["D0 = {q0, q2}", "D1 = ∅"]);
        assert_eq!(mapping.len(), 2);
        assert!(!mapping.is_empty());
        assert_eq!(mapping.source_kind(), Kind::Nfa);
        assert_eq!(mapping.derived_kind(), Kind::Dfa);
        let members: Vec<usize> =
            mapping.get(StateId(0)).unwrap().iter().map(|s| s.index()).collect();
        assert_eq!(members, vec![0, 2]);
    }
}
