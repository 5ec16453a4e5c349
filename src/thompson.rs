//! Thompson's construction: regex text to epsilon-NFA.
//!
//! The text is tokenized, explicit concatenations are inserted, the infix
//! stream is reordered to postfix by precedence climbing and the postfix
//! stream is folded into NFA fragments on a stack.

use crate::automaton::{Automaton, Kind, Label, Nfa, StateId};
use crate::error::ConstructionError;
use bit_set::BitSet;
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How the `+` character is read.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlusOperator {
    /// Postfix one-or-more: `a+` matches `a`, `aa`, ...
    #[default]
    OneOrMore,
    /// Infix union, the same operator as `|`.
    Union,
}

/// Knobs for the builder.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Options {
    pub plus: PlusOperator,
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn with_plus(mut self, plus: PlusOperator) -> Options {
        self.plus = plus;
        self
    }
}

/// `Concat` never comes out of the tokenizer; it only exists between tokens,
/// so it cannot clash with anything a user types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Token {
    Symbol(char),
    Open,
    Close,
    Union,
    Concat,
    Star,
    Plus,
    Optional,
}

impl Token {
    fn precedence(self) -> u8 {
        match self {
            Token::Union => 1,
            Token::Concat => 2,
            Token::Star | Token::Plus | Token::Optional => 3,
            Token::Symbol(_) | Token::Open | Token::Close => 0,
        }
    }

    fn ends_operand(self) -> bool {
        matches!(
            self,
            Token::Symbol(_) | Token::Close | Token::Star | Token::Plus | Token::Optional
        )
    }

    fn starts_operand(self) -> bool {
        matches!(self, Token::Symbol(_) | Token::Open)
    }
}

fn tokenize(regex: &str, options: &Options) -> Vec<Token> {
    regex
        .chars()
        .filter(|&c| c != ' ')
        .map(|c| match c {
            '(' => Token::Open,
            ')' => Token::Close,
            '|' => Token::Union,
            '*' => Token::Star,
            '?' => Token::Optional,
            '+' => match options.plus {
                PlusOperator::OneOrMore => Token::Plus,
                PlusOperator::Union => Token::Union,
            },
            c => Token::Symbol(c),
        })
        .collect()
}

fn insert_concatenation(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    let mut prev: Option<Token> = None;
    for token in tokens {
        if let Some(p) = prev {
            if p.ends_operand() && token.starts_operand() {
                out.push(Token::Concat);
            }
        }
        out.push(token);
        prev = Some(token);
    }
    out
}

fn to_postfix(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token> = Vec::new();
    for token in tokens {
        match token {
            Token::Symbol(_) => out.push(token),
            Token::Open => ops.push(token),
            Token::Close => loop {
                match ops.pop() {
                    Some(Token::Open) => break,
                    Some(op) => out.push(op),
                    // unmatched: left in the stream for the builder to reject
                    None => {
                        out.push(token);
                        break;
                    }
                }
            },
            _ => {
                while let Some(&top) = ops.last() {
                    if top == Token::Open || top.precedence() < token.precedence() {
                        break;
                    }
                    out.push(top);
                    ops.pop();
                }
                ops.push(token);
            }
        }
    }
    // an unclosed `(` is drained along with the operators
    while let Some(op) = ops.pop() {
        out.push(op);
    }
    out
}

/// A partial NFA: its entry, its exits, and its states in construction order.
struct Fragment {
    start: usize,
    finals: Vec<usize>,
    states: Vec<usize>,
}

/// Owns the id counter and edge list of one build, so separate builds never
/// share numbering.
#[derive(Default)]
struct Builder {
    next: usize,
    edges: Vec<(usize, Label, usize)>,
}

impl Builder {
    fn fresh(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    fn edge(&mut self, from: usize, label: Label, to: usize) {
        self.edges.push((from, label, to));
    }

    fn literal(&mut self, c: char) -> Fragment {
        let s = self.fresh();
        let e = self.fresh();
        self.edge(s, Label::Symbol(c), e);
        Fragment { start: s, finals: vec![e], states: vec![s, e] }
    }

    fn concat(&mut self, left: Fragment, right: Fragment) -> Fragment {
        for &f in &left.finals {
            self.edge(f, Label::Epsilon, right.start);
        }
        let mut states = left.states;
        states.extend(right.states);
        Fragment { start: left.start, finals: right.finals, states }
    }

    fn union(&mut self, left: Fragment, right: Fragment) -> Fragment {
        let s = self.fresh();
        let e = self.fresh();
        self.edge(s, Label::Epsilon, left.start);
        self.edge(s, Label::Epsilon, right.start);
        for &f in left.finals.iter().chain(&right.finals) {
            self.edge(f, Label::Epsilon, e);
        }
        let mut states = vec![s];
        states.extend(left.states);
        states.extend(right.states);
        states.push(e);
        Fragment { start: s, finals: vec![e], states }
    }

    /// `*`, `+` and `?` share a shape: a fresh entry and exit around `inner`,
    /// with an optional skip edge (entry to exit) and an optional loop edge
    /// (inner exits back to inner entry).
    fn repeat(&mut self, inner: Fragment, skip: bool, repeat: bool) -> Fragment {
        let s = self.fresh();
        let e = self.fresh();
        self.edge(s, Label::Epsilon, inner.start);
        if skip {
            self.edge(s, Label::Epsilon, e);
        }
        for &f in &inner.finals {
            if repeat {
                self.edge(f, Label::Epsilon, inner.start);
            }
            self.edge(f, Label::Epsilon, e);
        }
        let mut states = vec![s];
        states.extend(inner.states);
        states.push(e);
        Fragment { start: s, finals: vec![e], states }
    }

    fn assemble(&mut self, postfix: &[Token]) -> Result<Fragment, ConstructionError> {
        fn pop(stack: &mut Vec<Fragment>, op: &'static str) -> Result<Fragment, ConstructionError> {
            stack.pop().ok_or(ConstructionError::MissingOperand(op))
        }

        let mut stack: Vec<Fragment> = Vec::new();
        for &token in postfix {
            let fragment = match token {
                Token::Symbol(c) => self.literal(c),
                Token::Concat => {
                    let right = pop(&mut stack, "concatenation")?;
                    let left = pop(&mut stack, "concatenation")?;
                    self.concat(left, right)
                }
                Token::Union => {
                    let right = pop(&mut stack, "'|'")?;
                    let left = pop(&mut stack, "'|'")?;
                    self.union(left, right)
                }
                Token::Star => {
                    let inner = pop(&mut stack, "'*'")?;
                    self.repeat(inner, true, true)
                }
                Token::Plus => {
                    let inner = pop(&mut stack, "'+'")?;
                    self.repeat(inner, false, true)
                }
                Token::Optional => {
                    let inner = pop(&mut stack, "'?'")?;
                    self.repeat(inner, true, false)
                }
                Token::Open | Token::Close => return Err(ConstructionError::UnbalancedParentheses),
            };
            stack.push(fragment);
        }

        let root = stack.pop().ok_or(ConstructionError::Empty)?;
        if !stack.is_empty() {
            return Err(ConstructionError::UnbalancedStack(stack.len() + 1));
        }
        Ok(root)
    }

    /// Renumber so that the start state is `q0` and the rest follow the
    /// fragment's construction order, then lay the edges out per state.
    fn finish(self, root: Fragment) -> Nfa {
        let mut order = vec![root.start];
        order.extend(root.states.iter().copied().filter(|&s| s != root.start));
        let renumber: HashMap<usize, StateId> = order
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, StateId(new)))
            .collect();

        let mut transitions: Vec<BTreeMap<Label, Vec<StateId>>> = vec![BTreeMap::new(); order.len()];
        let mut alphabet = BTreeSet::new();
        for (from, label, to) in self.edges {
            if let Label::Symbol(c) = label {
                alphabet.insert(c);
            }
            transitions[renumber[&from].0]
                .entry(label)
                .or_default()
                .push(renumber[&to]);
        }
        for targets in transitions.iter_mut().flat_map(|row| row.values_mut()) {
            targets.sort();
            targets.dedup();
        }

        let mut finals = BitSet::with_capacity(order.len());
        for f in &root.finals {
            finals.insert(renumber[f].0);
        }

        Automaton {
            kind: Kind::Nfa,
            start: StateId(0),
            finals,
            alphabet: alphabet.into_iter().collect(),
            transitions,
            dead: None,
        }
    }
}

/// Build the Thompson NFA of `regex` with default [`Options`].
///
/// The input is expected to have passed [`validate`](crate::validate::validate);
/// inputs that survive validation but have no well-formed operand structure
/// (`"()"`, `"(|a)"`) produce a [`ConstructionError`].
pub fn build(regex: &str) -> Result<Nfa, ConstructionError> {
    build_with(regex, &Options::default())
}

pub fn build_with(regex: &str, options: &Options) -> Result<Nfa, ConstructionError> {
    let tokens = insert_concatenation(tokenize(regex, options));
    let postfix = to_postfix(tokens);
    trace!("postfix for {:?}: {:?}", regex, postfix);

    let mut builder = Builder::default();
    let root = builder.assemble(&postfix)?;
    let nfa = builder.finish(root);
    debug!(
        "thompson: {:?} -> {} states, alphabet {:?}",
        regex,
        nfa.state_count(),
        nfa.alphabet()
    );
    Ok(nfa)
}
