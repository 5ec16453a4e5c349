//! Step-by-step execution of a DFA over an input string.

use crate::automaton::{Dfa, StateId};
use crate::error::SimulationError;
use log::trace;
use std::fmt;

/// What a trace entry consumed to get to its state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Consumed {
    Start,
    Symbol(char),
}

impl fmt::Display for Consumed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Consumed::Start => write!(f, "start"),
            Consumed::Symbol(c) => write!(f, "{}", c),
        }
    }
}

/// One trace entry: the state reached after `position` input characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub state: StateId,
    pub consumed: Consumed,
    pub position: usize,
}

/// Outcome of [`run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Simulation {
    pub accepted: bool,
    pub error: Option<SimulationError>,
    pub steps: Vec<Step>,
    /// The state the run ended in; `None` if it stopped on an error.
    pub final_state: Option<StateId>,
}

impl Simulation {
    fn failed(error: SimulationError, steps: Vec<Step>) -> Simulation {
        Simulation { accepted: false, error: Some(error), steps, final_state: None }
    }
}

/// Run `dfa` over `input`.
///
/// Every character is checked against the alphabet before anything moves; an
/// unknown character yields an empty trace. A missing transition stops the
/// run with the trace collected so far.
pub fn run(dfa: &Dfa, input: &str) -> Simulation {
    if let Some((i, symbol)) = input.chars().enumerate().find(|(_, c)| !dfa.alphabet().contains(c)) {
        let error = SimulationError::InvalidCharacter { symbol, position: i + 1 };
        return Simulation::failed(error, Vec::new());
    }

    let mut state = dfa.start();
    let mut steps = vec![Step { state, consumed: Consumed::Start, position: 0 }];
    for (i, symbol) in input.chars().enumerate() {
        match dfa.transition(state, symbol) {
            Some(next) => {
                trace!("{} --{}--> {}", dfa.name(state), symbol, dfa.name(next));
                state = next;
                steps.push(Step { state, consumed: Consumed::Symbol(symbol), position: i + 1 });
            }
            None => {
                let error = SimulationError::NoTransition { state: dfa.name(state), symbol };
                return Simulation::failed(error, steps);
            }
        }
    }

    Simulation {
        accepted: dfa.is_final(state),
        error: None,
        steps,
        final_state: Some(state),
    }
}
