//! Regular expressions to finite automata.
//!
//! A regex in a small syntax (alphanumeric literals, `|`, `*`, `+`, `?`,
//! parentheses) goes through four stages, each producing a new immutable
//! value:
//!
//! 1. [`validate`] checks the syntax,
//! 2. [`thompson::build`] makes an epsilon-NFA,
//! 3. [`determinize`] runs the subset construction,
//! 4. [`minimize`] merges equivalent DFA states.
//!
//! [`simulate::run`] then steps the minimized DFA over a test string.
//!
//! ```
//! let conversion = regex_fsm::convert("ab*").unwrap();
//! assert_eq!(conversion.minimized.state_count(), 3);
//! assert!(conversion.test("abbb").accepted);
//! ```

pub use automaton::{Dfa, EquivalenceMapping, Kind, Label, Nfa, StateId};
pub use error::{ConstructionError, Error, SimulationError, SyntaxError};
pub use minimize::minimize;
pub use simulate::{run, Simulation};
pub use subset::determinize;
pub use thompson::{Options, PlusOperator};
pub use validate::{extract_alphabet, validate};

pub mod automaton;
pub mod error;
pub mod minimize;
pub mod simulate;
pub mod subset;
pub mod thompson;
pub mod validate;
#[cfg(test)]
mod tests;

/// Every automaton built from one regex.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub nfa: Nfa,
    pub dfa: Dfa,
    /// DFA state -> NFA states.
    pub dfa_mapping: EquivalenceMapping,
    pub minimized: Dfa,
    /// Minimized state -> DFA states.
    pub minimization_mapping: EquivalenceMapping,
}

impl Conversion {
    /// Simulate `input` on the minimized DFA.
    pub fn test(&self, input: &str) -> Simulation {
        simulate::run(&self.minimized, input)
    }
}

/// Run the whole pipeline with default [`Options`].
pub fn convert(regex: &str) -> Result<Conversion, Error> {
    convert_with(regex, &Options::default())
}

pub fn convert_with(regex: &str, options: &Options) -> Result<Conversion, Error> {
    validate(regex)?;
    let nfa = thompson::build_with(regex, options)?;
    let (dfa, dfa_mapping) = determinize(&nfa);
    let (minimized, minimization_mapping) = minimize(&dfa);
    Ok(Conversion { nfa, dfa, dfa_mapping, minimized, minimization_mapping })
}
