use std::{error, fmt};

/// A malformed regular expression, as reported by [`validate`](crate::validate::validate).
///
/// Positions are 1-based character offsets into the original input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    /// The input is empty or only whitespace.
    Empty,
    /// A `)` with no matching `(`.
    UnmatchedClose(usize),
    /// A `(` that is never closed; carries the position of the last unclosed one.
    UnclosedOpen(usize),
    /// A repetition operator at the very start.
    LeadingRepetition(char),
    /// Two repetition operators in a row.
    ConsecutiveRepetition(char, char, usize),
    /// A repetition operator directly after `(`.
    RepetitionAfterOpen(char, usize),
    /// `|` at the start of the input.
    LeadingUnion,
    /// `|` at the end of the input.
    TrailingUnion,
    /// `||`.
    ConsecutiveUnion(usize),
    /// Anything that is not alphanumeric, an operator, a parenthesis or a space.
    InvalidCharacter(char, usize),
}

impl SyntaxError {
    /// The 1-based position this error points at, if any.
    pub fn position(&self) -> Option<usize> {
        match *self {
            SyntaxError::UnmatchedClose(p)
            | SyntaxError::UnclosedOpen(p)
            | SyntaxError::ConsecutiveRepetition(_, _, p)
            | SyntaxError::RepetitionAfterOpen(_, p)
            | SyntaxError::ConsecutiveUnion(p)
            | SyntaxError::InvalidCharacter(_, p) => Some(p),
            SyntaxError::LeadingRepetition(_) => Some(1),
            SyntaxError::Empty | SyntaxError::LeadingUnion | SyntaxError::TrailingUnion => None,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SyntaxError::Empty => write!(f, "please enter a regular expression"),
            SyntaxError::UnmatchedClose(p) => {
                write!(f, "extra closing parenthesis ')' at position {}", p)
            }
            SyntaxError::UnclosedOpen(p) => {
                write!(f, "missing closing parenthesis ')' (opened at position {})", p)
            }
            SyntaxError::LeadingRepetition(c) => {
                write!(f, "operator '{}' cannot appear at the beginning", c)
            }
            SyntaxError::ConsecutiveRepetition(a, b, p) => {
                write!(f, "invalid consecutive operators '{}{}' at position {}", a, b, p)
            }
            SyntaxError::RepetitionAfterOpen(c, p) => {
                write!(f, "operator '{}' cannot follow opening parenthesis at position {}", c, p)
            }
            SyntaxError::LeadingUnion => write!(f, "union operator '|' cannot be at beginning"),
            SyntaxError::TrailingUnion => write!(f, "union operator '|' cannot be at end"),
            SyntaxError::ConsecutiveUnion(p) => {
                write!(f, "consecutive union operators '||' at position {}", p)
            }
            SyntaxError::InvalidCharacter(c, p) => {
                write!(f, "invalid character '{}' at position {}", c, p)
            }
        }
    }
}

impl error::Error for SyntaxError {}

/// The Thompson builder was handed a token stream it cannot assemble.
///
/// Validated input can still produce these (`"()"`, `"(|a)"`), so they are
/// reported rather than treated as bugs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstructionError {
    /// The expression contains no symbols at all.
    Empty,
    /// An operator found fewer operands on the stack than it needs.
    MissingOperand(&'static str),
    /// More than one fragment was left once the stream was consumed.
    UnbalancedStack(usize),
    /// A `(` or `)` without its partner.
    UnbalancedParentheses,
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConstructionError::Empty => write!(f, "expression has no symbols"),
            ConstructionError::MissingOperand(op) => write!(f, "missing operand for {}", op),
            ConstructionError::UnbalancedParentheses => write!(f, "unbalanced parentheses"),
            ConstructionError::UnbalancedStack(n) => {
                write!(f, "{} fragments left after construction", n)
            }
        }
    }
}

impl error::Error for ConstructionError {}

/// Why a simulation stopped early.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimulationError {
    /// An input character outside the automaton's alphabet (1-based position).
    InvalidCharacter { symbol: char, position: usize },
    /// The current state has no move on `symbol`. Unreachable on a total DFA.
    NoTransition { state: String, symbol: char },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SimulationError::InvalidCharacter { symbol, position } => {
                write!(f, "invalid character '{}' at position {}", symbol, position)
            }
            SimulationError::NoTransition { ref state, symbol } => {
                write!(f, "no transition from state {} on symbol '{}'", state, symbol)
            }
        }
    }
}

impl error::Error for SimulationError {}

/// Failure of the whole conversion pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Syntax(SyntaxError),
    Construction(ConstructionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref e) => write!(f, "syntax error: {}", e),
            Error::Construction(ref e) => write!(f, "cannot build automaton: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Syntax(ref e) => Some(e),
            Error::Construction(ref e) => Some(e),
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Error {
        Error::Syntax(e)
    }
}

impl From<ConstructionError> for Error {
    fn from(e: ConstructionError) -> Error {
        Error::Construction(e)
    }
}
