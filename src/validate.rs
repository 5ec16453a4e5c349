//! Syntax checks for the regex dialect accepted by the builder:
//! alphanumeric literals, `(` `)` grouping, `|` union, postfix `*` `+` `?`
//! and spaces (ignored).

use crate::error::SyntaxError;
use std::collections::BTreeSet;

fn is_repetition(c: char) -> bool {
    c == '*' || c == '+' || c == '?'
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || "()|*+? ".contains(c)
}

/// Check `regex` against the syntax rules, reporting the first violation.
///
/// Rules are applied in this order: emptiness, parenthesis balance, operator
/// placement (repetition and union in a single left-to-right scan, so the
/// leftmost offence wins), and finally the character set.
pub fn validate(regex: &str) -> Result<(), SyntaxError> {
    if regex.trim().is_empty() {
        return Err(SyntaxError::Empty);
    }
    let chars: Vec<char> = regex.chars().collect();

    let mut open = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' => open.push(i),
            ')' => {
                if open.pop().is_none() {
                    return Err(SyntaxError::UnmatchedClose(i + 1));
                }
            }
            _ => {}
        }
    }
    if let Some(&i) = open.last() {
        return Err(SyntaxError::UnclosedOpen(i + 1));
    }

    let last = chars.len() - 1;
    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        if i == 0 && is_repetition(c) {
            return Err(SyntaxError::LeadingRepetition(c));
        }
        if let Some(n) = next {
            if is_repetition(c) && is_repetition(n) {
                return Err(SyntaxError::ConsecutiveRepetition(c, n, i + 1));
            }
            if c == '(' && is_repetition(n) {
                return Err(SyntaxError::RepetitionAfterOpen(n, i + 2));
            }
        }
        if c == '|' {
            if i == 0 {
                return Err(SyntaxError::LeadingUnion);
            }
            if i == last {
                return Err(SyntaxError::TrailingUnion);
            }
            if next == Some('|') {
                return Err(SyntaxError::ConsecutiveUnion(i + 1));
            }
        }
    }

    match chars.iter().position(|&c| !is_allowed(c)) {
        Some(i) => Err(SyntaxError::InvalidCharacter(chars[i], i + 1)),
        None => Ok(()),
    }
}

/// The distinct literal symbols of `regex`, sorted.
pub fn extract_alphabet(regex: &str) -> Vec<char> {
    regex
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
