use crate::*;
use std::error::Error as _;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every string over `alphabet` of length at most `max_len`.
fn all_strings(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut out = vec![String::new()];
    let mut layer = vec![String::new()];
    for _ in 0..max_len {
        layer = layer
            .iter()
            .flat_map(|s| alphabet.iter().map(move |&c| format!("{}{}", s, c)))
            .collect();
        out.extend(layer.iter().cloned());
    }
    out
}

fn check_language(regex: &str, accepted: &[&str], rejected: &[&str]) {
    let conversion = convert(regex).unwrap();
    for input in accepted {
        assert!(conversion.nfa.accepts(input), "NFA of {} should accept {:?}", regex, input);
        assert!(conversion.test(input).accepted, "{} should accept {:?}", regex, input);
    }
    for input in rejected {
        assert!(!conversion.nfa.accepts(input), "NFA of {} should reject {:?}", regex, input);
        assert!(!conversion.test(input).accepted, "{} should reject {:?}", regex, input);
    }
}

#[test]
fn test_validator_examples() {
    for bad in &["", "(ab", "ab)", "*ab", "a**b", "(*ab)", "|ab", "ab|", "a#b"] {
        assert!(validate(bad).is_err(), "{:?} should be rejected", bad);
        assert!(matches!(convert(bad), Err(Error::Syntax(_))), "{:?}", bad);
    }
    assert_eq!(validate("a(b|c)*d"), Ok(()));
    assert_eq!(extract_alphabet("a(b|c)*"), vec!['a', 'b', 'c']);
}

#[test]
fn test_star_end_to_end() {
    init();
    let conversion = convert("ab*").unwrap();
    assert!(conversion.test("a").accepted);
    assert!(conversion.test("abbb").accepted);

    let rejected = conversion.test("b");
    assert!(!rejected.accepted);
    assert_eq!(rejected.error, None);
    assert_eq!(rejected.steps.len(), 2);
    assert_eq!(rejected.final_state, conversion.minimized.dead_state());

    let invalid = conversion.test("ac");
    assert!(!invalid.accepted);
    assert!(invalid.steps.is_empty());
    assert_eq!(
        invalid.error,
        Some(SimulationError::InvalidCharacter { symbol: 'c', position: 2 })
    );
}

#[test]
fn test_union_end_to_end() {
    init();
    let conversion = convert("a|b").unwrap();
    // start, accept after a, accept after b, dead
    assert_eq!(conversion.dfa.state_count(), 4);
    assert_eq!(conversion.minimized.state_count(), 3);
    assert_eq!(conversion.minimized.final_states().count(), 1);
    assert_eq!(
        conversion.minimization_mapping.legend(),
        vec!["M0 = {D0}", "M1 = {D1, D2}", "M2 = {D3}"]
    );
    let merged = conversion.minimized.transition(StateId(0), 'a');
    assert_eq!(merged, conversion.minimized.transition(StateId(0), 'b'));
}

#[test]
fn test_languages() {
    check_language("a(b|c)*d", &["ad", "abd", "acbcd"], &["a", "abc", "da", ""]);
    check_language("(ab|a)*b?", &["", "a", "ab", "aab", "abab", "b"], &["bb", "ba"]);
    check_language("a b", &["ab"], &["a", "b", "a b"]);
    check_language("ab?c", &["ac", "abc"], &["abbc", "bc"]);
    check_language("(0|1)*1", &["1", "01", "111"], &["", "0", "10"]);
}

#[test]
fn test_one_or_more() {
    check_language("a+", &["a", "aa", "aaa"], &[""]);
    check_language("(ab)+c", &["abc", "ababc"], &["c", "abac"]);
}

#[test]
fn test_plus_as_union() {
    let options = Options::new().with_plus(PlusOperator::Union);
    let conversion = convert_with("a+b", &options).unwrap();
    assert!(conversion.test("a").accepted);
    assert!(conversion.test("b").accepted);
    assert!(!conversion.test("ab").accepted);
    assert_eq!(
        conversion.nfa,
        thompson::build("a|b").unwrap()
    );
}

#[test]
fn test_all_stages_agree() {
    init();
    for regex in &["(a|b)*abb", "a(b|c)*d", "(ab|a)*b?", "a?b+(c|a)*", "((a|b)(a|b))*"] {
        let conversion = convert(regex).unwrap();
        let (nfa, dfa, min) = (&conversion.nfa, &conversion.dfa, &conversion.minimized);
        assert!(dfa.is_total(), "{}", regex);
        assert!(min.is_total(), "{}", regex);
        assert!(min.state_count() <= dfa.state_count(), "{}", regex);
        for input in all_strings(nfa.alphabet(), 5) {
            let expected = nfa.accepts(&input);
            assert_eq!(dfa.accepts(&input), expected, "{} on {:?}", regex, input);
            assert_eq!(min.accepts(&input), expected, "{} on {:?}", regex, input);
            assert_eq!(conversion.test(&input).accepted, expected);
        }
    }
}

#[test]
fn test_minimization_is_fixed_point() {
    for regex in &["(a|b)*abb", "a|b", "ab*", "(0|1)*0(0|1)"] {
        let conversion = convert(regex).unwrap();
        let (again, _) = minimize(&conversion.minimized);
        assert_eq!(again.state_count(), conversion.minimized.state_count(), "{}", regex);
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let first = convert("(a|b)*a(a|b)?").unwrap();
    convert("x|y|z").unwrap();
    let second = convert("(a|b)*a(a|b)?").unwrap();
    assert_eq!(first.nfa, second.nfa);
    assert_eq!(first.dfa, second.dfa);
    assert_eq!(first.dfa_mapping, second.dfa_mapping);
    assert_eq!(first.minimized, second.minimized);
    assert_eq!(first.minimization_mapping, second.minimization_mapping);
}

#[test]
fn test_alphabets_match_regex() {
    for regex in &["a(b|c)*d", "ba|ab", "z?0+"] {
        let conversion = convert(regex).unwrap();
        let expected = extract_alphabet(regex);
        assert_eq!(conversion.nfa.alphabet(), &expected[..]);
        assert_eq!(conversion.dfa.alphabet(), &expected[..]);
        assert_eq!(conversion.minimized.alphabet(), &expected[..]);
    }
}

#[test]
fn test_construction_error_surfaces() {
    let err = convert("()").unwrap_err();
    assert_eq!(err, Error::Construction(ConstructionError::Empty));
    assert!(err.source().is_some());
    assert_eq!(err.to_string(), "cannot build automaton: expression has no symbols");

    let err = convert("(ab").unwrap_err();
    assert_eq!(err, Error::Syntax(SyntaxError::UnclosedOpen(1)));
}

#[test]
fn test_rendering() {
    let conversion = convert("ab*").unwrap();
    let nfa_table = conversion.nfa.table();
    assert_eq!(nfa_table.headers, vec!["State", "a", "b", "ε"]);
    assert_eq!(nfa_table.rows[2].cells, vec!["-", "-", "q3, q5"]);

    let dfa_table = conversion.dfa.table();
    assert_eq!(dfa_table.headers, vec!["State", "a", "b"]);
    assert!(dfa_table.rows[3].dead);

    let text = conversion.minimized.to_string();
    assert!(text.starts_with("Minimized DFA (3 states)"));

    let loops: Vec<_> = conversion.minimized.edges().into_iter().filter(|e| e.is_self_loop()).collect();
    assert_eq!(loops.len(), 2);
    let dead_loop = loops.iter().find(|e| e.from == StateId(2)).unwrap();
    assert_eq!(dead_loop.labels, vec![Label::Symbol('a'), Label::Symbol('b')]);
}
