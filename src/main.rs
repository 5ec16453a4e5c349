use regex_fsm::simulate::Consumed;
use regex_fsm::{convert_with, Conversion, Options, PlusOperator};
use std::io::{self, BufRead};
use std::process;

fn print_usage() {
    eprintln!(
        "\
Usage: regex-fsm [OPTIONS] [TEST-STRING]...

Reads one regular expression per line from stdin and prints its NFA, DFA and
minimized DFA. Every TEST-STRING is then run through the minimized DFA.

Options:
  --plus-as-union   Read '+' as the union operator instead of one-or-more
  -h, --help        Print this help message

Logging is controlled with RUST_LOG (e.g. RUST_LOG=regex_fsm=trace)."
    );
}

fn parse_args() -> (Options, Vec<String>) {
    let mut options = Options::new();
    let mut inputs = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "--plus-as-union" => options = options.with_plus(PlusOperator::Union),
            other if other.starts_with('-') => {
                eprintln!("error: unknown option: {}", other);
                print_usage();
                process::exit(1);
            }
            _ => inputs.push(arg),
        }
    }
    (options, inputs)
}

fn report(conversion: &Conversion, inputs: &[String]) {
    println!("{}", conversion.nfa);
    println!("{}", conversion.dfa);
    print!("{}", conversion.dfa_mapping);
    println!();
    println!("{}", conversion.minimized);
    print!("{}", conversion.minimization_mapping);

    let min = &conversion.minimized;
    for input in inputs {
        let result = conversion.test(input);
        println!();
        println!("input {:?}", input);
        for step in &result.steps {
            match step.consumed {
                Consumed::Start => println!("  start -> {}", min.name(step.state)),
                Consumed::Symbol(c) => {
                    println!("  {:>3}: '{}' -> {}", step.position, c, min.name(step.state))
                }
            }
        }
        if let Some(ref e) = result.error {
            println!("  error: {}", e);
        }
        println!("  {}", if result.accepted { "ACCEPTED" } else { "REJECTED" });
    }
}

fn main() {
    env_logger::init();
    let (options, inputs) = parse_args();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: failed to read stdin: {}", e);
                process::exit(1);
            }
        };
        let regex = line.trim();
        if regex.is_empty() {
            continue;
        }
        match convert_with(regex, &options) {
            Err(e) => println!("error: {}", e),
            Ok(conversion) => report(&conversion, &inputs),
        }
        println!();
    }
}
