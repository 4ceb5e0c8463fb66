#![allow(dead_code)]

//! Helpers shared by the integration tests.

use chomsky::{ContextFreeGrammar, Grammar, NonTerminal, ProductionSymbol, Terminal};
use indexmap::{IndexMap, IndexSet};

pub fn grammar(start: &str, productions: &[&str]) -> ContextFreeGrammar {
    ContextFreeGrammar::from_productions(start, productions).unwrap()
}

pub fn terminals(word: &str) -> Vec<Terminal> {
    word.split_whitespace().map(Terminal::new).collect()
}

/// Every terminal word of length at most `max_len` derivable from the start symbol.
///
/// Works for any context-free grammar, erasing and cyclic unit productions
/// included, by growing the bounded language of each non-terminal to a fixpoint.
pub fn language(grammar: &ContextFreeGrammar, max_len: usize) -> IndexSet<Vec<String>> {
    let alternatives = grammar.alternatives();
    let mut derived: IndexMap<NonTerminal, IndexSet<Vec<String>>> = IndexMap::new();

    loop {
        let mut changed = false;

        for (lhs, rhs) in &alternatives {
            for word in rhs {
                let mut partial: IndexSet<Vec<String>> = IndexSet::from([Vec::new()]);

                for symbol in word.iter() {
                    let options: Vec<Vec<String>> = match symbol {
                        ProductionSymbol::Terminal(t) => vec![vec![t.to_string()]],
                        ProductionSymbol::NonTerminal(nt) => derived
                            .get(nt)
                            .map(|words| words.iter().cloned().collect())
                            .unwrap_or_default(),
                    };

                    partial = partial
                        .iter()
                        .flat_map(|prefix| {
                            options.iter().map(move |suffix| [prefix.clone(), suffix.clone()].concat())
                        })
                        .filter(|word| word.len() <= max_len)
                        .collect();
                }

                let entry = derived.entry(lhs.clone()).or_default();
                for word in partial {
                    changed |= entry.insert(word);
                }
            }
        }

        if !changed {
            break;
        }
    }

    derived
        .get(grammar.start_symbol())
        .cloned()
        .unwrap_or_default()
}

/// Every word over `alphabet` of length at most `max_len`.
pub fn words(alphabet: &IndexSet<Terminal>, max_len: usize) -> Vec<Vec<Terminal>> {
    let mut words = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];

    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|word: &Vec<Terminal>| {
                alphabet.iter().map(move |t| {
                    let mut word = word.clone();
                    word.push(t.clone());
                    word
                })
            })
            .collect();
        words.extend(frontier.iter().cloned());
    }

    words
}

pub fn to_strings(word: &[Terminal]) -> Vec<String> {
    word.iter().map(Terminal::to_string).collect()
}

/// Grammars exercising erasing, unit, cyclic and useless productions.
pub fn samples() -> Vec<ContextFreeGrammar> {
    vec![
        grammar("S", &["S -> A B C | ε", "A -> a A | ε", "B -> b | A", "C -> c C | C | ε"]),
        grammar("E", &["E -> E + T | T", "T -> T * F | F", "F -> ( E ) | x"]),
        grammar("S", &["S -> ( S ) S | ε"]),
        grammar("S", &["S -> A | B", "A -> a A a | a", "B -> b B | ε", "W -> w"]),
        grammar("S", &["S -> a S"]),
        grammar("S", &["S -> ε"]),
        grammar("S", &["S -> A", "A -> B | a", "B -> S | b"]),
        grammar("S", &["S -> a S b S | b S a S | ε"]),
        grammar("S", &["S -> x y z w v | S S"]),
    ]
}
