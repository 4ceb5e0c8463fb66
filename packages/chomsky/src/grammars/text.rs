//! Line-oriented grammar exchange format.
//!
//! ```text
//! # comment
//! start: S
//! terminals: a b          (optional)
//! nonterminals: S A       (optional)
//! S -> a A | b
//! A -> ε
//! ```
//!
//! Non-terminals are the left-hand sides plus any `nonterminals:` entries. When a
//! `terminals:` line is present it is authoritative, otherwise every right-hand
//! symbol that is not a non-terminal is a terminal. `ε` on its own, or an empty
//! alternative, is the empty word.

use indexmap::{IndexMap, IndexSet};
use winnow::{
    ascii::{space0, space1},
    combinator::{alt, delimited, preceded, separated},
    token::take_while,
    ModalResult, Parser,
};

use crate::{
    error::{Error, Result},
    grammars::{
        context_free::ContextFreeGrammar,
        types::{NonTerminal, ProductionSymbol, Terminal, Word},
    },
    language::EPSILON,
};

#[derive(Debug, PartialEq)]
enum Line<'s> {
    Start(&'s str),
    Terminals(Vec<&'s str>),
    NonTerminals(Vec<&'s str>),
    Production(&'s str, Vec<Vec<&'s str>>),
}

fn symbol<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| !c.is_whitespace() && c != '|').parse_next(input)
}

fn left_hand_side<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && c != '|' && c != '-' && c != '→' && c != ':'
    })
    .parse_next(input)
}

fn symbols<'s>(input: &mut &'s str) -> ModalResult<Vec<&'s str>> {
    separated(0.., symbol, space1).parse_next(input)
}

fn production<'s>(input: &mut &'s str) -> ModalResult<Line<'s>> {
    (
        left_hand_side,
        delimited(space0, alt(("->", "→")), space0),
        separated(1.., symbols, (space0, '|', space0)),
    )
        .map(|(lhs, _, alternatives)| Line::Production(lhs, alternatives))
        .parse_next(input)
}

fn line<'s>(input: &mut &'s str) -> ModalResult<Line<'s>> {
    alt((
        preceded(("start", space0, ':', space0), symbol).map(Line::Start),
        preceded(("terminals", space0, ':', space0), symbols).map(Line::Terminals),
        preceded(("nonterminals", space0, ':', space0), symbols).map(Line::NonTerminals),
        production,
    ))
    .parse_next(input)
}

/// Parses a whole grammar document and validates the result.
pub fn parse(source: &str) -> Result<ContextFreeGrammar> {
    let mut start_symbol = None;
    let mut declared_terminals: Option<IndexSet<&str>> = None;
    let mut declared_non_terminals = IndexSet::new();
    let mut rules: IndexMap<&str, Vec<Vec<&str>>> = IndexMap::new();

    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();

        if content.is_empty() {
            continue;
        }

        let parsed = line.parse(content).map_err(|e| Error::Syntax {
            line: number,
            message: e.to_string(),
        })?;

        match parsed {
            Line::Start(symbol) => {
                if start_symbol.replace(symbol).is_some() {
                    return Err(Error::Syntax {
                        line: number,
                        message: "the start symbol is declared more than once".to_owned(),
                    });
                }
            }
            Line::Terminals(symbols) => {
                declared_terminals
                    .get_or_insert_with(IndexSet::new)
                    .extend(symbols);
            }
            Line::NonTerminals(symbols) => {
                declared_non_terminals.extend(symbols);
            }
            Line::Production(lhs, alternatives) => {
                let entry = rules.entry(lhs).or_default();
                for alternative in alternatives {
                    if alternative.len() > 1 && alternative.contains(&EPSILON) {
                        return Err(Error::Syntax {
                            line: number,
                            message: format!("{EPSILON} must be the only symbol of an alternative"),
                        });
                    }
                    entry.push(alternative);
                }
            }
        }
    }

    let Some(start_symbol) = start_symbol else {
        return Err(Error::Syntax {
            line: source.lines().count(),
            message: "missing `start:` declaration".to_owned(),
        });
    };

    let mut non_terminals = IndexSet::from([start_symbol]);
    non_terminals.extend(rules.keys().copied());
    non_terminals.extend(declared_non_terminals);

    let terminals = match declared_terminals {
        Some(terminals) => terminals,
        None => rules
            .values()
            .flatten()
            .flatten()
            .copied()
            .filter(|symbol| *symbol != EPSILON && !non_terminals.contains(symbol))
            .collect(),
    };

    let productions = rules.iter().flat_map(|(lhs, alternatives)| {
        alternatives.iter().map(|alternative| {
            let word = alternative
                .iter()
                .filter(|symbol| **symbol != EPSILON)
                .map(|symbol| {
                    if non_terminals.contains(symbol) {
                        ProductionSymbol::NonTerminal(NonTerminal::new(*symbol))
                    } else {
                        // Undeclared symbols surface as terminals and fail validation.
                        ProductionSymbol::Terminal(Terminal::new(*symbol))
                    }
                });

            (NonTerminal::new(*lhs), Word::new(word))
        })
    });

    ContextFreeGrammar::new(
        NonTerminal::new(start_symbol),
        non_terminals.iter().map(|nt| NonTerminal::new(*nt)),
        terminals.iter().map(|t| Terminal::new(*t)),
        productions.collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{error::Violation, grammars::types::Grammar};

    #[test]
    fn test_line_production() {
        assert_eq!(
            line.parse("S -> a A | b |  ε").ok(),
            Some(Line::Production(
                "S",
                vec![vec!["a", "A"], vec!["b"], vec!["ε"]]
            ))
        );
    }

    #[test]
    fn test_line_empty_alternative() {
        assert_eq!(
            line.parse("A → x |").ok(),
            Some(Line::Production("A", vec![vec!["x"], vec![]]))
        );
    }

    #[test]
    fn test_line_declarations() {
        assert_eq!(line.parse("start: S").ok(), Some(Line::Start("S")));
        assert_eq!(
            line.parse("terminals: + ( )").ok(),
            Some(Line::Terminals(vec!["+", "(", ")"]))
        );
        assert_eq!(
            line.parse("nonterminals:").ok(),
            Some(Line::NonTerminals(vec![]))
        );
    }

    #[test]
    fn test_line_keyword_as_non_terminal() {
        assert_eq!(
            line.parse("start -> go").ok(),
            Some(Line::Production("start", vec![vec!["go"]]))
        );
    }

    #[test]
    fn test_parse_infers_terminals() {
        let grammar = parse("start: S\nS -> a A | ε\nA -> b\n").unwrap();

        assert_eq!(
            grammar.non_terminals(),
            &IndexSet::from([NonTerminal::new("S"), NonTerminal::new("A")])
        );
        assert_eq!(
            grammar.terminals(),
            &IndexSet::from([Terminal::new("a"), Terminal::new("b")])
        );
        assert!(grammar.is_start_symbol_erasable());
    }

    #[test]
    fn test_parse_rejects_undeclared_symbol() {
        let result = parse("start: S\nterminals: a\nS -> a c\n");

        match result {
            Err(Error::InvalidGrammar {
                violation: Violation::UndeclaredSymbol { symbol, .. },
                ..
            }) => assert_eq!(symbol.to_string(), "c"),
            other => panic!("Expected an undeclared symbol, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_overlap() {
        let result = parse("start: S\nterminals: a A\nS -> a A\nA -> a\n");

        assert!(matches!(
            result,
            Err(Error::InvalidGrammar {
                violation: Violation::OverlappingSymbol(_),
                ..
            })
        ));
    }

    #[test]
    fn test_parse_syntax_errors() {
        assert!(matches!(
            parse("S -> a\n"),
            Err(Error::Syntax { .. })
        ));
        assert!(matches!(
            parse("start: S\nS a b\n"),
            Err(Error::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            parse("start: S\nS -> a ε\n"),
            Err(Error::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            parse("start: S\nstart: A\nS -> a\n"),
            Err(Error::Syntax { line: 2, .. })
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let grammar = parse(
            "# arithmetic\nstart: E\nE -> E + T | T\nT -> ( E ) | x   # atoms\nN -> ε\n",
        )
        .unwrap();

        let reparsed = parse(&grammar.to_string()).unwrap();

        assert_eq!(reparsed, grammar);
    }
}
