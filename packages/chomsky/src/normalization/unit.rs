use indexmap::IndexSet;
use itertools::Itertools;
use log::trace;

use crate::{
    grammars::{context_free::ContextFreeGrammar, types::NonTerminal},
    normalization::closure::fixpoint,
};

impl ContextFreeGrammar {
    /// Pairs `(A, B)` such that `A` derives `B` through unit productions alone,
    /// including every reflexive pair `(A, A)`.
    pub fn unit_pairs(&self) -> IndexSet<(NonTerminal, NonTerminal)> {
        let reflexive = self.non_terminals.iter().map(|nt| (nt.clone(), nt.clone()));
        let direct = self.productions.iter().flat_map(|(lhs, rhs)| {
            rhs.iter()
                .filter_map(|word| word.unit())
                .map(|nt| (lhs.clone(), nt.clone()))
        });

        fixpoint(reflexive.chain(direct).collect(), |pairs| {
            pairs
                .iter()
                .flat_map(|(a, b)| {
                    pairs
                        .iter()
                        .filter(move |(b2, _)| b2 == b)
                        .map(move |(_, c)| (a.clone(), c.clone()))
                })
                .filter(|pair| !pairs.contains(pair))
                .collect()
        })
    }

    /// Replaces unit productions `A → B` by the non-unit productions of every `B`
    /// reachable from `A` through unit productions.
    pub fn eliminate_unit_productions(&self) -> Self {
        let unit_pairs = self.unit_pairs();
        trace!(
            "unit pairs: {}",
            unit_pairs
                .iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| format!("({a}, {b})"))
                .join(", ")
        );

        let mut grammar = Self::empty(self.start_symbol.clone());
        grammar.non_terminals = self.non_terminals.clone();
        grammar.terminals = self.terminals.clone();

        for (a, b) in &unit_pairs {
            for word in self.productions_of(b) {
                // The empty word of a nullable start symbol stays where it is.
                if word.unit().is_some() || (a != b && word.is_empty()) {
                    continue;
                }

                grammar.add_production(a.clone(), word.clone());
            }
        }

        grammar
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn grammar(start: &str, productions: &[&str]) -> ContextFreeGrammar {
        ContextFreeGrammar::from_productions(start, productions).unwrap()
    }

    fn pair(a: &str, b: &str) -> (NonTerminal, NonTerminal) {
        (NonTerminal::new(a), NonTerminal::new(b))
    }

    #[test]
    fn test_unit_pairs_are_transitive() {
        let cfg = grammar("X", &["X -> Y", "Y -> Z", "Z -> c"]);

        assert_eq!(
            cfg.unit_pairs(),
            IndexSet::from([
                pair("X", "X"),
                pair("Y", "Y"),
                pair("Z", "Z"),
                pair("X", "Y"),
                pair("Y", "Z"),
                pair("X", "Z"),
            ])
        );
    }

    #[test]
    fn test_eliminate_unit_chain() {
        let cfg = grammar("X", &["X -> Y", "Y -> Z", "Z -> c"]);

        let expected = grammar("X", &["X -> c", "Y -> c", "Z -> c"]);

        assert_eq!(cfg.eliminate_unit_productions(), expected);
    }

    #[test]
    fn test_eliminate_unit_cycle() {
        let cfg = grammar("A", &["A -> B | a", "B -> A | b C", "C -> c"]);

        let expected = grammar("A", &["A -> a | b C", "B -> b C | a", "C -> c"]);

        assert_eq!(cfg.eliminate_unit_productions(), expected);
    }

    #[test]
    fn test_erasing_start_production_is_not_copied() {
        let cfg = grammar("S", &["S -> ε | a", "T -> S | b"]);

        let result = cfg.eliminate_unit_productions();

        assert!(result.is_start_symbol_erasable());
        assert_eq!(result, grammar("S", &["S -> ε | a", "T -> b | a"]));
    }
}
