use indexmap::IndexSet;
use itertools::Itertools;
use log::trace;

use crate::{
    grammars::{
        context_free::ContextFreeGrammar,
        types::{NonTerminal, ProductionSymbol, Word},
    },
    normalization::closure::fixpoint,
};

impl ContextFreeGrammar {
    /// Non-terminals that derive the empty word.
    pub fn nullable_non_terminals(&self) -> IndexSet<NonTerminal> {
        fixpoint(IndexSet::new(), |nullable| {
            self.productions
                .iter()
                .filter(|(lhs, rhs)| {
                    !nullable.contains(*lhs)
                        && rhs.iter().any(|word| {
                            word.iter().all(|symbol| match symbol {
                                ProductionSymbol::NonTerminal(nt) => nullable.contains(nt),
                                ProductionSymbol::Terminal(_) => false,
                            })
                        })
                })
                .map(|(lhs, _)| lhs.clone())
                .collect()
        })
    }

    /// Replaces every production by all its variants with nullable occurrences
    /// left out, then drops the erasing productions.
    ///
    /// With `keep_empty_word` a nullable start symbol keeps a single erasing
    /// production so that the language still contains the empty word.
    pub fn eliminate_erasing_productions(&self, keep_empty_word: bool) -> Self {
        let erasable_non_terminals = self.nullable_non_terminals();
        trace!(
            "nullable non-terminals: {{{}}}",
            erasable_non_terminals.iter().join(", ")
        );

        let mut grammar = Self::empty(self.start_symbol.clone());
        grammar.non_terminals = self.non_terminals.clone();
        grammar.terminals = self.terminals.clone();

        if keep_empty_word && erasable_non_terminals.contains(&self.start_symbol) {
            grammar.add_production(self.start_symbol.clone(), Word::empty());
        }

        for (lhs, rhs) in &self.productions {
            for word in rhs {
                let words = word
                    .iter()
                    .cloned()
                    .map(|symbol| {
                        let erasable = symbol
                            .as_non_terminal()
                            .is_some_and(|nt| erasable_non_terminals.contains(nt));

                        if erasable {
                            vec![Some(symbol), None]
                        } else {
                            vec![Some(symbol)]
                        }
                    })
                    .multi_cartesian_product()
                    .filter_map(|word| {
                        let word = word.into_iter().flatten().collect::<Vec<_>>();
                        if word.is_empty() {
                            None
                        } else {
                            Some(Word::new(word))
                        }
                    });

                for word in words {
                    grammar.add_production(lhs.clone(), word);
                }
            }
        }

        grammar
    }
}
