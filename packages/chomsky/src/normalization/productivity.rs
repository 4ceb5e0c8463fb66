use indexmap::IndexSet;
use itertools::Itertools;
use log::trace;

use crate::{
    grammars::{
        context_free::ContextFreeGrammar,
        types::{NonTerminal, ProductionSymbol},
    },
    normalization::closure::fixpoint,
};

impl ContextFreeGrammar {
    /// Non-terminals that derive at least one terminal word.
    pub fn productive_non_terminals(&self) -> IndexSet<NonTerminal> {
        fixpoint(IndexSet::new(), |productive| {
            self.productions
                .iter()
                .filter(|(lhs, rhs)| {
                    !productive.contains(*lhs)
                        && rhs.iter().any(|word| {
                            word.iter().all(|symbol| match symbol {
                                ProductionSymbol::Terminal(_) => true,
                                ProductionSymbol::NonTerminal(nt) => productive.contains(nt),
                            })
                        })
                })
                .map(|(lhs, _)| lhs.clone())
                .collect()
        })
    }

    /// Drops unproductive non-terminals together with every production that
    /// mentions one. The start symbol stays declared even when unproductive.
    pub fn remove_unproductive_symbols(&self) -> Self {
        let productive = self.productive_non_terminals();
        trace!(
            "unproductive non-terminals: {{{}}}",
            self.non_terminals
                .iter()
                .filter(|nt| !productive.contains(*nt))
                .join(", ")
        );

        let mut grammar = Self::empty(self.start_symbol.clone());
        grammar.non_terminals.extend(
            self.non_terminals
                .iter()
                .filter(|nt| productive.contains(*nt))
                .cloned(),
        );
        grammar.terminals = self.terminals.clone();

        for (lhs, rhs) in &self.productions {
            if !productive.contains(lhs) {
                continue;
            }

            for word in rhs {
                if word.non_terminals().all(|nt| productive.contains(nt)) {
                    grammar.add_production(lhs.clone(), word.clone());
                }
            }
        }

        grammar
    }
}
