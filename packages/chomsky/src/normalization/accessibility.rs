use std::convert::Infallible;

use indexmap::IndexSet;
use itertools::Itertools;
use log::{debug, trace};

use crate::{
    grammars::{
        context_free::ContextFreeGrammar,
        types::{NonTerminal, ProductionSymbol, Terminal},
    },
    normalization::{closure::fixpoint, Stage},
};

impl ContextFreeGrammar {
    /// Non-terminals reachable from the start symbol, the start symbol included.
    pub fn accessible_non_terminals(&self) -> IndexSet<NonTerminal> {
        fixpoint(IndexSet::from([self.start_symbol.clone()]), |accessible| {
            accessible
                .iter()
                .flat_map(|nt| self.productions_of(nt))
                .flat_map(|word| word.non_terminals())
                .filter(|nt| !accessible.contains(*nt))
                .cloned()
                .collect()
        })
    }

    /// Keeps only the non-terminals reachable from the start symbol and the
    /// terminals their productions still use.
    pub fn remove_inaccessible_symbols(&self) -> Self {
        let accessible = self.accessible_non_terminals();
        trace!(
            "inaccessible non-terminals: {{{}}}",
            self.non_terminals
                .iter()
                .filter(|nt| !accessible.contains(*nt))
                .join(", ")
        );

        let mut grammar = Self::empty(self.start_symbol.clone());
        grammar.non_terminals.extend(
            self.non_terminals
                .iter()
                .filter(|nt| accessible.contains(*nt))
                .cloned(),
        );

        for (lhs, rhs) in &self.productions {
            if accessible.contains(lhs) {
                for word in rhs {
                    grammar.add_production(lhs.clone(), word.clone());
                }
            }
        }

        let used = grammar
            .productions
            .values()
            .flatten()
            .flat_map(|word| word.iter())
            .filter_map(|symbol| match symbol {
                ProductionSymbol::Terminal(t) => Some(t),
                _ => None,
            })
            .cloned()
            .collect::<IndexSet<Terminal>>();

        grammar.terminals = self
            .terminals
            .iter()
            .filter(|t| used.contains(*t))
            .cloned()
            .collect();

        grammar
    }

    /// Alternates the unproductive and the inaccessible symbol removal until the
    /// grammar stops changing.
    pub fn remove_useless_symbols(&self) -> Self {
        match self.prune_useless_symbols(|_, _| Ok::<_, Infallible>(())) {
            Ok(grammar) => grammar,
            Err(never) => match never {},
        }
    }

    /// The loop behind [`Self::remove_useless_symbols`]. `inspect` sees the
    /// grammar after every productivity and accessibility pass and may abort.
    pub(crate) fn prune_useless_symbols<E>(
        &self,
        mut inspect: impl FnMut(Stage, &Self) -> Result<(), E>,
    ) -> Result<Self, E> {
        let mut grammar = self.clone();

        for round in 1.. {
            let productive = grammar.remove_unproductive_symbols();
            inspect(Stage::Productivity, &productive)?;

            let pruned = productive.remove_inaccessible_symbols();
            inspect(Stage::Accessibility, &pruned)?;

            if pruned == grammar {
                debug!("useless symbol removal settled after {round} round(s)");
                break;
            }

            grammar = pruned;
        }

        Ok(grammar)
    }
}
