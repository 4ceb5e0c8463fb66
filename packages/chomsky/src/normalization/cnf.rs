use indexmap::IndexMap;
use log::trace;

use crate::{
    grammars::{
        context_free::ContextFreeGrammar,
        types::{NonTerminal, ProductionSymbol, Terminal, Word},
    },
    normalization::symbols::SymbolFactory,
};

impl ContextFreeGrammar {
    /// Brings a grammar without erasing, unit or useless productions into
    /// Chomsky normal form shape: the start symbol is isolated, terminals in
    /// long productions are replaced by their own non-terminal and productions
    /// longer than two symbols are split into chains.
    pub fn to_chomsky_shape(&self, symbols: &mut SymbolFactory) -> Self {
        self.isolate_start_symbol(symbols)
            .isolate_terminals(symbols)
            .binarize(symbols)
    }

    fn isolate_start_symbol(&self, symbols: &mut SymbolFactory) -> Self {
        let recursive = self
            .productions
            .values()
            .flatten()
            .any(|word| word.mentions(&self.start_symbol));

        if !recursive {
            return self.clone();
        }

        let start_symbol = symbols.fresh("S");
        trace!("{start_symbol} replaces {} as start symbol", self.start_symbol);

        let mut grammar = Self::empty(start_symbol.clone());
        grammar.non_terminals.extend(self.non_terminals.iter().cloned());
        grammar.terminals = self.terminals.clone();

        // `S0 -> S` with the unit production already resolved.
        for word in self.productions_of(&self.start_symbol) {
            grammar.add_production(start_symbol.clone(), word.clone());
        }

        for (lhs, rhs) in &self.productions {
            for word in rhs {
                if *lhs == self.start_symbol && word.is_empty() {
                    continue;
                }

                grammar.add_production(lhs.clone(), word.clone());
            }
        }

        // The old start may only have been productive through its empty word.
        if grammar.productive_non_terminals().contains(&self.start_symbol) {
            grammar
        } else {
            grammar.remove_useless_symbols()
        }
    }

    fn isolate_terminals(&self, symbols: &mut SymbolFactory) -> Self {
        let mut grammar = Self::empty(self.start_symbol.clone());
        grammar.non_terminals.extend(self.non_terminals.iter().cloned());
        grammar.terminals = self.terminals.clone();

        let mut isolated: IndexMap<Terminal, NonTerminal> = IndexMap::new();

        for (lhs, rhs) in &self.productions {
            for word in rhs {
                if word.len() < 2 {
                    grammar.add_production(lhs.clone(), word.clone());
                    continue;
                }

                let mut shaped = Vec::with_capacity(word.len());
                for symbol in word.iter() {
                    match symbol {
                        ProductionSymbol::Terminal(t) => {
                            let nt = isolated
                                .entry(t.clone())
                                .or_insert_with(|| symbols.fresh("T"))
                                .clone();
                            shaped.push(ProductionSymbol::NonTerminal(nt));
                        }
                        ProductionSymbol::NonTerminal(_) => shaped.push(symbol.clone()),
                    }
                }

                grammar.add_production(lhs.clone(), Word::new(shaped));
            }
        }

        for (t, nt) in isolated {
            grammar.non_terminals.insert(nt.clone());
            grammar.add_production(nt, Word::new([ProductionSymbol::Terminal(t)]));
        }

        grammar
    }

    fn binarize(&self, symbols: &mut SymbolFactory) -> Self {
        let mut grammar = Self::empty(self.start_symbol.clone());
        grammar.non_terminals.extend(self.non_terminals.iter().cloned());
        grammar.terminals = self.terminals.clone();

        for (lhs, rhs) in &self.productions {
            for word in rhs {
                let n = word.len();
                if n <= 2 {
                    grammar.add_production(lhs.clone(), word.clone());
                    continue;
                }

                let mut head = lhs.clone();
                for symbol in &word.0[..n - 2] {
                    let next = symbols.fresh("Y");
                    grammar.non_terminals.insert(next.clone());
                    grammar.add_production(head, Word::new([symbol.clone(), next.clone().into()]));
                    head = next;
                }

                grammar.add_production(head, Word::new(word.0[n - 2..].iter().cloned()));
            }
        }

        grammar
    }
}
