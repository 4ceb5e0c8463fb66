use std::{borrow::Cow, fmt::Display, fs, path::Path};

use indexmap::{IndexMap, IndexSet};

use crate::{
    error::{Error, Result, Violation},
    grammars::{
        text,
        types::{Grammar, NonTerminal, ProductionSymbol, Terminal, Word},
    },
    language::Symbol,
    normalization::Stage,
};

/// A context-free grammar. Every conversion stage builds a new value instead of
/// mutating the one it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFreeGrammar {
    pub(crate) start_symbol: NonTerminal,
    pub(crate) non_terminals: IndexSet<NonTerminal>,
    pub(crate) terminals: IndexSet<Terminal>,
    pub(crate) productions: IndexMap<NonTerminal, IndexSet<Word<ProductionSymbol>>>,
}

impl Grammar<Word<ProductionSymbol>> for ContextFreeGrammar {
    fn start_symbol(&self) -> &NonTerminal {
        &self.start_symbol
    }

    fn non_terminals(&self) -> &IndexSet<NonTerminal> {
        &self.non_terminals
    }

    fn terminals(&self) -> &IndexSet<Terminal> {
        &self.terminals
    }

    fn erasing_productions(&self) -> Cow<'_, IndexSet<NonTerminal>> {
        // Empty words live in `productions` alongside the other alternatives.
        Cow::Owned(IndexSet::new())
    }

    fn productions(&self) -> &IndexMap<NonTerminal, IndexSet<Word<ProductionSymbol>>> {
        &self.productions
    }
}

impl ContextFreeGrammar {
    /// Builds a grammar from its four components and checks it.
    pub fn new(
        start_symbol: NonTerminal,
        non_terminals: impl IntoIterator<Item = NonTerminal>,
        terminals: impl IntoIterator<Item = Terminal>,
        productions: impl IntoIterator<Item = (NonTerminal, Word<ProductionSymbol>)>,
    ) -> Result<Self> {
        let mut grammar = Self::empty(start_symbol);
        grammar.non_terminals.extend(non_terminals);
        grammar.terminals.extend(terminals);

        for (lhs, rhs) in productions {
            grammar.add_production(lhs, rhs);
        }

        grammar
            .validate()
            .map_err(|violation| Error::InvalidGrammar {
                stage: Stage::Input,
                violation,
            })?;

        Ok(grammar)
    }

    /// Builds a grammar from production lines such as `"S -> a A | ε"`.
    ///
    /// Symbols that never appear on a left-hand side are terminals.
    pub fn from_productions<S: AsRef<str>>(
        start_symbol: &str,
        productions: &[S],
    ) -> Result<Self> {
        let mut source = format!("start: {start_symbol}\n");
        for production in productions {
            source.push_str(production.as_ref());
            source.push('\n');
        }

        text::parse(&source)
    }

    /// Parses the line-oriented exchange format described in [`text`].
    pub fn from_text(source: &str) -> Result<Self> {
        text::parse(source)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        text::parse(&source)
    }

    pub(crate) fn empty(start_symbol: NonTerminal) -> Self {
        Self {
            non_terminals: IndexSet::from([start_symbol.clone()]),
            start_symbol,
            terminals: IndexSet::new(),
            productions: IndexMap::new(),
        }
    }

    pub(crate) fn add_production(&mut self, lhs: NonTerminal, rhs: Word<ProductionSymbol>) {
        self.productions.entry(lhs).or_default().insert(rhs);
    }

    /// Checks the structural invariants and reports the first one that is broken.
    pub fn validate(&self) -> std::result::Result<(), Violation> {
        if !self.non_terminals.contains(&self.start_symbol) {
            return Err(Violation::UndeclaredStartSymbol(self.start_symbol.clone()));
        }

        if let Some(lhs) = self
            .productions
            .keys()
            .find(|lhs| !self.non_terminals.contains(*lhs))
        {
            return Err(Violation::UndeclaredLeftHandSide(lhs.clone()));
        }

        for (lhs, rhs) in &self.productions {
            for word in rhs {
                let undeclared = word.iter().find(|symbol| match symbol {
                    ProductionSymbol::Terminal(t) => !self.terminals.contains(t),
                    ProductionSymbol::NonTerminal(nt) => !self.non_terminals.contains(nt),
                });

                if let Some(symbol) = undeclared {
                    return Err(Violation::UndeclaredSymbol {
                        lhs: lhs.clone(),
                        word: word.clone(),
                        symbol: symbol.clone(),
                    });
                }
            }
        }

        if let Some(t) = self
            .terminals
            .iter()
            .find(|t| self.non_terminals.contains(&NonTerminal(t.0.clone())))
        {
            return Err(Violation::OverlappingSymbol(t.0.clone()));
        }

        if let Some((lhs, _)) = self.productions.iter().find(|(_, rhs)| rhs.is_empty()) {
            return Err(Violation::NoAlternatives(lhs.clone()));
        }

        Ok(())
    }

    /// Every name declared by the grammar, non-terminals first.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.non_terminals
            .iter()
            .map(|nt| &nt.0)
            .chain(self.terminals.iter().map(|t| &t.0))
    }

    pub fn productions_of(&self, nt: &NonTerminal) -> impl Iterator<Item = &Word<ProductionSymbol>> {
        self.productions.get(nt).into_iter().flatten()
    }

    /// Whether the start symbol has an erasing production.
    pub fn is_start_symbol_erasable(&self) -> bool {
        self.productions_of(&self.start_symbol).any(Word::is_empty)
    }
}

impl Display for ContextFreeGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_text(f)
    }
}
