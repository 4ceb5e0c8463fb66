use std::{borrow::Cow, fmt::Display};

use derive_more::Display;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

pub use crate::language::Word;
use crate::language::Symbol;

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal(pub Symbol);

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminal(pub Symbol);

impl Terminal {
    pub fn new(name: impl Into<String>) -> Self {
        Terminal(Symbol::new(name))
    }
}

impl NonTerminal {
    pub fn new(name: impl Into<String>) -> Self {
        NonTerminal(Symbol::new(name))
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub enum ProductionSymbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl ProductionSymbol {
    pub fn symbol(&self) -> &Symbol {
        match self {
            ProductionSymbol::Terminal(t) => &t.0,
            ProductionSymbol::NonTerminal(nt) => &nt.0,
        }
    }

    pub fn as_non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            ProductionSymbol::NonTerminal(nt) => Some(nt),
            ProductionSymbol::Terminal(_) => None,
        }
    }
}

impl From<Terminal> for ProductionSymbol {
    fn from(t: Terminal) -> Self {
        ProductionSymbol::Terminal(t)
    }
}

impl From<NonTerminal> for ProductionSymbol {
    fn from(nt: NonTerminal) -> Self {
        ProductionSymbol::NonTerminal(nt)
    }
}

impl Word<ProductionSymbol> {
    /// The right-hand non-terminal if this is a unit production.
    pub fn unit(&self) -> Option<&NonTerminal> {
        match self.0.as_slice() {
            [ProductionSymbol::NonTerminal(nt)] => Some(nt),
            _ => None,
        }
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = &NonTerminal> {
        self.0.iter().filter_map(ProductionSymbol::as_non_terminal)
    }

    pub fn mentions(&self, nt: &NonTerminal) -> bool {
        self.non_terminals().any(|symbol| symbol == nt)
    }
}

pub trait ProductionWord: Display + Clone {
    fn to_word(&self) -> Word<ProductionSymbol>;
}

impl ProductionWord for Word<ProductionSymbol> {
    fn to_word(&self) -> Word<ProductionSymbol> {
        self.clone()
    }
}

/// Read access shared by the general and the normalized grammar representations.
pub trait Grammar<R: ProductionWord> {
    fn start_symbol(&self) -> &NonTerminal;
    fn non_terminals(&self) -> &IndexSet<NonTerminal>;
    fn terminals(&self) -> &IndexSet<Terminal>;
    /// Erasing productions that are not stored in [`Grammar::productions`].
    fn erasing_productions(&self) -> Cow<'_, IndexSet<NonTerminal>>;
    fn productions(&self) -> &IndexMap<NonTerminal, IndexSet<R>>;

    /// All right-hand sides per left-hand side, erasing productions first.
    fn alternatives(&self) -> IndexMap<NonTerminal, IndexSet<Word<ProductionSymbol>>> {
        let mut alternatives = IndexMap::<_, IndexSet<_>>::new();

        for lhs in self.erasing_productions().iter() {
            alternatives
                .entry(lhs.clone())
                .or_default()
                .insert(Word::empty());
        }

        for (lhs, rhs) in self.productions() {
            alternatives
                .entry(lhs.clone())
                .or_default()
                .extend(rhs.iter().map(ProductionWord::to_word));
        }

        alternatives
    }

    fn production_count(&self) -> usize {
        self.alternatives().values().map(IndexSet::len).sum()
    }

    /// Textbook rendering: `G = (N, T, P, S)` followed by the production set.
    fn definition(&self) -> String {
        let start_symbol = self.start_symbol();

        let mut non_terminals = self.non_terminals().clone();
        non_terminals.sort_by(|a, b| {
            if a == start_symbol {
                return std::cmp::Ordering::Less;
            }
            if b == start_symbol {
                return std::cmp::Ordering::Greater;
            }
            a.cmp(b)
        });

        let mut terminals = self.terminals().clone();
        terminals.sort();

        let mut string_productions = self.alternatives();
        string_productions.sort_by(|lhs1, _, lhs2, _| {
            (lhs1 != start_symbol)
                .cmp(&(lhs2 != start_symbol))
                .then_with(|| lhs1.cmp(lhs2))
        });

        let mut definition = format!(
            "G = ({{{}}}, {{{}}}, P, {})\n\n",
            non_terminals.iter().join(", "),
            terminals.iter().join(", "),
            start_symbol
        );

        definition += "P = {\n";

        for (lhs, rhs) in string_productions {
            definition += &format!("  {} → {}\n", lhs, rhs.iter().join(" | "));
        }

        definition += "}\n";

        definition
    }

    /// Renders the line-oriented exchange format read by [`crate::grammars::text`].
    fn write_text(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "start: {}", self.start_symbol())?;
        writeln!(f, "nonterminals: {}", self.non_terminals().iter().join(" "))?;
        writeln!(f, "terminals: {}", self.terminals().iter().join(" "))?;

        for (lhs, rhs) in self.alternatives() {
            writeln!(f, "{} -> {}", lhs, rhs.iter().join(" | "))?;
        }

        Ok(())
    }
}
