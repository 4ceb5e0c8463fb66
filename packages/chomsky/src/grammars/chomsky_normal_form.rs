use std::{borrow::Cow, fmt::Display};

use indexmap::{indexset, IndexMap, IndexSet};
use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::{
    error::Violation,
    grammars::{
        context_free::ContextFreeGrammar,
        types::{Grammar, NonTerminal, ProductionSymbol, ProductionWord, Terminal, Word},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CnfWord {
    Terminal(Terminal),
    NonTerminals(NonTerminal, NonTerminal),
}

impl Display for CnfWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CnfWord::Terminal(t) => write!(f, "{t}"),
            CnfWord::NonTerminals(nt1, nt2) => write!(f, "{nt1} {nt2}"),
        }
    }
}

impl TryFrom<&Word<ProductionSymbol>> for CnfWord {
    type Error = String;

    fn try_from(value: &Word<ProductionSymbol>) -> Result<Self, Self::Error> {
        match value.0.as_slice() {
            [ProductionSymbol::Terminal(t)] => Ok(CnfWord::Terminal(t.clone())),
            [ProductionSymbol::NonTerminal(nt1), ProductionSymbol::NonTerminal(nt2)] => {
                Ok(CnfWord::NonTerminals(nt1.clone(), nt2.clone()))
            }
            _ => Err(
                "CnfWord can only be created from a word with one terminal or two non-terminals"
                    .to_string(),
            ),
        }
    }
}

impl ProductionWord for CnfWord {
    fn to_word(&self) -> Word<ProductionSymbol> {
        match self {
            CnfWord::Terminal(t) => Word(vec![ProductionSymbol::Terminal(t.clone())]),
            CnfWord::NonTerminals(nt1, nt2) => Word(vec![
                ProductionSymbol::NonTerminal(nt1.clone()),
                ProductionSymbol::NonTerminal(nt2.clone()),
            ]),
        }
    }
}

/// A grammar whose productions are `A → a`, `A → B C`, or `S → ε` for the start
/// symbol `S`, which then never occurs on a right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChomskyNormalFormGrammar {
    pub(super) start_symbol: NonTerminal,
    pub(super) is_start_symbol_erasable: bool,
    pub(super) non_terminals: IndexSet<NonTerminal>,
    pub(super) terminals: IndexSet<Terminal>,
    pub(super) productions: IndexMap<NonTerminal, IndexSet<CnfWord>>,
}

impl Grammar<CnfWord> for ChomskyNormalFormGrammar {
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
        Cow::Owned(if self.is_start_symbol_erasable {
            indexset! {self.start_symbol.clone()}
        } else {
            IndexSet::new()
        })
    }

    fn productions(&self) -> &IndexMap<NonTerminal, IndexSet<CnfWord>> {
        &self.productions
    }
}

impl TryFrom<&ContextFreeGrammar> for ChomskyNormalFormGrammar {
    type Error = Violation;

    /// Checks the normal form shape of every production.
    fn try_from(cfg: &ContextFreeGrammar) -> Result<Self, Self::Error> {
        let mut cnf = Self {
            start_symbol: cfg.start_symbol.clone(),
            is_start_symbol_erasable: false,
            non_terminals: cfg.non_terminals.clone(),
            terminals: cfg.terminals.clone(),
            productions: IndexMap::new(),
        };

        for (lhs, rhs) in &cfg.productions {
            for word in rhs {
                if word.is_empty() && *lhs == cnf.start_symbol {
                    cnf.is_start_symbol_erasable = true;
                    continue;
                }

                let cnf_word =
                    CnfWord::try_from(word).map_err(|_| Violation::NotInNormalForm {
                        lhs: lhs.clone(),
                        word: word.clone(),
                    })?;

                cnf.productions
                    .entry(lhs.clone())
                    .or_insert_with(IndexSet::new)
                    .insert(cnf_word);
            }
        }

        if cnf.is_start_symbol_erasable {
            for (lhs, rhs) in &cfg.productions {
                if let Some(word) = rhs.iter().find(|word| word.mentions(&cnf.start_symbol)) {
                    return Err(Violation::NotInNormalForm {
                        lhs: lhs.clone(),
                        word: word.clone(),
                    });
                }
            }
        }

        Ok(cnf)
    }
}

impl ChomskyNormalFormGrammar {
    pub fn is_start_symbol_erasable(&self) -> bool {
        self.is_start_symbol_erasable
    }

    pub fn to_context_free_grammar(&self) -> ContextFreeGrammar {
        let mut grammar = ContextFreeGrammar::empty(self.start_symbol.clone());
        grammar.non_terminals = self.non_terminals.clone();
        grammar.terminals = self.terminals.clone();

        for (lhs, rhs) in self.alternatives() {
            for word in rhs {
                grammar.add_production(lhs.clone(), word);
            }
        }

        grammar
    }

    pub fn accepts(&self, word: &[Terminal]) -> bool {
        self.cyk(word).is_word_in_language()
    }

    pub fn cyk(&self, word: &[Terminal]) -> CykTable {
        let n = word.len();
        let mut table = CykTable::new(n, word, &self.start_symbol, self.is_start_symbol_erasable);

        for (lhs, rhs) in &self.productions {
            for production in rhs {
                if let CnfWord::Terminal(t) = production {
                    for (i, terminal) in word.iter().enumerate() {
                        if terminal == t {
                            table.insert(i, i, lhs.clone());
                        }
                    }
                }
            }
        }

        for d in 0..n.saturating_sub(1) {
            for i in 0..n - d - 1 {
                let j = i + d + 1;

                for k in i..j {
                    for (lhs, rhs) in &self.productions {
                        for production in rhs {
                            if let CnfWord::NonTerminals(nt1, nt2) = production {
                                if table.contains(i, k, nt1) && table.contains(k + 1, j, nt2) {
                                    table.insert(i, j, lhs.clone());
                                }
                            }
                        }
                    }
                }
            }
        }

        table
    }
}

impl Display for ChomskyNormalFormGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_text(f)
    }
}

#[derive(Debug)]
pub struct CykTable {
    table: Vec<Vec<IndexSet<NonTerminal>>>,
    word: Vec<Terminal>,
    start_symbol: NonTerminal,
    accepts_empty_word: bool,
}

impl CykTable {
    pub fn new(
        size: usize,
        word: &[Terminal],
        start_symbol: &NonTerminal,
        accepts_empty_word: bool,
    ) -> Self {
        CykTable {
            table: vec![vec![IndexSet::new(); size]; size],
            word: word.to_vec(),
            start_symbol: start_symbol.clone(),
            accepts_empty_word,
        }
    }

    pub fn contains(&self, i: usize, j: usize, value: &NonTerminal) -> bool {
        self.table[i][j].contains(value)
    }

    pub fn get(&self, i: usize, j: usize) -> &IndexSet<NonTerminal> {
        &self.table[i][j]
    }

    pub fn insert(&mut self, i: usize, j: usize, value: NonTerminal) {
        self.table[i][j].insert(value);
    }

    pub fn is_word_in_language(&self) -> bool {
        match self.table.len() {
            0 => self.accepts_empty_word,
            n => self.table[0][n - 1].contains(&self.start_symbol),
        }
    }
}

impl Display for CykTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let word = Word::new(self.word.iter().cloned());
        writeln!(f, "CYK Table for word \"{}\":", word)?;

        if !self.table.is_empty() {
            let mut builder = Builder::default();

            for (i, row) in self.table.iter().enumerate() {
                builder.push_record(row.iter().enumerate().map(|(j, s)| {
                    if j >= i {
                        format!(
                            "V_{},{} = {}",
                            i + 1,
                            j + 1,
                            if s.is_empty() {
                                "∅".to_string()
                            } else {
                                format!("{{{}}}", s.iter().join(", "))
                            }
                        )
                    } else {
                        String::new()
                    }
                }));
            }

            builder.insert_record(0, (1..=self.table.len()).map(|j| format!("j = {}", j)));
            builder.insert_column(
                0,
                std::iter::once(String::new())
                    .chain((1..=self.table.len()).map(|i| format!("i = {}", i))),
            );

            let mut table = builder.build();
            table.with(Style::rounded());

            writeln!(f, "{}", table)?;
        }

        writeln!(
            f,
            "The word \"{}\" is {} in the language defined by the grammar.",
            word,
            if self.is_word_in_language() {
                "accepted"
            } else {
                "not accepted"
            },
        )
    }
}
