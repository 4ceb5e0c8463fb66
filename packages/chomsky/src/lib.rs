//! Conversion of context-free grammars into Chomsky normal form.
//!
//! ```
//! use chomsky::{ContextFreeGrammar, Grammar, Terminal};
//!
//! let grammar = ContextFreeGrammar::from_productions("S", &["S -> a S b | ε"]).unwrap();
//! let cnf = grammar.to_chomsky_normal_form().unwrap();
//!
//! let word = ["a", "a", "b", "b"].map(Terminal::new);
//! assert!(cnf.accepts(&word));
//! assert!(cnf.non_terminals().len() > 1);
//! ```

pub mod error;
pub mod grammars;
pub mod language;
pub mod normalization;

pub use error::{Error, Result, Violation};
pub use grammars::{
    chomsky_normal_form::{ChomskyNormalFormGrammar, CnfWord, CykTable},
    context_free::ContextFreeGrammar,
    types::{Grammar, NonTerminal, ProductionSymbol, Terminal, Word},
};
pub use language::Symbol;
pub use normalization::{
    symbols::SymbolFactory, Normalization, NormalizationConfig, Normalizer, Stage,
};
