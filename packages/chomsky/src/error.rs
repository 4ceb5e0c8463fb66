use std::io;

use thiserror::Error;

use crate::{
    grammars::types::{NonTerminal, ProductionSymbol},
    language::{Symbol, Word},
    normalization::Stage,
};

/// A broken grammar invariant, naming the offending symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("start symbol {0} is not a declared non-terminal")]
    UndeclaredStartSymbol(NonTerminal),

    #[error("productions are defined for {0}, which is not a declared non-terminal")]
    UndeclaredLeftHandSide(NonTerminal),

    #[error("production {lhs} → {word} references undeclared symbol {symbol}")]
    UndeclaredSymbol {
        lhs: NonTerminal,
        word: Word<ProductionSymbol>,
        symbol: ProductionSymbol,
    },

    #[error("{0} is declared both as a terminal and as a non-terminal")]
    OverlappingSymbol(Symbol),

    #[error("{0} has an empty set of productions")]
    NoAlternatives(NonTerminal),

    #[error("production {lhs} → {word} is not in Chomsky normal form")]
    NotInNormalForm {
        lhs: NonTerminal,
        word: Word<ProductionSymbol>,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("invalid grammar ({stage}): {violation}")]
    InvalidGrammar { stage: Stage, violation: Violation },

    #[error("symbol {symbol} uses the prefix {prefix:?} reserved for generated non-terminals")]
    SymbolCollision { symbol: Symbol, prefix: String },

    #[error("prefix {prefix:?} contains {character:?}, which is not allowed in a symbol")]
    InvalidPrefix { prefix: String, character: char },

    #[error("internal invariant violated after {stage}: {violation}")]
    InternalInvariant { stage: Stage, violation: Violation },
}

impl Error {
    /// Whether the error is caused by the input rather than by the conversion itself.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Error::InternalInvariant { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
