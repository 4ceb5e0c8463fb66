use indexmap::IndexSet;
use log::trace;

use crate::{
    error::{Error, Result},
    grammars::{context_free::ContextFreeGrammar, types::NonTerminal},
    language::Symbol,
};

/// Characters with a meaning in the grammar text format.
const RESERVED_CHARACTERS: [char; 5] = ['|', '#', ':', '-', '→'];

/// Hands out non-terminal names that are unique within one conversion.
///
/// Names are `{prefix}{hint}{n}` with a counter `n` shared by every hint, skipping
/// anything already in use. A factory belongs to a single conversion call.
#[derive(Debug)]
pub struct SymbolFactory {
    prefix: String,
    counter: usize,
    used: IndexSet<String>,
}

impl SymbolFactory {
    pub fn new<'a>(
        prefix: impl Into<String>,
        existing: impl IntoIterator<Item = &'a Symbol>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
            used: existing
                .into_iter()
                .map(|symbol| symbol.as_str().to_owned())
                .collect(),
        }
    }

    pub fn for_grammar(prefix: impl Into<String>, grammar: &ContextFreeGrammar) -> Self {
        Self::new(prefix, grammar.symbols())
    }

    /// Rejects a prefix whose names would not read back as a single symbol.
    pub fn check_prefix(&self) -> Result<()> {
        match self
            .prefix
            .chars()
            .find(|c| c.is_whitespace() || RESERVED_CHARACTERS.contains(c))
        {
            Some(character) => Err(Error::InvalidPrefix {
                prefix: self.prefix.clone(),
                character,
            }),
            None => Ok(()),
        }
    }

    /// Rejects user symbols that start with the reserved prefix.
    pub fn check_reserved(&self, grammar: &ContextFreeGrammar) -> Result<()> {
        if self.prefix.is_empty() {
            return Ok(());
        }

        match grammar
            .symbols()
            .find(|symbol| symbol.as_str().starts_with(&self.prefix))
        {
            Some(symbol) => Err(Error::SymbolCollision {
                symbol: symbol.clone(),
                prefix: self.prefix.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn fresh(&mut self, hint: &str) -> NonTerminal {
        loop {
            self.counter += 1;
            let name = format!("{}{}{}", self.prefix, hint, self.counter);

            if self.used.insert(name.clone()) {
                trace!("generated non-terminal {name}");
                return NonTerminal::new(name);
            }
        }
    }
}
