//! Conversion of context-free grammars into Chomsky normal form.
//!
//! The conversion is a fixed sequence of stages, each building a new grammar
//! from the output of the previous one:
//!
//! 1. erasing productions are removed ([`ContextFreeGrammar::eliminate_erasing_productions`]),
//! 2. unit productions are removed ([`ContextFreeGrammar::eliminate_unit_productions`]),
//! 3. unproductive and inaccessible symbols are removed until nothing changes,
//! 4. the remaining productions are brought into shape ([`ContextFreeGrammar::to_chomsky_shape`]).
//!
//! Every intermediate grammar is checked before it is handed to the next stage.

mod accessibility;
pub(crate) mod closure;
mod cnf;
mod epsilon;
mod productivity;
pub mod symbols;
mod unit;

use derive_more::Display;
use enumflags2::{bitflags, BitFlags};
use log::debug;

use crate::{
    error::{Error, Result},
    grammars::{
        chomsky_normal_form::ChomskyNormalFormGrammar, context_free::ContextFreeGrammar,
        types::Grammar,
    },
};

use self::symbols::SymbolFactory;

#[bitflags]
#[repr(u8)]
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    #[display("input")]
    Input = 0b000001,
    #[display("epsilon")]
    Epsilon = 0b000010,
    #[display("unit")]
    Unit = 0b000100,
    #[display("productivity")]
    Productivity = 0b001000,
    #[display("accessibility")]
    Accessibility = 0b010000,
    #[display("normalization")]
    Normalization = 0b100000,
}

#[derive(Debug, Clone)]
pub struct NormalizationConfig {
    /// Whether a nullable start symbol keeps its empty word.
    pub keep_empty_word: bool,
    /// Prefix of every generated non-terminal. User symbols may not start with it,
    /// and it may not contain whitespace or a character of the text format.
    pub generated_prefix: String,
    /// Stages whose output grammar is kept in [`Normalization::steps`].
    pub record: BitFlags<Stage>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            keep_empty_word: true,
            generated_prefix: "_".to_owned(),
            record: BitFlags::empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Normalization {
    pub grammar: ChomskyNormalFormGrammar,
    /// Recorded intermediate grammars in pipeline order. The pruning stages
    /// appear once per round.
    pub steps: Vec<(Stage, ContextFreeGrammar)>,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizationConfig,
}

impl Normalizer {
    pub fn new(config: NormalizationConfig) -> Self {
        Self { config }
    }

    pub fn normalize(&self, grammar: &ContextFreeGrammar) -> Result<Normalization> {
        grammar
            .validate()
            .map_err(|violation| Error::InvalidGrammar {
                stage: Stage::Input,
                violation,
            })?;

        let mut symbols = SymbolFactory::for_grammar(self.config.generated_prefix.clone(), grammar);
        symbols.check_prefix()?;
        symbols.check_reserved(grammar)?;

        log_stage(Stage::Input, grammar);

        let mut steps = Vec::new();

        let grammar = self.checked(
            Stage::Epsilon,
            grammar.eliminate_erasing_productions(self.config.keep_empty_word),
            &mut steps,
        )?;
        let grammar = self.checked(Stage::Unit, grammar.eliminate_unit_productions(), &mut steps)?;

        let grammar = grammar.prune_useless_symbols(|stage, grammar| {
            self.inspect(stage, grammar, &mut steps)
        })?;

        let grammar = self.checked(
            Stage::Normalization,
            grammar.to_chomsky_shape(&mut symbols),
            &mut steps,
        )?;

        let grammar = ChomskyNormalFormGrammar::try_from(&grammar).map_err(|violation| {
            Error::InternalInvariant {
                stage: Stage::Normalization,
                violation,
            }
        })?;

        Ok(Normalization { grammar, steps })
    }

    fn checked(
        &self,
        stage: Stage,
        grammar: ContextFreeGrammar,
        steps: &mut Vec<(Stage, ContextFreeGrammar)>,
    ) -> Result<ContextFreeGrammar> {
        self.inspect(stage, &grammar, steps)?;
        Ok(grammar)
    }

    fn inspect(
        &self,
        stage: Stage,
        grammar: &ContextFreeGrammar,
        steps: &mut Vec<(Stage, ContextFreeGrammar)>,
    ) -> Result<()> {
        grammar
            .validate()
            .map_err(|violation| Error::InternalInvariant { stage, violation })?;

        log_stage(stage, grammar);

        if self.config.record.contains(stage) {
            steps.push((stage, grammar.clone()));
        }

        Ok(())
    }
}

fn log_stage(stage: Stage, grammar: &ContextFreeGrammar) {
    debug!(
        "{stage}: {} non-terminals, {} terminals, {} productions",
        grammar.non_terminals().len(),
        grammar.terminals().len(),
        grammar.production_count()
    );
}

impl ContextFreeGrammar {
    /// Converts the grammar with the default [`NormalizationConfig`].
    pub fn to_chomsky_normal_form(&self) -> Result<ChomskyNormalFormGrammar> {
        ChomskyNormalFormGrammar::from_context_free_grammar(self)
    }
}

impl ChomskyNormalFormGrammar {
    pub fn from_context_free_grammar(grammar: &ContextFreeGrammar) -> Result<Self> {
        Ok(Normalizer::default().normalize(grammar)?.grammar)
    }
}
