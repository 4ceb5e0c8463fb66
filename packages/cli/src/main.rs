use std::{fmt::Display, fs, io, path::PathBuf, process::ExitCode};

use chomsky::{
    grammars::types::ProductionWord, CnfWord, ContextFreeGrammar, Grammar, NormalizationConfig,
    Normalizer, ProductionSymbol, Stage, Terminal, Word,
};
use clap::{ArgAction, Parser, ValueEnum};
use enumflags2::BitFlags;
use log::{info, LevelFilter};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Grammar(#[from] chomsky::Error),

    #[error("cannot write {}: {source}", path.display())]
    Output { path: PathBuf, source: io::Error },
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Grammar(e) if e.is_input_error() => 1,
            CliError::Grammar(_) => 2,
            CliError::Output { .. } => 3,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ShownStage {
    Epsilon,
    Unit,
    Productivity,
    Accessibility,
    Normalization,
}

impl From<ShownStage> for Stage {
    fn from(stage: ShownStage) -> Self {
        match stage {
            ShownStage::Epsilon => Stage::Epsilon,
            ShownStage::Unit => Stage::Unit,
            ShownStage::Productivity => Stage::Productivity,
            ShownStage::Accessibility => Stage::Accessibility,
            ShownStage::Normalization => Stage::Normalization,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Formal,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Formal => write!(f, "formal"),
        }
    }
}

/// Converts a context-free grammar into Chomsky normal form
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the grammar file
    #[arg(value_name = "GRAMMAR_FILE")]
    grammar_file: PathBuf,

    /// Only parse and validate the grammar
    #[arg(long)]
    validate: bool,

    /// Keep the empty word when the start symbol is nullable
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    keep_empty_word: bool,

    /// Prefix of generated non-terminals
    #[arg(long, value_name = "PREFIX", default_value = "_")]
    prefix: String,

    /// Also print the grammar produced by these stages
    #[arg(long, value_name = "STAGE", value_delimiter = ',')]
    show: Vec<ShownStage>,

    #[arg(long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the converted grammar to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Run the CYK algorithm on a word whose symbols are separated by whitespace
    #[arg(long, value_name = "WORD")]
    accepts: Vec<String>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn render<R, G>(grammar: &G, format: OutputFormat) -> String
where
    R: ProductionWord,
    G: Grammar<R> + Display,
{
    match format {
        OutputFormat::Text => grammar.to_string(),
        OutputFormat::Formal => grammar.definition(),
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let grammar = ContextFreeGrammar::from_file(&cli.grammar_file)?;
    info!(
        "loaded {} productions from {}",
        grammar.production_count(),
        cli.grammar_file.display()
    );

    if cli.validate {
        println!(
            "{} is a valid context-free grammar ({} non-terminals, {} terminals, {} productions)",
            cli.grammar_file.display(),
            grammar.non_terminals().len(),
            grammar.terminals().len(),
            grammar.production_count()
        );
        return Ok(());
    }

    let normalizer = Normalizer::new(NormalizationConfig {
        keep_empty_word: cli.keep_empty_word,
        generated_prefix: cli.prefix.clone(),
        record: cli
            .show
            .iter()
            .map(|&stage| Stage::from(stage))
            .collect::<BitFlags<Stage>>(),
    });

    let normalization = normalizer.normalize(&grammar)?;

    for (stage, step) in &normalization.steps {
        println!("# after {stage}\n{}", render::<Word<ProductionSymbol>, _>(step, cli.format));
    }

    let output = render::<CnfWord, _>(&normalization.grammar, cli.format);
    match &cli.output {
        Some(path) => {
            fs::write(path, output).map_err(|source| CliError::Output {
                path: path.clone(),
                source,
            })?;
            info!("wrote {}", path.display());
        }
        None => print!("{output}"),
    }

    for word in &cli.accepts {
        let word = word.split_whitespace().map(Terminal::new).collect::<Vec<_>>();
        println!("\n{}", normalization.grammar.cyk(&word));
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
