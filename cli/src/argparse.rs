use clap::{Args, Parser, Subcommand};
use sieve_cli::render::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sieve",
    about = "Compile filter queries into parameterized SQL",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Log debug output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Pick which subcommand to use
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the tokens of a query
    Lex(LexArgs),
    /// Print the parsed expression tree of a query
    Parse(ParseArgs),
    /// Compile a query into a SQL fragment and its bound values
    Compile(CompileArgs),
}

#[derive(Args)]
pub struct LexArgs {
    /// Filter query, e.g. 'name=max AND age>10'
    pub query: String,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Print the tree as JSON
    #[arg(long)]
    pub json: bool,

    /// Filter query, e.g. 'name=max AND age>10'
    pub query: String,
}

#[derive(Args)]
pub struct CompileArgs {
    /// Field configuration (YAML or JSON), defaults to $SIEVE_CONFIG
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Use $1, $2, ... placeholders instead of ?
    #[arg(long)]
    pub numbered: bool,

    /// Number of values already bound before this fragment
    #[arg(long, requires = "numbered")]
    pub offset: Option<usize>,

    /// Filter query, e.g. 'name=max AND age>10'
    pub query: String,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
