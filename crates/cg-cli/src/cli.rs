//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// contextgraph - validate context documents, resolve joins, and generate SQL
#[derive(Parser, Debug)]
#[command(name = "cg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Resolver config file (default: contextgraph.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// External dataset id used when headerless text declares no datasets
    #[arg(long, global = true)]
    pub default_dataset: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a context document and print its contents
    Parse(ParseArgs),

    /// Validate a context document against a dataset catalog
    Validate(ValidateArgs),

    /// Find join paths between datasets
    Path(PathArgs),

    /// Generate SQL joining datasets of a context
    Query(QueryArgs),

    /// Search the business glossary
    Glossary(GlossaryArgs),

    /// Rewrite a context document in canonical form
    Fmt(FmtArgs),
}

/// Output formats shared by reporting commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Context document to parse
    pub file: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Context document to validate
    pub file: String,

    /// YAML list of catalog entries (id, owner, columns)
    #[arg(long)]
    pub catalog: Option<String>,

    /// Owner the datasets must belong to (default: the document's owner)
    #[arg(long)]
    pub owner: Option<String>,

    /// Fail on warnings as well as errors
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the path command
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Context document declaring the relationships
    pub file: String,

    /// Local dataset ids to connect (first is the starting point)
    #[arg(required = true, num_args = 2..)]
    pub datasets: Vec<String>,

    /// Rank alternative join strategies instead of returning one path
    #[arg(long)]
    pub suggest: bool,

    /// Override the maximum number of joins per search
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Context document declaring the datasets
    pub file: String,

    /// Local dataset ids to join (default: the first declared dataset)
    pub datasets: Vec<String>,

    /// Select items or metric ids (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Raw WHERE condition (repeatable)
    #[arg(short, long = "where")]
    pub where_clauses: Vec<String>,

    /// Named filter as `id` or `id:param=value,...` (repeatable)
    #[arg(short, long)]
    pub filter: Vec<String>,

    /// GROUP BY columns (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub group_by: Vec<String>,

    /// ORDER BY items (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub order_by: Vec<String>,

    /// Row limit
    #[arg(short, long)]
    pub limit: Option<u64>,
}

/// Arguments for the glossary command
#[derive(Args, Debug)]
pub struct GlossaryArgs {
    /// Context documents whose glossaries are searched
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Case-insensitive term or synonym to search for (default: list all)
    #[arg(short, long)]
    pub term: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the fmt command
#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Context document to format
    pub file: String,

    /// Write the result back to the file instead of printing it
    #[arg(short, long)]
    pub write: bool,

    /// Exit non-zero if the file is not already in canonical form
    #[arg(long, conflicts_with = "write")]
    pub check: bool,

    /// Publish as a new semantic version
    #[arg(long)]
    pub set_version: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
