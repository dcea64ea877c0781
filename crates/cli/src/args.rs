use clap::{Args as ClapArgs, Parser, Subcommand};
use regex::Regex;
use std::path::PathBuf;

use crate::output::Format;

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn parse_threads(s: &str) -> Result<usize, String> {
    let v: usize = s
        .parse()
        .map_err(|e: std::num::ParseIntError| e.to_string())?;
    if v == 0 {
        Err("threads must be greater than 0".into())
    } else {
        Ok(v)
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "symtree - two-pass symbol tables for Java source trees",
    long_about = "symtree walks every Java compilation unit of a source tree twice. The first pass \
declares packages, types and members; the second resolves supertypes and type-parameter bounds \
against everything declared in the first. The result is one hierarchical symbol table that can be \
printed, queried by coordinate, or saved as a library for later runs.

Examples:
  symtree analyze src/                        # Print the symbol table as text
  symtree analyze src/ --format json          # Machine-readable output
  symtree lookup src/ com.acme.Service        # Resolve a unique coordinate
  symtree library vendor/ --group g --artifact a --version 1.0 --output a.json",
    subcommand_required = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Show version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    #[command(subcommand)]
    pub command: Commands,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the symbol table of a source tree and print it
    Analyze(AnalyzeArgs),
    /// Resolve unique coordinates against a source tree
    Lookup(LookupArgs),
    /// Analyze a source tree and save it as a library
    Library(LibraryArgs),
    /// Show or initialise the configuration file
    #[command(subcommand)]
    Config(ConfigCmd),
}

#[derive(ClapArgs, Clone, Default)]
pub struct LogArgs {
    /// Only print errors
    #[arg(long)]
    pub quiet: bool,
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
    /// Log filter directives (e.g. `engine=debug`), overrides --quiet/--debug
    #[arg(long = "log-filter")]
    pub log_filter: Option<String>,
}

#[derive(ClapArgs)]
pub struct SourceArgs {
    /// Java source file or directory
    pub path: PathBuf,
    /// Library JSON files to register before the passes run
    #[arg(long = "library")]
    pub libraries: Vec<PathBuf>,
    /// Exclude paths matching these glob patterns
    #[arg(long, value_parser = crate::parse_exclude, value_delimiter = ',')]
    pub exclude: Vec<Regex>,
    /// Don't use default exclusion patterns
    #[arg(long)]
    pub no_default_excludes: bool,
    /// Number of threads used to parse sources
    #[arg(long, default_value_t = default_threads(), value_parser = parse_threads)]
    pub threads: usize,
}

#[derive(ClapArgs)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output format of the symbol table
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// Write the symbol table to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Print analysis events as JSON lines on stderr
    #[arg(long)]
    pub events: bool,
    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(ClapArgs)]
pub struct LookupArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Unique coordinates to resolve, e.g. `com.acme.Service.run`
    #[arg(required = true)]
    pub coordinates: Vec<String>,
    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(ClapArgs)]
pub struct LibraryArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Group id of the library
    #[arg(long)]
    pub group: String,
    /// Artifact id of the library
    #[arg(long)]
    pub artifact: String,
    /// Version of the library
    #[arg(long)]
    pub version: String,
    /// Where to write the library JSON
    #[arg(long)]
    pub output: PathBuf,
    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file if none exists
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_threads_rejects_zero() {
        assert!(parse_threads("0").is_err());
        assert!(parse_threads("x").is_err());
        assert_eq!(parse_threads("4"), Ok(4));
    }

    #[test]
    fn lookup_takes_path_then_coordinates() {
        let cli = Cli::try_parse_from(["symtree", "lookup", "src", "a.B", "a.C", "--quiet"]).unwrap();
        let Commands::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert_eq!(args.source.path, PathBuf::from("src"));
        assert_eq!(args.coordinates, vec!["a.B", "a.C"]);
        assert!(args.log.quiet);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
