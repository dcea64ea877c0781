//! Entry point for the command-line interface.
//! Delegates to dedicated modules for argument handling, analysis and
//! configuration.

use symtree::analyze::{run_analyze, run_library, run_lookup};
use symtree::args::{parse_cli, Commands};
use symtree::config::handle_config;

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Lookup(args) => {
            if !run_lookup(args)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Library(args) => run_library(args),
        Commands::Config(cmd) => handle_config(cmd),
    }
}
