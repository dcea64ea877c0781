use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::args::{AnalyzeArgs, LibraryArgs, LogArgs, LookupArgs, SourceArgs};
use crate::config::{config_dir, load_config, Config};
use crate::output;
use crate::{default_excludes, is_excluded, ui};

use engine::{analyze_files, AnalysisSummary, Application, StderrSink};
use ir::Library;

pub fn init_logging(log: &LogArgs) {
    if let Some(filter) = &log.log_filter {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        return;
    }
    let level = if log.quiet {
        LevelFilter::ERROR
    } else if log.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    if log.debug && !log.quiet {
        debug!("Debug mode enabled");
    }
}

fn init_colors() {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Java sources below `args.path`, exclusions applied.
pub fn discover(args: &SourceArgs) -> Result<Vec<PathBuf>> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", args.path.display()))?;
    let mut patterns = args.exclude.clone();
    if !args.no_default_excludes {
        patterns.extend(default_excludes());
    }
    let excludes = |p: &Path| is_excluded(p, &patterns);
    let accept = |p: &Path| parsers::detect_type(p) == Some("java");
    let files = loader::collect_sources(&root, &excludes, &accept)?;
    info!(target = %root.display(), files = files.len(), "Sources discovered");
    Ok(files)
}

/// Configured libraries first, then the ones given on the command line.
fn libraries(config: &Config, extra: &[PathBuf]) -> Result<Vec<Library>> {
    let mut paths: Vec<PathBuf> = config
        .libraries
        .paths
        .iter()
        .map(|p| {
            if p.is_relative() {
                config_dir().join(p)
            } else {
                p.clone()
            }
        })
        .collect();
    paths.extend(extra.iter().cloned());
    let libraries = loader::load_libraries(&paths)?;
    if !libraries.is_empty() {
        info!(count = libraries.len(), "Libraries loaded");
    }
    Ok(libraries)
}

fn build(source: &SourceArgs) -> Result<(Application, AnalysisSummary)> {
    let config = load_config().context("failed to load configuration")?;
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(source.threads)
        .build_global()
    {
        error!("Failed to build global thread pool: {e}");
    }
    let files = discover(source)?;
    let libraries = libraries(&config, &source.libraries)?;
    Ok(analyze_files(&files, config.analysis, libraries))
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    init_logging(&args.log);
    init_colors();
    if !args.log.quiet {
        ui::print_header();
    }
    if args.events {
        engine::set_debug_sink(Some(Box::new(StderrSink)));
    }
    let (app, summary) = build(&args.source)?;
    if args.events {
        engine::set_debug_sink(None);
    }

    let rendered = output::render(&app, args.format)?;
    output::emit(&rendered, args.output.as_deref())?;
    if let Some(path) = &args.output {
        info!(output = %path.display(), format = ?args.format, "Symbol table written");
    }
    if !args.log.quiet {
        ui::print_summary(&summary);
    }
    Ok(())
}

/// Prints every coordinate. Returns false when one of them is missing.
pub fn run_lookup(args: LookupArgs) -> Result<bool> {
    init_logging(&args.log);
    init_colors();
    let (app, _) = build(&args.source)?;
    let found = app.find_all_by_unique_coordinates(&args.coordinates);
    let mut all_found = true;
    for (coordinate, hit) in args.coordinates.iter().zip(found) {
        match hit {
            Some(component) => print!("{}", output::describe(&app, coordinate, component)),
            None => {
                all_found = false;
                print!("{}", output::describe_missing(coordinate));
            }
        }
    }
    Ok(all_found)
}

pub fn run_library(args: LibraryArgs) -> Result<()> {
    init_logging(&args.log);
    let (app, summary) = build(&args.source)?;
    let mut library = Library::new(
        args.group,
        args.artifact,
        args.version,
        app.components().clone(),
    );
    library.revision_id = Some(summary.revision_id.clone());
    loader::save_library(&library, &args.output)?;
    info!(
        library = %library.coordinates(),
        components = summary.components,
        output = %args.output.display(),
        "Library saved"
    );
    Ok(())
}
