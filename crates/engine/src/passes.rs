//! Two-pass driver: every unit is walked with [`Phase::Declaration`], then
//! every unit again with [`Phase::Structure`]. Each file's tree is merged
//! into the application before the next file is walked.

use anyhow::Result;
use ir::ast::CompilationUnit;
use ir::Library;
use loader::SourceFile;
use parsers::{parse_java_with_fallback, ParseStrategy, ParserMetrics};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::application::Application;
use crate::builder::{build_component_tree, Phase};
use crate::context::ParsingContext;
use crate::debug::{emit, DebugEvent};
use crate::EngineConfig;

pub struct Analyzer {
    application: Application,
    context: ParsingContext,
}

impl Analyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            application: Application::new(config),
            context: ParsingContext::default(),
        }
    }

    pub fn with_libraries(config: EngineConfig, libraries: impl IntoIterator<Item = Library>) -> Self {
        let mut analyzer = Self::new(config);
        for library in libraries {
            analyzer.register_library(library);
        }
        analyzer
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    /// Libraries must be registered before the first pass runs.
    pub fn register_library(&mut self, library: Library) -> bool {
        self.application.add_library(library)
    }

    pub fn set_revision_id(&mut self, revision_id: impl Into<String>) {
        let revision_id = revision_id.into();
        self.application.set_revision_id(revision_id.clone());
        self.context = ParsingContext::new(Some(revision_id));
    }

    /// Walks and merges every unit once, in order.
    pub fn run_pass(&mut self, phase: Phase, units: &[CompilationUnit]) {
        let started = Instant::now();
        emit(|| DebugEvent::PassStart {
            phase,
            files: units.len(),
        });
        for (idx, unit) in units.iter().enumerate() {
            let file_started = Instant::now();
            let tree = build_component_tree(&self.application, phase, &mut self.context, unit);
            emit(|| DebugEvent::FileWalked {
                phase,
                file: unit.source_name.clone(),
                components: tree.len() - 1,
            });
            self.application.merge_with_application(&tree);
            emit(|| DebugEvent::Merged {
                phase,
                file: unit.source_name.clone(),
                total_components: self.application.components().len() - 1,
            });
            debug!(
                pass = %phase,
                file = %unit.source_name,
                index = idx + 1,
                total = units.len(),
                elapsed_ms = file_started.elapsed().as_millis() as u64,
                "Executed pass on file"
            );
        }
        self.context.full_reset();
        info!(
            pass = %phase,
            files = units.len(),
            components = self.application.components().len() - 1,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pass complete"
        );
    }

    pub fn run(mut self, units: &[CompilationUnit]) -> Application {
        for phase in Phase::ALL {
            self.run_pass(phase, units);
        }
        self.application
    }
}

/// Runs both passes over already parsed units.
///
/// # Example
/// ```
/// use engine::{run, EngineConfig};
/// let unit = parsers::parse_java("package p; class A { }", "A.java", parsers::ParseStrategy::Strict).unwrap();
/// let app = run(&[unit], EngineConfig::default(), Vec::new());
/// assert!(app.find_component_by_unique_coordinate("p.A").is_some());
/// ```
pub fn run(units: &[CompilationUnit], config: EngineConfig, libraries: Vec<Library>) -> Application {
    Analyzer::with_libraries(config, libraries).run(units)
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct AnalysisSummary {
    /// Files handed in, parsed or not.
    pub files: usize,
    /// Application components, the root excluded.
    pub components: usize,
    pub libraries: usize,
    pub revision_id: String,
    pub elapsed_ms: u128,
    pub parser: ParserMetrics,
}

type Parsed = ((SourceFile, CompilationUnit), ParseStrategy);

/// Reads and parses `paths` in parallel, then runs both passes over the
/// files that parsed. Unreadable or unparseable files are logged and skipped.
pub fn analyze_files(
    paths: &[PathBuf],
    config: EngineConfig,
    libraries: Vec<Library>,
) -> (Application, AnalysisSummary) {
    let started = Instant::now();
    let parsed: Vec<Result<Parsed>> = paths
        .par_iter()
        .map(|path| {
            let source = loader::read_source(path)?;
            let (unit, strategy) =
                parse_java_with_fallback(&source.content, &path.to_string_lossy())?;
            Ok(((source, unit), strategy))
        })
        .collect();

    let mut metrics = ParserMetrics::default();
    let mut sources = Vec::with_capacity(paths.len());
    let mut units = Vec::with_capacity(paths.len());
    for (path, outcome) in paths.iter().zip(parsed) {
        metrics.record(&outcome);
        match outcome {
            Ok(((source, unit), _)) => {
                sources.push(source);
                units.push(unit);
            }
            Err(e) => {
                error!(file = %path.display(), error = %format!("{e:#}"), "Skipping file");
                emit(|| DebugEvent::ParseFailed {
                    path: path.clone(),
                    error: format!("{e:#}"),
                });
            }
        }
    }
    info!(
        files = paths.len(),
        parsed = units.len(),
        retried = metrics.retried,
        skipped = metrics.parse_errors,
        "Sources parsed"
    );

    let revision_id = loader::revision_id(&sources);
    let mut analyzer = Analyzer::with_libraries(config, libraries);
    analyzer.set_revision_id(revision_id.clone());
    let application = analyzer.run(&units);

    let summary = AnalysisSummary {
        files: paths.len(),
        components: application.components().len() - 1,
        libraries: application.libraries().len(),
        revision_id,
        elapsed_ms: started.elapsed().as_millis(),
        parser: metrics,
    };
    (application, summary)
}
