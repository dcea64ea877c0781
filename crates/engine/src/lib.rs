//! Symbol-table engine for Java sources.
//!
//! Every compilation unit is walked twice by the tree builder
//! ([`Phase::Declaration`], then [`Phase::Structure`]). Each walk produces a
//! file-scoped component tree that is merged into the [`Application`]
//! right away, so the second pass can resolve supertypes declared in any
//! file, or in a registered [`Library`](ir::Library).

use serde::{Deserialize, Serialize};

pub mod application;
pub mod builder;
pub mod context;
pub mod debug;
pub mod java;
mod passes;

pub use application::{qualified_name, Application, ComponentRef, Origin};
pub use builder::{build_component_tree, init_parsing_context, Phase};
pub use context::ParsingContext;
pub use debug::{set_debug_sink, DebugEvent, DebugSink, StderrSink};
pub use passes::{analyze_files, run, AnalysisSummary, Analyzer};

fn default_unique_delimiter() -> String {
    ".".to_string()
}

fn default_nested_type_separator() -> String {
    "$".to_string()
}

fn default_package() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Joins component values into unique coordinates.
    #[serde(default = "default_unique_delimiter")]
    pub unique_delimiter: String,
    /// Joins a nested type to its enclosing type in qualified names.
    #[serde(default = "default_nested_type_separator")]
    pub nested_type_separator: String,
    /// Package of files without a package declaration.
    #[serde(default = "default_package")]
    pub default_package: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unique_delimiter: default_unique_delimiter(),
            nested_type_separator: default_nested_type_separator(),
            default_package: default_package(),
        }
    }
}

