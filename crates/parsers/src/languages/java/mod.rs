//! Java front end: tree-sitter-java parse followed by declaration lowering.

use anyhow::{anyhow, bail, Context, Result};
use ir::CompilationUnit;
use serde::Serialize;
use tracing::{debug, warn};

mod lower;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseStrategy {
    /// Rejects any tree containing error or missing nodes.
    Strict,
    /// Lowers whatever survives around error nodes. Slower to get right and
    /// less precise, so it only runs after a strict failure.
    Tolerant,
}

/// Parses `content` with the given strategy.
///
/// # Example
/// ```
/// use parsers::{parse_java, ParseStrategy};
/// let unit = parse_java("package a; class A {}", "A.java", ParseStrategy::Strict).unwrap();
/// assert_eq!(unit.types[0].name, "A");
/// assert!(parse_java("class {", "B.java", ParseStrategy::Strict).is_err());
/// ```
pub fn parse_java(content: &str, source_name: &str, strategy: ParseStrategy) -> Result<CompilationUnit> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(tree_sitter_java::language())
        .context("load java grammar")?;
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| anyhow!("no syntax tree produced for {source_name}"))?;
    let root = tree.root_node();
    let has_errors = root.has_error() || root.is_error();
    if has_errors && strategy == ParseStrategy::Strict {
        bail!("java source contains syntax errors: {source_name}");
    }
    let unit = lower::Lowering::new(content, strategy == ParseStrategy::Tolerant)
        .unit(root, source_name);
    if has_errors && unit.is_empty() {
        bail!("no declarations recovered from {source_name}");
    }
    debug!(
        file = source_name,
        strategy = ?strategy,
        types = unit.types.len(),
        "Java source lowered"
    );
    Ok(unit)
}

/// Parses strictly, retrying once with [`ParseStrategy::Tolerant`].
/// Returns the unit together with the strategy that produced it.
pub fn parse_java_with_fallback(
    content: &str,
    source_name: &str,
) -> Result<(CompilationUnit, ParseStrategy)> {
    match parse_java(content, source_name, ParseStrategy::Strict) {
        Ok(unit) => Ok((unit, ParseStrategy::Strict)),
        Err(e) => {
            warn!(file = source_name, error = %e, "Strict parse failed, retrying tolerant");
            let unit = parse_java(content, source_name, ParseStrategy::Tolerant)
                .with_context(|| format!("Failed to parse {source_name}"))?;
            Ok((unit, ParseStrategy::Tolerant))
        }
    }
}
