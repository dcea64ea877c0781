use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use engine::{Application, ComponentRef, Origin};
use std::fs;
use std::path::Path;

/// Supported renderings of the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Dot,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "dot" => Ok(Format::Dot),
            _ => Err("invalid format".into()),
        }
    }
}

pub fn render(app: &Application, fmt: Format) -> Result<String> {
    let tree = app.components();
    match fmt {
        Format::Text => Ok(tree.to_text()),
        Format::Json => tree.to_json().context("failed to serialize components"),
        Format::Dot => Ok(tree.to_dot()),
    }
}

/// Writes to `output` when given, stdout otherwise.
pub fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{rendered}");
            if !rendered.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

fn origin_label(app: &Application, origin: Origin) -> String {
    match origin {
        Origin::Application => "application".to_string(),
        Origin::Library(i) => format!("library {}", app.libraries()[i].coordinates()),
    }
}

/// One lookup hit: kind, qualified name, origin, then one attribute per line.
pub fn describe(app: &Application, coordinate: &str, found: ComponentRef) -> String {
    let component = app.get(found);
    let mut out = format!(
        "{} {} {} ({})\n",
        coordinate.bright_white().bold(),
        component.kind.label().bright_cyan(),
        app.get_qualified_name(found),
        origin_label(app, found.origin).dimmed()
    );
    if let Some(sig) = &component.signature {
        out.push_str(&format!("    signature {sig}\n"));
    }
    for attribute in component.attributes() {
        out.push_str(&format!("    {attribute}\n"));
    }
    out
}

pub fn describe_missing(coordinate: &str) -> String {
    format!("{} {}\n", coordinate.bright_white().bold(), "not found".bright_red())
}
