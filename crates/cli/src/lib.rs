//! Building blocks of the `symtree` command line: argument parsing,
//! configuration, path exclusion and output rendering.
use regex::Regex;
use std::path::Path;

pub mod analyze;
pub mod args;
pub mod config;
pub mod output;
pub mod ui;

/// Converts a basic glob pattern to an anchored regular expression.
///
/// # Example
///
/// ```
/// use symtree::glob_to_regex;
/// let re = glob_to_regex("src/*.java").unwrap();
/// assert!(re.is_match("src/Main.java"));
/// assert!(!re.is_match("src/app/Main.java"));
/// ```
pub fn glob_to_regex(pat: &str) -> Result<Regex, String> {
    if pat.contains(['[', ']']) {
        return Err(format!("character classes are not supported: {pat}"));
    }
    // `**` may cross directory separators, a single `*` may not.
    let within = |part: &str| -> String {
        part.split('*')
            .map(|s| s.split('?').map(regex::escape).collect::<Vec<_>>().join("."))
            .collect::<Vec<_>>()
            .join("[^/]*")
    };
    let body = pat.split("**").map(within).collect::<Vec<_>>().join(".*");
    Regex::new(&format!("^{body}$")).map_err(|e| e.to_string())
}

/// Transforms a glob-style exclusion string into [`Regex`].
/// A trailing slash excludes everything below the directory.
///
/// # Example
///
/// ```
/// use symtree::parse_exclude;
/// let re = parse_exclude("generated/").unwrap();
/// assert!(re.is_match("generated/a/B.java"));
/// ```
pub fn parse_exclude(s: &str) -> Result<Regex, String> {
    let glob_str = if s.ends_with('/') {
        format!("{s}**")
    } else {
        s.to_string()
    };
    glob_to_regex(&glob_str)
}

/// VCS metadata and the usual build output directories.
pub fn default_excludes() -> Vec<Regex> {
    ["**/.git/**", "**/target/**", "**/build/**", "**/out/**"]
        .iter()
        .filter_map(|p| parse_exclude(p).ok())
        .collect()
}

/// Separators are normalised so patterns match on Windows too.
///
/// # Example
///
/// ```
/// use symtree::{is_excluded, parse_exclude};
/// use std::path::Path;
/// let patterns = vec![parse_exclude("**/gen/**").unwrap()];
/// assert!(is_excluded(Path::new("/repo/gen/A.java"), &patterns));
/// assert!(!is_excluded(Path::new("/repo/src/A.java"), &patterns));
/// ```
pub fn is_excluded(path: &Path, patterns: &[Regex]) -> bool {
    let path_str = path.to_string_lossy().replace('\\', "/");
    patterns.iter().any(|re| re.is_match(&path_str))
}
