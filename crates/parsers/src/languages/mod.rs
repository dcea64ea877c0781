/// Language front ends.
///
/// Each front end exposes a `parse_<language>` function that turns source
/// text into the declaration model of the `ir` crate.
pub mod java;
pub use java::{parse_java, parse_java_with_fallback, ParseStrategy};
