#![no_main]
use engine::{run, EngineConfig};
use libfuzzer_sys::fuzz_target;
use parsers::{parse_java, ParseStrategy};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(unit) = parse_java(s, "Fuzz.java", ParseStrategy::Tolerant) {
            let app = run(&[unit], EngineConfig::default(), Vec::new());
            assert!(app.components().is_consistent());
        }
    }
});
