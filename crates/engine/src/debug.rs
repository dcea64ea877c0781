//! Optional observer of analysis progress, for tooling that wants more
//! than log lines (the CLI's `--events` flag, tests).

use serde::Serialize;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::builder::Phase;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DebugEvent {
    PassStart {
        phase: Phase,
        files: usize,
    },
    ParseFailed {
        path: PathBuf,
        error: String,
    },
    FileWalked {
        phase: Phase,
        file: String,
        components: usize,
    },
    Merged {
        phase: Phase,
        file: String,
        total_components: usize,
    },
}

pub trait DebugSink: Send + Sync {
    fn event(&self, event: DebugEvent);
}

/// Writes each event as one JSON line to stderr.
pub struct StderrSink;

impl DebugSink for StderrSink {
    fn event(&self, event: DebugEvent) {
        if let Ok(line) = serde_json::to_string(&event) {
            eprintln!("{line}");
        }
    }
}

static DEBUG_SINK: RwLock<Option<Box<dyn DebugSink>>> = RwLock::new(None);

/// Installs (or with `None` removes) the process-wide sink.
pub fn set_debug_sink(sink: Option<Box<dyn DebugSink>>) {
    *DEBUG_SINK.write().expect("debug sink lock poisoned") = sink;
}

/// The event is only built when a sink is installed.
pub(crate) fn emit<F>(make: F)
where
    F: FnOnce() -> DebugEvent,
{
    if let Some(s) = DEBUG_SINK
        .read()
        .expect("debug sink lock poisoned")
        .as_ref()
    {
        s.event(make());
    }
}
