// ABOUTME: User-facing feedback for deploy, uninstall, and status runs.
// ABOUTME: Human text, a quiet CI mode, or JSON lines tagged with the bundle name.

use serde::Serialize;
use std::time::Instant;

use crate::types::BundleName;

/// How results reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Step-by-step progress plus the result.
    Normal,
    /// Only the result line, for build pipelines.
    Quiet,
    /// One JSON object per line for scripts.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Success,
    Warning,
    Error,
    Result,
}

impl EventKind {
    fn as_str(self) -> &'static str {
        match self {
            EventKind::Success => "success",
            EventKind::Warning => "warning",
            EventKind::Error => "error",
            EventKind::Result => "result",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, EventKind::Warning | EventKind::Error)
    }
}

/// One JSON line. `result` carries a serialized outcome or bundle record.
#[derive(Serialize)]
struct JsonLine<'a, T: Serialize> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bundle: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

/// Feedback sink for one CLI run.
#[derive(Debug)]
pub struct Output {
    mode: OutputMode,
    bundle: Option<String>,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            bundle: None,
            start_time: None,
        }
    }

    /// Tag JSON lines with the bundle being worked on.
    pub fn with_bundle(mut self, bundle: &BundleName) -> Self {
        self.bundle = Some(bundle.to_string());
        self
    }

    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Seconds since `start_timer`, or 0 if it was never called.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// A step of the console sequence. Normal mode only.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// The run finished; normal mode appends the elapsed time.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal if self.elapsed_secs() > 0.0 => {
                println!("{message} ({:.1}s)", self.elapsed_secs());
            }
            OutputMode::Normal | OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.emit::<()>(EventKind::Success, Some(message), None),
        }
    }

    /// Something the user should know about that did not fail the run.
    /// Dropped in quiet mode.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit::<()>(EventKind::Warning, Some(message), None),
        }
    }

    /// The outcome of the run: `summary` as text, or `value` as JSON.
    pub fn report<T: Serialize>(&self, summary: &str, value: &T) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("{summary}"),
            OutputMode::Json => self.emit(EventKind::Result, None, Some(value)),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.emit::<()>(EventKind::Error, Some(message), None),
        }
    }

    fn emit<T: Serialize>(&self, kind: EventKind, message: Option<&str>, result: Option<&T>) {
        let Some(json) = self.render(kind, message, result) else {
            return;
        };
        if kind.to_stderr() {
            eprintln!("{json}");
        } else {
            println!("{json}");
        }
    }

    fn render<T: Serialize>(
        &self,
        kind: EventKind,
        message: Option<&str>,
        result: Option<&T>,
    ) -> Option<String> {
        let line = JsonLine {
            event: kind.as_str(),
            bundle: self.bundle.as_deref(),
            message,
            result,
            duration_secs: match kind {
                EventKind::Success | EventKind::Error => self.duration(),
                EventKind::Warning | EventKind::Result => None,
            },
        };
        serde_json::to_string(&line).ok()
    }
}
