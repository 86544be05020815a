//! Fetch progress reporting.
//!
//! Reports what the walker is doing during `nenamaga fetch` so a long Drive
//! scan does not look hung. Progress is emitted on **stderr** so stdout
//! stays clean for the run report.

use std::io::Write;

/// A single progress event emitted by the tree walker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchProgressEvent {
    /// A folder has been listed. `found` is the running document count.
    Scanned { path: String, found: u64 },
    /// The walk finished.
    Finished { folders: u64, documents: u64 },
}

/// Receives progress events. Implementations write to stderr (human or JSON).
pub trait FetchProgressReporter: Send + Sync {
    fn report(&self, event: FetchProgressEvent);
}

/// Human-friendly progress on stderr: "scan  Nenamaga/Grade 6  (1,234 papers)".
pub struct StderrProgress;

impl FetchProgressReporter for StderrProgress {
    fn report(&self, event: FetchProgressEvent) {
        let line = match &event {
            FetchProgressEvent::Scanned { path, found } => {
                format!("scan  {}  ({} papers)\n", path, format_number(*found))
            }
            FetchProgressEvent::Finished { folders, documents } => format!(
                "scan  done  {} folders, {} papers\n",
                format_number(*folders),
                format_number(*documents)
            ),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl FetchProgressReporter for JsonProgress {
    fn report(&self, event: FetchProgressEvent) {
        let obj = match &event {
            FetchProgressEvent::Scanned { path, found } => serde_json::json!({
                "event": "progress",
                "phase": "scanning",
                "path": path,
                "found": found
            }),
            FetchProgressEvent::Finished { folders, documents } => serde_json::json!({
                "event": "progress",
                "phase": "finished",
                "folders": folders,
                "documents": documents
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl FetchProgressReporter for NoProgress {
    fn report(&self, _event: FetchProgressEvent) {}
}

/// `1234567` → `"1,234,567"`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn FetchProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_comma() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(12_345), "12,345");
    }

    #[test]
    fn modes_build_reporters() {
        for mode in [ProgressMode::Off, ProgressMode::Human, ProgressMode::Json] {
            mode.reporter().report(FetchProgressEvent::Finished {
                folders: 0,
                documents: 0,
            });
        }
    }
}
