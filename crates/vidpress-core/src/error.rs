// crates/vidpress-core/src/error.rs
//
// One error enum for the whole pipeline. Validation failures surface before
// any subprocess is spawned; runner failures carry the exit code and a tail
// of the child's stderr so the operator can act without re-running.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Trimming `seconds_to_cut` from the end would leave nothing to encode.
    #[error("cannot cut {seconds_to_cut}s from a {duration_secs}s video: clip duration must stay above zero")]
    InvalidDuration {
        duration_secs: f64,
        seconds_to_cut: f64,
    },

    /// A resolution tier string outside the fixed low/medium/high set.
    #[error("unknown resolution tier '{0}' (expected low, medium, or high)")]
    InvalidResolution(String),

    /// The external executable was not found via env override or PATH.
    #[error("'{tool}' not found: set {env_hint} or install it on PATH")]
    ToolNotFound { tool: String, env_hint: String },

    /// The executable exists but the OS refused to start it.
    #[error("failed to launch '{tool}': {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The child process ran and exited non-zero.
    #[error("'{tool}' exited with {}:\n{stderr_tail}", display_exit(.code))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr_tail: String,
    },

    /// ffprobe ran but its metadata was missing, unreadable, or malformed.
    #[error("could not probe '{}': {reason}", path.display())]
    Probe { path: PathBuf, reason: String },

    /// Input size of zero bytes makes the compression ratio meaningless.
    #[error("input file size is zero bytes, nothing to compare against")]
    DegenerateInput,

    /// The job was cancelled and the child process terminated.
    #[error("transcode cancelled")]
    Cancelled,
}

fn display_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (killed by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failure_renders_code_and_tail() {
        let err = Error::ToolFailed {
            tool:        "ffmpeg".to_string(),
            code:        Some(1),
            stderr_tail: "Unknown encoder 'libx265'".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("status 1"));
        assert!(text.contains("Unknown encoder"));
    }

    #[test]
    fn signal_death_has_no_status() {
        let err = Error::ToolFailed {
            tool:        "ffmpeg".to_string(),
            code:        None,
            stderr_tail: String::new(),
        };
        assert!(err.to_string().contains("killed by signal"));
    }

    #[test]
    fn duration_error_carries_both_numbers() {
        let err = Error::InvalidDuration { duration_secs: 10.0, seconds_to_cut: 12.5 };
        let text = err.to_string();
        assert!(text.contains("12.5"));
        assert!(text.contains("10"));
    }
}
