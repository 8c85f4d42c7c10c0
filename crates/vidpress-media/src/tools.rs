// crates/vidpress-media/src/tools.rs
//
// External binary discovery. An explicit env override always wins so users
// with several ffmpeg builds installed can pin the one they mean; otherwise
// the tools resolve from PATH.

use std::path::PathBuf;

use vidpress_core::{Error, Result};

/// Explicit path to the ffmpeg binary.
pub const FFMPEG_ENV: &str = "VIDPRESS_FFMPEG";
/// Explicit path to the ffprobe binary.
pub const FFPROBE_ENV: &str = "VIDPRESS_FFPROBE";

pub fn ffmpeg_path() -> Result<PathBuf> {
    resolve("ffmpeg", FFMPEG_ENV)
}

pub fn ffprobe_path() -> Result<PathBuf> {
    resolve("ffprobe", FFPROBE_ENV)
}

fn resolve(tool: &str, env_key: &str) -> Result<PathBuf> {
    if let Ok(explicit) = std::env::var(env_key) {
        let path = PathBuf::from(&explicit);
        if path.is_file() {
            tracing::debug!(tool, path = %path.display(), "using {} override", env_key);
            return Ok(path);
        }
        // An override that points nowhere is a configuration error, not a
        // reason to silently fall through to a different binary.
        tracing::warn!(tool, "{} is set but '{}' is not a file", env_key, explicit);
        return Err(Error::ToolNotFound {
            tool:     tool.to_string(),
            env_hint: env_key.to_string(),
        });
    }

    which::which(tool).map_err(|_| Error::ToolNotFound {
        tool:     tool.to_string(),
        env_hint: env_key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_reports_its_env_hint() {
        let err = resolve("vidpress-no-such-tool", "VIDPRESS_NO_SUCH_TOOL").unwrap_err();
        match err {
            Error::ToolNotFound { tool, env_hint } => {
                assert_eq!(tool, "vidpress-no-such-tool");
                assert_eq!(env_hint, "VIDPRESS_NO_SUCH_TOOL");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn env_override_must_point_at_a_file() {
        std::env::set_var("VIDPRESS_TEST_TOOL", "/definitely/not/a/file");
        let err = resolve("ffmpeg", "VIDPRESS_TEST_TOOL").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
        std::env::remove_var("VIDPRESS_TEST_TOOL");
    }

    #[test]
    fn env_override_accepts_a_real_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::env::set_var("VIDPRESS_TEST_TOOL_OK", file.path());
        let resolved = resolve("ffmpeg", "VIDPRESS_TEST_TOOL_OK").unwrap();
        assert_eq!(resolved, file.path());
        std::env::remove_var("VIDPRESS_TEST_TOOL_OK");
    }
}
