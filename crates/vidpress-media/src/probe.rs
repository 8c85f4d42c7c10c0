// crates/vidpress-media/src/probe.rs
//
// Container metadata via the ffprobe CLI and its JSON writer. ffprobe prints
// every numeric field as a string, so the serde structs below are all-String
// and the conversion happens in one place.

use std::path::Path;
use std::process::{Command, Stdio};

use serde::Deserialize;

use vidpress_core::{Error, MediaInfo, Result};

use crate::tools;

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format:  Option<ProbeFormat>,
}

#[derive(Deserialize)]
struct ProbeStream {
    nb_frames:      Option<String>,
    avg_frame_rate: Option<String>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    size:     Option<String>,
}

/// Probe `path` for duration, frame count, and byte size.
///
/// Each call produces a fresh snapshot; nothing is cached.
pub fn probe(path: &Path) -> Result<MediaInfo> {
    let ffprobe = tools::ffprobe_path()?;

    let output = Command::new(&ffprobe)
        .args([
            "-v", "error",
            "-show_entries", "format=duration,size:stream=nb_frames,avg_frame_rate",
            "-of", "json",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::SpawnFailed { tool: "ffprobe".to_string(), source: e })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr.lines().last().unwrap_or("ffprobe failed").to_string();
        return Err(Error::Probe { path: path.to_path_buf(), reason });
    }

    let info = parse_probe_output(path, &output.stdout)?;
    tracing::debug!(
        path = %path.display(),
        duration_secs = info.duration_secs,
        frame_count = info.frame_count,
        size_bytes = info.size_bytes,
        "probed media file",
    );
    Ok(info)
}

/// Turn raw ffprobe JSON into a `MediaInfo`. Split out of `probe` so the
/// parsing can be tested against captured output without an ffprobe binary.
fn parse_probe_output(path: &Path, raw: &[u8]) -> Result<MediaInfo> {
    let parsed: ProbeOutput = serde_json::from_slice(raw).map_err(|e| Error::Probe {
        path:   path.to_path_buf(),
        reason: format!("unparseable ffprobe output: {e}"),
    })?;

    let format = parsed.format.ok_or_else(|| Error::Probe {
        path:   path.to_path_buf(),
        reason: "ffprobe output carries no format section".to_string(),
    })?;

    let duration_secs = field_as_f64(path, "duration", format.duration.as_deref())?;
    let size_bytes = field_as_f64(path, "size", format.size.as_deref())? as u64;

    // nb_frames is container-dependent; MKV in particular omits it. Fall back
    // to duration x average frame rate before giving up and reporting 0.
    let stream = parsed.streams.first();
    let frame_count = stream
        .and_then(|s| s.nb_frames.as_deref())
        .and_then(|n| n.parse::<u64>().ok())
        .or_else(|| {
            let rate = stream
                .and_then(|s| s.avg_frame_rate.as_deref())
                .and_then(parse_frame_rate)?;
            Some((duration_secs * rate).round() as u64)
        })
        .unwrap_or(0);

    Ok(MediaInfo { duration_secs, frame_count, size_bytes })
}

fn field_as_f64(path: &Path, name: &str, value: Option<&str>) -> Result<f64> {
    let raw = value.ok_or_else(|| Error::Probe {
        path:   path.to_path_buf(),
        reason: format!("ffprobe output is missing format.{name}"),
    })?;
    raw.parse::<f64>().map_err(|_| Error::Probe {
        path:   path.to_path_buf(),
        reason: format!("format.{name} is not numeric: '{raw}'"),
    })
}

/// ffprobe reports frame rates as a ratio like `25/1` or `30000/1001`.
fn parse_frame_rate(raw: &str) -> Option<f64> {
    let (num, den) = raw.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("clip.mp4")
    }

    #[test]
    fn full_output_parses() {
        let raw = br#"{
            "streams": [{"nb_frames": "250", "avg_frame_rate": "25/1"}],
            "format": {"duration": "10.000000", "size": "1048576"}
        }"#;
        let info = parse_probe_output(&path(), raw).unwrap();
        assert_eq!(info.duration_secs, 10.0);
        assert_eq!(info.frame_count, 250);
        assert_eq!(info.size_bytes, 1_048_576);
    }

    #[test]
    fn missing_nb_frames_falls_back_to_frame_rate() {
        let raw = br#"{
            "streams": [{"avg_frame_rate": "30000/1001"}],
            "format": {"duration": "2.002", "size": "4096"}
        }"#;
        let info = parse_probe_output(&path(), raw).unwrap();
        assert_eq!(info.frame_count, 60);
    }

    #[test]
    fn audio_only_file_reports_zero_frames() {
        let raw = br#"{
            "streams": [{}],
            "format": {"duration": "3.5", "size": "2048"}
        }"#;
        let info = parse_probe_output(&path(), raw).unwrap();
        assert_eq!(info.frame_count, 0);
        assert_eq!(info.duration_secs, 3.5);
    }

    #[test]
    fn missing_duration_is_a_probe_error() {
        let raw = br#"{"streams": [], "format": {"size": "2048"}}"#;
        let err = parse_probe_output(&path(), raw).unwrap_err();
        assert!(matches!(err, Error::Probe { reason, .. } if reason.contains("duration")));
    }

    #[test]
    fn garbage_json_is_a_probe_error() {
        let err = parse_probe_output(&path(), b"not json at all").unwrap_err();
        assert!(matches!(err, Error::Probe { reason, .. } if reason.contains("unparseable")));
    }

    #[test]
    fn frame_rate_ratios() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("25"), None);
    }
}
