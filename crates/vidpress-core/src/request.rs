// crates/vidpress-core/src/request.rs
// Pure request data, serializable via serde. Immutable once constructed;
// one TranscodeRequest fully specifies one ffmpeg invocation.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Output quality preset, expressed as the target height in pixels.
///
/// The mapping is a fixed enumeration; parsing anything outside it fails
/// loudly instead of defaulting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTier {
    Low,
    Medium,
    High,
}

impl ResolutionTier {
    /// Target output height in pixels. Width is derived by the scale filter.
    ///
    /// ```
    /// use vidpress_core::request::ResolutionTier;
    /// assert_eq!(ResolutionTier::Low.height(),    480);
    /// assert_eq!(ResolutionTier::Medium.height(), 720);
    /// assert_eq!(ResolutionTier::High.height(),   1080);
    /// ```
    pub fn height(self) -> u32 {
        match self {
            ResolutionTier::Low    => 480,
            ResolutionTier::Medium => 720,
            ResolutionTier::High   => 1080,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResolutionTier::Low    => "low (480p)",
            ResolutionTier::Medium => "medium (720p)",
            ResolutionTier::High   => "high (1080p)",
        }
    }
}

impl FromStr for ResolutionTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low"    => Ok(ResolutionTier::Low),
            "medium" => Ok(ResolutionTier::Medium),
            "high"   => Ok(ResolutionTier::High),
            other    => Err(Error::InvalidResolution(other.to_string())),
        }
    }
}

/// Rectangular crop region in source-frame pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x:      u32,
    pub y:      u32,
    pub width:  u32,
    pub height: u32,
}

/// Complete description of one compression job.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranscodeRequest {
    pub input:  PathBuf,
    pub output: PathBuf,
    /// Output frame rate.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Seconds removed from the end of the video.
    #[serde(default)]
    pub seconds_to_cut: f64,
    #[serde(default = "default_resolution")]
    pub resolution: ResolutionTier,
    /// Replace an existing output file. When false the run refuses to
    /// clobber instead of silently skipping.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
    /// Drop the audio stream entirely. When false audio is copied untouched.
    #[serde(default)]
    pub remove_audio: bool,
    /// Explicit crop rectangle. `None` defers to the injected ROI selector.
    #[serde(default)]
    pub crop: Option<CropRect>,
}

fn default_fps() -> u32 { 25 }
fn default_resolution() -> ResolutionTier { ResolutionTier::Low }
fn default_overwrite() -> bool { true }

impl TranscodeRequest {
    /// Request with the default knobs: 25 fps, no trim, low tier, overwrite
    /// on, audio kept, no crop.
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            fps:            default_fps(),
            seconds_to_cut: 0.0,
            resolution:     default_resolution(),
            overwrite:      default_overwrite(),
            remove_audio:   false,
            crop:           None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_heights_are_fixed() {
        assert_eq!(ResolutionTier::Low.height(), 480);
        assert_eq!(ResolutionTier::Medium.height(), 720);
        assert_eq!(ResolutionTier::High.height(), 1080);
    }

    #[test]
    fn tier_parses_known_names() {
        assert_eq!("low".parse::<ResolutionTier>().unwrap(), ResolutionTier::Low);
        assert_eq!("medium".parse::<ResolutionTier>().unwrap(), ResolutionTier::Medium);
        assert_eq!("high".parse::<ResolutionTier>().unwrap(), ResolutionTier::High);
    }

    #[test]
    fn tier_rejects_everything_else() {
        for bad in ["", "ultra", "LOW", "4k", "1080"] {
            let err = bad.parse::<ResolutionTier>().unwrap_err();
            assert!(matches!(err, Error::InvalidResolution(s) if s == bad));
        }
    }

    #[test]
    fn request_defaults_match_the_documented_knobs() {
        let req = TranscodeRequest::new("in.mp4".into(), "out.mp4".into());
        assert_eq!(req.fps, 25);
        assert_eq!(req.seconds_to_cut, 0.0);
        assert_eq!(req.resolution, ResolutionTier::Low);
        assert!(req.overwrite);
        assert!(!req.remove_audio);
        assert!(req.crop.is_none());
    }

    #[test]
    fn request_roundtrips_through_serde_with_defaults() {
        let json = r#"{"input":"a.mp4","output":"b.mp4"}"#;
        let req: TranscodeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.fps, 25);
        assert!(req.overwrite);
        assert_eq!(req.resolution, ResolutionTier::Low);
    }
}
