// crates/vidpress-media/src/command.rs
//
// Deterministic ffmpeg argument construction. The builder does no I/O and
// spawns nothing: every validation failure surfaces here, before a child
// process exists.
//
// Filter handling: ffmpeg treats a later -vf as a replacement for an earlier
// one, not an addition. All video filters (fps, scale, crop) therefore join
// into a single comma-separated chain behind one -vf flag.

use vidpress_core::{CropRect, Error, MediaInfo, Result, TranscodeRequest};

/// A fully built invocation plus the number the progress bar runs to.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscodePlan {
    /// Arguments for the ffmpeg binary, program name not included.
    pub argv: Vec<String>,
    /// Output clip duration in seconds: input duration minus the trim.
    /// ffmpeg stops at this point, so it is the progress total.
    pub clip_secs: f64,
}

/// Build the ffmpeg invocation for `request` against the probed `info`.
///
/// `crop` is whatever the ROI seam produced; `None` leaves the frame whole.
pub fn build_transcode_plan(
    request: &TranscodeRequest,
    info: &MediaInfo,
    crop: Option<CropRect>,
) -> Result<TranscodePlan> {
    let clip_secs = info.duration_secs - request.seconds_to_cut;
    if clip_secs <= 0.0 {
        return Err(Error::InvalidDuration {
            duration_secs:  info.duration_secs,
            seconds_to_cut: request.seconds_to_cut,
        });
    }

    // Height comes from the tier; -2 lets ffmpeg derive a width that keeps
    // the aspect ratio while staying even (libx265 rejects odd dimensions).
    let mut filters = vec![
        format!("fps={}", request.fps),
        format!("scale=-2:{}", request.resolution.height()),
    ];
    if let Some(rect) = crop {
        filters.push(format!(
            "crop={}:{}:{}:{}",
            rect.width, rect.height, rect.x, rect.y,
        ));
    }

    let mut argv: Vec<String> = vec![
        "-i".into(), request.input.to_string_lossy().into_owned(),
        "-t".into(), format!("{clip_secs:.3}"),
        "-vf".into(), filters.join(","),
        "-c:v".into(), "libx265".into(),
    ];

    if request.remove_audio {
        argv.push("-an".into());
    } else {
        // Copy the audio stream untouched; re-encoding it buys nothing.
        argv.push("-c:a".into());
        argv.push("copy".into());
    }

    argv.push(if request.overwrite { "-y" } else { "-n" }.into());
    argv.push(request.output.to_string_lossy().into_owned());

    Ok(TranscodePlan { argv, clip_secs })
}
