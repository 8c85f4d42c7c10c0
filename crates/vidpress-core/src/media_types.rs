// crates/vidpress-core/src/media_types.rs
//
// Types that flow across the channel between vidpress-media and vidpress-cli.
// No clap, no ffmpeg, just plain data.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a media file's container metadata, produced by one probe call.
/// Never updated in place; re-probe for fresh numbers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub duration_secs: f64,
    /// Frame count as reported by the container. Some formats omit it; the
    /// prober falls back to duration x average frame rate, then 0.
    pub frame_count: u64,
    pub size_bytes: u64,
}

/// Events sent from the transcode job thread to the frontend.
pub enum JobEvent {
    Progress { id: Uuid, elapsed_secs: f64, total_secs: f64 },
    Done     { id: Uuid, output: PathBuf },
    Failed   { id: Uuid, message: String },
}
