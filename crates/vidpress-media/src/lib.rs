// crates/vidpress-media/src/lib.rs
//
// External-tool layer: everything that touches ffmpeg/ffprobe lives here.
// No terminal dependency; communicates with vidpress-cli via channels only.
//
// To add a new capability:
//   1. Create a new module file here
//   2. Add `mod mymodule;` below
//   3. Call it from worker.rs (run_job or a new entry point)

pub mod command;
pub mod probe;
pub mod progress;
pub mod roi;
pub mod runner;
pub mod tools;
pub mod worker;

// Re-export the main public API so vidpress-cli imports are simple.
pub use roi::{FixedRoi, NoCrop, RoiSelector};
pub use worker::{start_job, JobHandle, JobOutcome};
pub use vidpress_core::media_types::{JobEvent, MediaInfo};
