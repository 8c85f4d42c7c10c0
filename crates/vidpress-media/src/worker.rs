// crates/vidpress-media/src/worker.rs
//
// JobHandle: owns the background transcode thread and its cancel flag.
// All public API that vidpress-cli calls lives here.
//
// One CLI invocation runs one job, so this is a single handle rather than a
// pool; each job still carries its own Uuid in every event so a frontend
// multiplexing several jobs over one channel can tell them apart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use uuid::Uuid;

use vidpress_core::{CompressionReport, JobEvent, Result, TranscodeRequest};

use crate::command;
use crate::probe;
use crate::roi::RoiSelector;
use crate::runner;
use crate::tools;

/// What a finished job hands back.
#[derive(Debug)]
pub struct JobOutcome {
    pub output: std::path::PathBuf,
    pub report: CompressionReport,
}

/// Handle to a running transcode job.
pub struct JobHandle {
    id:     Uuid,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<Result<JobOutcome>>,
}

impl JobHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Signal the job to stop. The runner kills the child process and the
    /// job resolves to `Err(Cancelled)`; no report is produced.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Block until the job finishes and return its typed result.
    pub fn join(self) -> Result<JobOutcome> {
        self.handle.join().expect("transcode job thread panicked")
    }
}

/// Spawn a background thread that runs the whole pipeline for `request`:
/// probe, build, crop selection, transcode, re-probe, report.
///
/// Progress and completion flow over `tx` as `JobEvent`s; the same terminal
/// result is also returned from `JobHandle::join` for callers that prefer a
/// typed error over a message string.
pub fn start_job(
    request: TranscodeRequest,
    selector: Box<dyn RoiSelector + Send>,
    tx: Sender<JobEvent>,
) -> JobHandle {
    let id = Uuid::new_v4();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let handle = thread::spawn(move || {
        let result = run_job(id, &request, selector.as_ref(), &flag, &tx);
        match &result {
            Ok(outcome) => {
                let _ = tx.send(JobEvent::Done { id, output: outcome.output.clone() });
            }
            Err(e) => {
                let _ = tx.send(JobEvent::Failed { id, message: e.to_string() });
            }
        }
        result
    });

    JobHandle { id, cancel, handle }
}

fn run_job(
    id: Uuid,
    request: &TranscodeRequest,
    selector: &dyn RoiSelector,
    cancel: &Arc<AtomicBool>,
    tx: &Sender<JobEvent>,
) -> Result<JobOutcome> {
    let info = probe::probe(&request.input)?;
    tracing::info!(
        input = %request.input.display(),
        duration_secs = info.duration_secs,
        size_bytes = info.size_bytes,
        "starting transcode",
    );

    // An explicit rectangle on the request wins; otherwise the injected
    // selector gets a chance (interactive pickers plug in there).
    let crop = match request.crop {
        Some(rect) => Some(rect),
        None => selector.select(&request.input)?,
    };

    let plan = command::build_transcode_plan(request, &info, crop)?;
    let ffmpeg = tools::ffmpeg_path()?;
    tracing::debug!(argv = ?plan.argv, "ffmpeg invocation");

    let total_secs = plan.clip_secs;
    runner::run_transcode(&ffmpeg, &plan.argv, total_secs, cancel, |elapsed_secs| {
        let _ = tx.send(JobEvent::Progress { id, elapsed_secs, total_secs });
    })?;

    let out_info = probe::probe(&request.output)?;
    let report = CompressionReport::new(info.size_bytes, out_info.size_bytes)?;
    tracing::info!(
        output = %request.output.display(),
        saved_bytes = report.saved_bytes(),
        "transcode finished",
    );

    Ok(JobOutcome { output: request.output.clone(), report })
}
