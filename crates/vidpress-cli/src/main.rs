// crates/vidpress-cli/src/main.rs
//
// The vidpress binary: parse flags into a TranscodeRequest, hand it to the
// media worker, and render its event stream as a terminal progress bar
// followed by the compression report.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use vidpress_core::helpers::size::format_size;
use vidpress_core::helpers::time::format_duration;
use vidpress_core::{CropRect, JobEvent, ResolutionTier, TranscodeRequest};
use vidpress_media::{start_job, NoCrop};

#[derive(Parser, Debug)]
#[command(name = "vidpress", version)]
#[command(about = "Shrink a video by re-encoding it through ffmpeg")]
#[command(long_about = "Shrink a video by re-encoding it through ffmpeg.\n\n\
    Probes the input with ffprobe, re-encodes with libx265 at a fixed\n\
    quality tier, and reports how much smaller the result is.\n\n\
    EXAMPLES:\n    \
    vidpress input.mp4 output.mp4\n    \
    vidpress input.mp4 output.mp4 --resolution medium --fps 30\n    \
    vidpress input.mp4 output.mp4 --cut 2.5 --remove-audio\n    \
    vidpress input.mp4 output.mp4 --crop 640x360+20+40")]
struct Args {
    /// Source video file.
    input: PathBuf,

    /// Destination file (container inferred from the extension).
    output: PathBuf,

    /// Output frame rate.
    #[arg(long, default_value_t = 25)]
    fps: u32,

    /// Seconds to trim from the end of the video.
    #[arg(long, default_value_t = 0.0)]
    cut: f64,

    /// Output quality tier.
    #[arg(long, value_enum, default_value_t = TierArg::Low)]
    resolution: TierArg,

    /// Refuse to overwrite an existing output file.
    #[arg(short = 'n', long)]
    no_clobber: bool,

    /// Drop the audio stream entirely (default keeps it, copied untouched).
    #[arg(long)]
    remove_audio: bool,

    /// Crop rectangle as WxH+X+Y (e.g. 640x360+20+40).
    #[arg(long, value_parser = parse_crop)]
    crop: Option<CropRect>,

    /// Verbose logging to stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// clap-facing mirror of `ResolutionTier`; anything outside the three
/// tiers is rejected at parse time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TierArg {
    Low,
    Medium,
    High,
}

impl From<TierArg> for ResolutionTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Low    => ResolutionTier::Low,
            TierArg::Medium => ResolutionTier::Medium,
            TierArg::High   => ResolutionTier::High,
        }
    }
}

/// Parse `WxH+X+Y` into a crop rectangle.
fn parse_crop(raw: &str) -> Result<CropRect, String> {
    let err = || format!("expected WxH+X+Y (e.g. 640x360+20+40), got '{raw}'");

    let (size, origin) = raw.split_once('+').ok_or_else(err)?;
    let (width, height) = size.split_once('x').ok_or_else(err)?;
    let (x, y) = origin.split_once('+').ok_or_else(err)?;

    let parse = |s: &str| s.parse::<u32>().map_err(|_| err());
    let rect = CropRect {
        width:  parse(width)?,
        height: parse(height)?,
        x:      parse(x)?,
        y:      parse(y)?,
    };
    if rect.width == 0 || rect.height == 0 {
        return Err(format!("crop region must have a nonzero size, got '{raw}'"));
    }
    Ok(rect)
}

impl Args {
    fn into_request(self) -> TranscodeRequest {
        TranscodeRequest {
            input:          self.input,
            output:         self.output,
            fps:            self.fps,
            seconds_to_cut: self.cut,
            resolution:     self.resolution.into(),
            overwrite:      !self.no_clobber,
            remove_audio:   self.remove_audio,
            crop:           self.crop,
        }
    }
}

fn init_tracing(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn make_bar(total_secs: f64) -> ProgressBar {
    // Positions are deci-seconds so short clips still animate smoothly.
    let bar = ProgressBar::new((total_secs * 10.0).ceil().max(1.0) as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{wide_bar:.cyan/blue}] {percent}% {msg}",
        )
        .expect("valid progress template")
        .progress_chars("#>-"),
    );
    bar
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let request = args.into_request();
    tracing::debug!(?request, "parsed request");

    let (tx, rx) = crossbeam_channel::unbounded::<JobEvent>();
    // --crop travels on the request itself; the selector seam stays NoCrop
    // here and is where an interactive picker would plug in.
    let job = start_job(request, Box::new(NoCrop), tx);

    let mut bar: Option<ProgressBar> = None;
    for event in rx {
        match event {
            JobEvent::Progress { elapsed_secs, total_secs, .. } => {
                let pb = bar.get_or_insert_with(|| make_bar(total_secs));
                pb.set_position((elapsed_secs * 10.0).round() as u64);
                pb.set_message(format!(
                    "{} / {}",
                    format_duration(elapsed_secs),
                    format_duration(total_secs),
                ));
            }
            JobEvent::Done { .. } => {
                if let Some(pb) = bar.take() {
                    pb.finish_with_message("done");
                }
            }
            JobEvent::Failed { .. } => {
                // The typed error arrives via join below; just stop drawing.
                if let Some(pb) = bar.take() {
                    pb.abandon();
                }
            }
        }
    }

    let outcome = job.join().context("transcode failed")?;
    print_report(&outcome.report);
    Ok(())
}

fn print_report(report: &vidpress_core::CompressionReport) {
    let delta = format!("{:.3}% ({:.3}kb)", report.percent(), report.saved_kb());
    let delta = if report.saved_bytes() >= 0 {
        style(delta).green()
    } else {
        // Output grew. Worth seeing plainly, not an error.
        style(delta).red()
    };

    println!();
    println!("{}", style("Compression report").cyan().bold());
    println!("  Input size:   {}", format_size(report.input_bytes));
    println!("  Output size:  {}", format_size(report.output_bytes));
    println!("  Saved:        {delta}");
    println!();
    println!("{}", style(report).bold());
}
