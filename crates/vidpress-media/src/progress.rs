// crates/vidpress-media/src/progress.rs
//
// The narrow seam around ffmpeg's stderr status format. ffmpeg interleaves
// free-form diagnostics with status lines like:
//
//   frame=  123 fps= 45 q=28.0 size=     512kB time=00:00:10.48 bitrate= ...
//
// Only the `time=` token is parsed structurally; everything else is noise.
// Format drift across ffmpeg versions lands in this file and nowhere else.

/// Extract elapsed seconds from one status line.
///
/// Returns `None` for lines without a `time=` token or with a clock that is
/// not `H:MM:SS.ff` shaped. Hours may exceed two digits on very long inputs.
pub fn parse_progress_line(line: &str) -> Option<f64> {
    let rest = &line[line.find("time=")? + "time=".len()..];
    let token = rest.split_whitespace().next()?;

    let mut parts = token.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Elapsed-seconds tracker for one transcode invocation.
///
/// Owned exclusively by the runner. Observed values only ever move forward:
/// a late or out-of-order status line can never walk the indicator backward,
/// and nothing exceeds the total until `finish` pins it there exactly.
#[derive(Debug)]
pub struct ProgressState {
    total_secs:   f64,
    elapsed_secs: f64,
}

impl ProgressState {
    pub fn new(total_secs: f64) -> Self {
        Self { total_secs, elapsed_secs: 0.0 }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Fold in a parsed elapsed value. Returns the new elapsed time only
    /// when it actually advanced.
    pub fn observe(&mut self, secs: f64) -> Option<f64> {
        let clamped = secs.min(self.total_secs);
        if clamped > self.elapsed_secs {
            self.elapsed_secs = clamped;
            Some(clamped)
        } else {
            None
        }
    }

    /// Force completion. The last status line ffmpeg prints is often a
    /// fraction of a frame short of the full duration; this guarantees the
    /// indicator always lands on 100%.
    pub fn finish(&mut self) -> f64 {
        self.elapsed_secs = self.total_secs;
        self.total_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typical_status_line_parses() {
        let line = "frame=  123 fps= 45 q=28.0 size=     512kB time=00:01:10.48 bitrate=  59.9kbits/s speed=1.71x";
        let secs = parse_progress_line(line).unwrap();
        assert!((secs - 70.48).abs() < 1e-9);
    }

    #[test]
    fn hours_may_exceed_two_digits() {
        assert_eq!(parse_progress_line("time=100:00:01.50"), Some(360_001.5));
    }

    #[test]
    fn diagnostic_lines_yield_nothing() {
        for line in [
            "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'in.mp4':",
            "Stream mapping:",
            "  Duration: 00:00:10.00, start: 0.000000, bitrate: 839 kb/s",
            "",
        ] {
            assert_eq!(parse_progress_line(line), None, "line: {line:?}");
        }
    }

    #[test]
    fn malformed_clocks_yield_nothing() {
        for line in [
            "time=abc",
            "time=1:2",
            "time=1:2:3:4",
            "time=",
            "time=N/A bitrate=N/A",
        ] {
            assert_eq!(parse_progress_line(line), None, "line: {line:?}");
        }
    }

    #[test]
    fn observations_are_monotonically_non_decreasing() {
        let mut state = ProgressState::new(100.0);
        assert_eq!(state.observe(5.0), Some(5.0));
        assert_eq!(state.observe(12.5), Some(12.5));
        // A late line arriving out of order must not move the bar backward.
        assert_eq!(state.observe(8.0), None);
        assert_eq!(state.observe(12.5), None);
        assert_eq!(state.elapsed_secs(), 12.5);
    }

    #[test]
    fn observations_never_exceed_the_total() {
        let mut state = ProgressState::new(10.0);
        assert_eq!(state.observe(11.2), Some(10.0));
        assert_eq!(state.observe(15.0), None);
        assert_eq!(state.elapsed_secs(), 10.0);
    }

    #[test]
    fn finish_pins_the_total_exactly() {
        let mut state = ProgressState::new(8.0);
        state.observe(7.96);
        assert_eq!(state.finish(), 8.0);
        assert_eq!(state.elapsed_secs(), 8.0);
    }

    #[test]
    fn arbitrary_line_sequences_stay_non_decreasing() {
        let lines = [
            "time=00:00:01.00",
            "garbage",
            "time=00:00:00.40",
            "time=00:00:03.20 bitrate=1k",
            "time=N/A",
            "time=00:00:02.00",
            "time=00:00:07.99",
        ];
        let mut state = ProgressState::new(8.0);
        let mut seen = Vec::new();
        for line in lines {
            if let Some(secs) = parse_progress_line(line) {
                if let Some(advanced) = state.observe(secs) {
                    seen.push(advanced);
                }
            }
        }
        seen.push(state.finish());

        assert_eq!(seen, vec![1.0, 3.2, 7.99, 8.0]);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }
}
