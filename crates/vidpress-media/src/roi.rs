// crates/vidpress-media/src/roi.rs
//
// Region-of-interest seam. An interactive first-frame picker needs a GUI
// toolkit and lives outside this crate; anything that can produce a crop
// rectangle plugs in through this trait, keeping the command builder and
// runner headless and testable.

use std::path::Path;

use vidpress_core::{CropRect, Result};

/// Source of an optional crop rectangle for a given input file.
pub trait RoiSelector {
    /// Pick a crop region for `input`, or `None` to leave the frame whole.
    fn select(&self, input: &Path) -> Result<Option<CropRect>>;
}

/// Never crops. The default for scripted runs.
pub struct NoCrop;

impl RoiSelector for NoCrop {
    fn select(&self, _input: &Path) -> Result<Option<CropRect>> {
        Ok(None)
    }
}

/// Returns a fixed, preconfigured rectangle (what the --crop flag uses).
pub struct FixedRoi(pub CropRect);

impl RoiSelector for FixedRoi {
    fn select(&self, _input: &Path) -> Result<Option<CropRect>> {
        Ok(Some(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn selectors_return_what_they_promise() {
        let input = PathBuf::from("clip.mp4");
        assert_eq!(NoCrop.select(&input).unwrap(), None);

        let rect = CropRect { x: 1, y: 2, width: 3, height: 4 };
        assert_eq!(FixedRoi(rect).select(&input).unwrap(), Some(rect));
    }
}
