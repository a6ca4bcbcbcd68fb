//! Frame-by-frame playback and capture of sampled input.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::LandmarkError;
use crate::game::LandmarkFrame;
use crate::input::{parse_line, LandmarkSource};

/// Plays back one stored sample per tick, then reports no hand.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    frames: Vec<Option<LandmarkFrame>>,
    cursor: usize,
}

impl ScriptedSource {
    /// Play back `frames` in order.
    #[must_use]
    pub const fn new(frames: Vec<Option<LandmarkFrame>>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Total stored samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no stored samples at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether every stored sample has been played.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.frames.len()
    }
}

impl LandmarkSource for ScriptedSource {
    fn latest(&mut self) -> Option<LandmarkFrame> {
        let frame = self.frames.get(self.cursor).copied().flatten();
        self.cursor = self.cursor.saturating_add(1);
        frame
    }
}

/// Wraps a source and keeps a copy of every sample it hands out.
#[derive(Debug, Clone)]
pub struct RecordingSource<S> {
    inner: S,
    frames: Vec<Option<LandmarkFrame>>,
}

impl<S: LandmarkSource> RecordingSource<S> {
    /// Start recording `inner`.
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            frames: Vec::new(),
        }
    }

    /// Samples captured so far.
    #[must_use]
    pub fn frames(&self) -> &[Option<LandmarkFrame>] {
        &self.frames
    }

    /// Stop recording and return the captured samples.
    #[must_use]
    pub fn into_frames(self) -> Vec<Option<LandmarkFrame>> {
        self.frames
    }
}

impl<S: LandmarkSource> LandmarkSource for RecordingSource<S> {
    fn latest(&mut self) -> Option<LandmarkFrame> {
        let frame = self.inner.latest();
        self.frames.push(frame);
        frame
    }
}

/// Read a whole JSON-lines landmark file, one sample per non-blank line.
///
/// Malformed lines are logged and kept as "no hand" so frame numbering is preserved.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn read_landmark_file(path: &Path) -> Result<Vec<Option<LandmarkFrame>>, LandmarkError> {
    let reader = BufReader::new(File::open(path)?);
    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        frames.push(parse_line(&line).unwrap_or_else(|e| {
            log::warn!("{}:{}: {e}", path.display(), index + 1);
            None
        }));
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Bounds, Vec2};
    use crate::input::{synthesize, HandPose, SweepSource};
    use std::io::Write;

    #[test]
    fn test_scripted_plays_in_order_then_none() {
        let bounds = Bounds::new(640.0, 480.0);
        let hand = synthesize(HandPose::Open, Vec2::new(10.0, 10.0), bounds);
        let mut source = ScriptedSource::new(vec![Some(hand), None]);

        assert_eq!(source.len(), 2);
        assert_eq!(source.latest(), Some(hand));
        assert_eq!(source.latest(), None);
        assert!(source.is_exhausted());
        assert_eq!(source.latest(), None);
    }

    #[test]
    fn test_recording_captures_samples() {
        let bounds = Bounds::new(640.0, 480.0);
        let mut source = RecordingSource::new(SweepSource::new(bounds));
        let a = source.latest();
        let b = source.latest();
        assert_eq!(source.frames(), &[a, b]);
    }

    #[test]
    fn test_read_file_keeps_bad_lines_as_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"landmarks": null}}"#).unwrap();
        writeln!(file, "oops").unwrap();
        writeln!(file).unwrap();
        let pairs = vec!["[0.5, 0.5]"; 21].join(",");
        writeln!(file, r#"{{"landmarks": [{pairs}]}}"#).unwrap();

        let frames = read_landmark_file(file.path()).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[0].is_none());
        assert!(frames[1].is_none());
        assert!(frames[2].is_some());
    }
}
