//! Thread-fed landmark input and the JSON-lines wire format.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use serde::Deserialize;

use crate::error::LandmarkError;
use crate::game::{Landmark, LandmarkFrame, LANDMARK_COUNT};
use crate::input::LandmarkSource;

/// Producer half of a [`ChannelSource`].
pub type LandmarkSender = Sender<Option<LandmarkFrame>>;

/// Samples detections pushed from another thread.
///
/// Holds the last delivered value until a newer one arrives. Once every
/// sender is gone the hand is reported as absent.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<Option<LandmarkFrame>>,
    last: Option<LandmarkFrame>,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a connected sender/source pair.
    #[must_use]
    pub fn new() -> (LandmarkSender, Self) {
        let (tx, rx) = mpsc::channel();
        (
            tx,
            Self {
                rx,
                last: None,
                disconnected: false,
            },
        )
    }

    /// Whether the producer side has hung up.
    #[must_use]
    pub const fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl LandmarkSource for ChannelSource {
    fn latest(&mut self) -> Option<LandmarkFrame> {
        loop {
            match self.rx.try_recv() {
                Ok(frame) => self.last = frame,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    self.last = None;
                    break;
                }
            }
        }
        self.last
    }
}

#[derive(Deserialize)]
struct WireRecord {
    landmarks: Option<Vec<WirePoint>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePoint {
    Pair([f64; 2]),
    Triple([f64; 3]),
    Object { x: f64, y: f64 },
}

impl From<WirePoint> for Landmark {
    fn from(p: WirePoint) -> Self {
        match p {
            WirePoint::Pair([x, y]) | WirePoint::Triple([x, y, _]) | WirePoint::Object { x, y } => {
                Self::new(x, y)
            }
        }
    }
}

/// Decode one JSON-lines record.
///
/// Accepts `{"landmarks": [[x, y], ...]}`, points as `[x, y, z]` or
/// `{"x": .., "y": ..}`, and `{"landmarks": null}` for no detection.
///
/// # Errors
///
/// Returns an error for invalid JSON or a detection without exactly 21 points.
pub fn parse_line(line: &str) -> Result<Option<LandmarkFrame>, LandmarkError> {
    let record: WireRecord = serde_json::from_str(line)?;
    let Some(points) = record.landmarks else {
        return Ok(None);
    };
    if points.len() != LANDMARK_COUNT {
        return Err(LandmarkError::WrongCount(points.len()));
    }
    let points: Vec<Landmark> = points.into_iter().map(Landmark::from).collect();
    LandmarkFrame::from_slice(&points)
        .map(Some)
        .ok_or(LandmarkError::WrongCount(points.len()))
}

/// Read JSON-lines detections from `reader` on a background thread.
///
/// Blank lines are skipped. A malformed line is logged and delivered as
/// "no hand". The thread exits at end of stream or when the source is dropped.
pub fn spawn_json_lines<R>(reader: R) -> (ChannelSource, JoinHandle<()>)
where
    R: BufRead + Send + 'static,
{
    let (tx, source) = ChannelSource::new();
    let handle = thread::spawn(move || pump_lines(reader, &tx));
    (source, handle)
}

fn pump_lines<R: BufRead>(reader: R, tx: &LandmarkSender) {
    for (index, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("landmark stream read failed: {e}");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let frame = parse_line(&line).unwrap_or_else(|e| {
            log::warn!("landmark line {}: {e}", index + 1);
            None
        });
        if tx.send(frame).is_err() {
            return;
        }
    }
    log::warn!("landmark stream ended");
}
