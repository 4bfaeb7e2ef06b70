//! Headless sketch scripts.
//!
//! A script is a JSON list of brush and pointer operations, replayed against a
//! [`CanvasSession`] exactly as interactive input would be:
//!
//! ```json
//! { "ops": [
//!     { "op": "color", "value": "#ef4444" },
//!     { "op": "size", "value": 6 },
//!     { "op": "stroke", "points": [[10, 10], [80, 40]] },
//!     { "op": "eraser", "on": true },
//!     { "op": "photo", "path": "leaf.jpg" }
//! ] }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CanvasSession, PhotoOutcome, Point};
use crate::artifact::Artifact;
use crate::canvas::brush::parse_hex_color;
use crate::error::Result;

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum SketchOp {
    /// Pick a palette color; leaves erase mode.
    Color {
        /// `#rgb` or `#rrggbb`.
        value: String,
    },
    /// Toggle the eraser.
    Eraser {
        /// Whether erasing is on.
        on: bool,
    },
    /// Change the brush width.
    Size {
        /// Requested width; clamped by the session.
        value: i64,
    },
    /// A complete pointer gesture. The first point starts the stroke.
    Stroke {
        /// Pointer positions in order.
        points: Vec<Point>,
    },
    /// Capture a photo from an image file.
    Photo {
        /// Image path, relative to the script's directory.
        path: PathBuf,
    },
    /// Wipe the surface.
    Clear,
}

/// A list of operations to replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SketchScript {
    /// Operations in order.
    pub ops: Vec<SketchOp>,
}

/// Summary of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Strokes drawn.
    pub strokes: usize,
    /// Photos composited.
    pub photos: usize,
    /// Photos that failed to decode.
    pub failed_photos: usize,
}

impl SketchScript {
    /// Parse a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a script.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json(&text)
    }

    /// Replay every operation against `session`.
    ///
    /// Photo paths are resolved against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid color or an unreadable photo file. An
    /// image that reads but fails to decode is counted, not fatal.
    pub async fn replay(&self, session: &mut CanvasSession, base_dir: &Path) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();

        for op in &self.ops {
            match op {
                SketchOp::Color { value } => session.set_color(parse_hex_color(value)?),
                SketchOp::Eraser { on } => session.set_eraser(*on),
                SketchOp::Size { value } => {
                    session.set_brush_size(*value);
                }
                SketchOp::Stroke { points } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    session.begin_stroke(first.x, first.y);
                    for p in rest {
                        session.extend_stroke(p.x, p.y);
                    }
                    session.end_stroke();
                    summary.strokes += 1;
                }
                SketchOp::Photo { path } => {
                    let bytes = tokio::fs::read(base_dir.join(path)).await?;
                    match session.capture_photo(bytes).await {
                        PhotoOutcome::Applied(_) | PhotoOutcome::Deferred => summary.photos += 1,
                        PhotoOutcome::Superseded => {}
                        PhotoOutcome::DecodeFailed => {
                            warn!(path = %path.display(), "photo could not be decoded");
                            summary.failed_photos += 1;
                        }
                    }
                }
                SketchOp::Clear => session.clear(),
            }
        }

        debug!(?summary, "sketch script replayed");
        Ok(summary)
    }
}

/// Replay a script on a session and return its final artifact.
///
/// # Errors
///
/// See [`SketchScript::replay`].
pub async fn render(
    script: &SketchScript,
    session: &mut CanvasSession,
    base_dir: &Path,
) -> Result<Artifact> {
    script.replay(session, base_dir).await?;
    Ok(session.artifact().clone())
}
