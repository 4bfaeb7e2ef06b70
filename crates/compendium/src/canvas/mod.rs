//! The annotation canvas engine.
//!
//! A [`CanvasSession`] owns one raster surface plus the brush state of a
//! single editing view. Pointer input is applied synchronously, one segment at
//! a time; image decoding (seeding and photo capture) runs on tokio's blocking
//! pool so the caller's event loop keeps accepting input.
//!
//! # Photo ordering
//!
//! A photo capture is split into [`CanvasSession::request_photo`] and
//! [`CanvasSession::finish_photo`]. Strokes may happen in between. When the
//! decoded photo arrives:
//!
//! - if a stroke was *started* after the request, the photo is dropped;
//! - if a stroke that started before the request is still active, the photo
//!   is held and composited when that stroke ends, unless the stroke is
//!   restarted first, which drops it;
//! - otherwise it is composited immediately.
//!
//! Points with a non-finite coordinate are ignored.

pub mod brush;
pub mod raster;
pub mod script;

use std::time::Duration;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::artifact::{decode_bytes, Artifact};
use crate::config::CanvasConfig;

pub use brush::{Brush, BrushMode};
pub use raster::Point;

/// The in-progress stroke.
#[derive(Debug, Clone, Copy)]
struct Stroke {
    last: Point,
    drew_segment: bool,
}

/// What happened to a captured photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoOutcome {
    /// Composited onto the surface; carries the fresh snapshot.
    Applied(Artifact),
    /// Held until the active stroke ends.
    Deferred,
    /// Dropped because a stroke began after the capture was requested.
    Superseded,
    /// The bytes could not be decoded in time; the surface is untouched.
    DecodeFailed,
}

/// A photo capture whose decode is still running.
#[derive(Debug)]
pub struct PendingPhoto {
    epoch: u64,
    task: JoinHandle<Option<RgbaImage>>,
}

/// One editing session's sketch surface.
#[derive(Debug)]
pub struct CanvasSession {
    surface: RgbaImage,
    brush: Brush,
    stroke: Option<Stroke>,
    artifact: Artifact,
    stroke_epoch: u64,
    deferred_photo: Option<RgbaImage>,
    default_width: u32,
    decode_timeout: Duration,
}

impl CanvasSession {
    /// Create a blank session.
    ///
    /// The width comes from `width_hint` when the host can report one, else
    /// from the configured default; the height is fixed by configuration.
    #[must_use]
    pub fn new(config: &CanvasConfig, width_hint: Option<u32>) -> Self {
        let width = resolve_width(width_hint, config.default_width);
        Self {
            surface: RgbaImage::new(width, config.height),
            brush: Brush::from_config(config),
            stroke: None,
            artifact: Artifact::empty(),
            stroke_epoch: 0,
            deferred_photo: None,
            default_width: config.default_width,
            decode_timeout: config.decode_timeout(),
        }
    }

    /// Create a session, optionally seeded with a stored artifact.
    ///
    /// The returned session is ready for input: the seed has either been
    /// drawn to fill the surface or, if it could not be decoded within the
    /// configured timeout, ignored.
    pub async fn initialize(
        config: &CanvasConfig,
        width_hint: Option<u32>,
        seed: Option<&Artifact>,
    ) -> Self {
        let mut session = Self::new(config, width_hint);

        if let Some(seed) = seed.filter(|s| !s.is_empty()) {
            let (width, height) = session.dimensions();
            match decode_fitted(seed.clone(), width, height, session.decode_timeout).await {
                Some(image) => {
                    session.surface = image;
                    session.artifact = seed.clone();
                    debug!(width, height, "seeded canvas from stored artifact");
                }
                None => warn!("stored artifact could not be decoded; starting blank"),
            }
        }

        info!(
            width = session.surface.width(),
            height = session.surface.height(),
            "canvas session ready"
        );
        session
    }

    /// Surface dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    /// Borrow the backing pixels.
    #[must_use]
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Borrow the brush.
    #[must_use]
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// The most recent snapshot.
    #[must_use]
    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.surface.pixels().all(|p| p.0[3] == 0)
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Start a stroke at `(x, y)`.
    ///
    /// Calling this mid-stroke restarts the stroke from the new point and
    /// drops any photo held behind the old one.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        if !Point::new(x, y).is_finite() {
            warn!(x, y, "ignoring stroke start at a non-finite point");
            return;
        }

        self.stroke_epoch += 1;
        if self.deferred_photo.take().is_some() {
            debug!("dropping deferred photo superseded by a restarted stroke");
        }
        self.stroke = Some(Stroke {
            last: Point::new(x, y),
            drew_segment: false,
        });
    }

    /// Draw from the last stroke point to `(x, y)`.
    pub fn extend_stroke(&mut self, x: f32, y: f32) {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };

        let to = Point::new(x, y);
        if !to.is_finite() {
            warn!(x, y, "ignoring stroke point at a non-finite position");
            return;
        }

        raster::stamp_segment(
            &mut self.surface,
            stroke.last,
            to,
            self.brush.width(),
            self.brush.ink(),
        );
        stroke.last = to;
        stroke.drew_segment = true;
    }

    /// Finish the active stroke and snapshot.
    ///
    /// A stroke with no segments leaves a dot at its start point. A photo held
    /// back while the stroke was active is composited before the snapshot.
    /// Returns `None` if no stroke was active.
    pub fn end_stroke(&mut self) -> Option<Artifact> {
        let stroke = self.stroke.take()?;

        if !stroke.drew_segment {
            raster::stamp_dot(
                &mut self.surface,
                stroke.last,
                self.brush.width(),
                self.brush.ink(),
            );
        }

        if let Some(photo) = self.deferred_photo.take() {
            debug!("compositing photo deferred behind stroke");
            self.composite_photo(&photo);
        }

        Some(self.snapshot())
    }

    /// Set the paint color and switch to draw mode.
    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.brush.set_color(color);
    }

    /// Turn the eraser on or off.
    pub fn set_eraser(&mut self, on: bool) {
        self.brush.set_eraser(on);
    }

    /// Set the brush width, clamped to the configured range.
    pub fn set_brush_size(&mut self, size: i64) -> u32 {
        self.brush.set_width(size)
    }

    /// Start decoding a captured photo in the background.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn request_photo(&self, bytes: Vec<u8>) -> PendingPhoto {
        let (width, height) = self.dimensions();
        let task = tokio::task::spawn_blocking(move || {
            decode_bytes(&bytes).map(|image| fit_to(image, width, height))
        });

        PendingPhoto {
            epoch: self.stroke_epoch,
            task,
        }
    }

    /// Wait for a pending photo and apply the ordering policy.
    pub async fn finish_photo(&mut self, pending: PendingPhoto) -> PhotoOutcome {
        let decoded = match tokio::time::timeout(self.decode_timeout, pending.task).await {
            Ok(Ok(decoded)) => decoded,
            Ok(Err(e)) => {
                warn!(error = %e, "photo decode task failed");
                None
            }
            Err(_) => {
                warn!(timeout = ?self.decode_timeout, "photo decode timed out");
                None
            }
        };

        let Some(photo) = decoded else {
            return PhotoOutcome::DecodeFailed;
        };

        if self.stroke_epoch != pending.epoch {
            debug!("dropping photo superseded by a newer stroke");
            return PhotoOutcome::Superseded;
        }

        // The surface may have been resized while decoding
        let (width, height) = self.dimensions();
        let photo = fit_to(photo, width, height);

        if self.stroke.is_some() {
            self.deferred_photo = Some(photo);
            return PhotoOutcome::Deferred;
        }

        self.composite_photo(&photo);
        PhotoOutcome::Applied(self.snapshot())
    }

    /// Decode a captured photo and draw it over the whole surface.
    pub async fn capture_photo(&mut self, bytes: Vec<u8>) -> PhotoOutcome {
        let pending = self.request_photo(bytes);
        self.finish_photo(pending).await
    }

    /// Wipe the surface and forget the stored artifact.
    pub fn clear(&mut self) {
        let (width, height) = self.dimensions();
        self.surface = RgbaImage::new(width, height);
        self.artifact = Artifact::empty();
        self.deferred_photo = None;
    }

    /// Encode the surface, store the result and return it.
    ///
    /// An encoding failure yields (and stores) the empty artifact.
    pub fn snapshot(&mut self) -> Artifact {
        self.artifact = Artifact::encode_png(&self.surface).unwrap_or_default();
        self.artifact.clone()
    }

    /// Rebuild the surface for a new container width.
    ///
    /// The current picture is carried over by decoding the snapshot and drawing
    /// it at the new size. An active stroke is finished first. An untouched
    /// blank surface keeps its empty artifact.
    pub async fn resize(&mut self, width_hint: Option<u32>) {
        if self.stroke.is_some() {
            self.end_stroke();
        } else if !(self.artifact.is_empty() && self.is_blank()) {
            self.snapshot();
        }

        let width = resolve_width(width_hint, self.default_width);
        let height = self.surface.height();
        if (width, height) == self.dimensions() {
            return;
        }

        self.surface = RgbaImage::new(width, height);
        if self.artifact.is_empty() {
            return;
        }

        match decode_fitted(self.artifact.clone(), width, height, self.decode_timeout).await {
            Some(image) => self.surface = image,
            None => {
                warn!("could not redraw artifact after resize");
                self.artifact = Artifact::empty();
            }
        }
        debug!(width, height, "canvas resized");
    }

    fn composite_photo(&mut self, photo: &RgbaImage) {
        imageops::overlay(&mut self.surface, photo, 0, 0);
    }
}

fn resolve_width(hint: Option<u32>, default_width: u32) -> u32 {
    hint.filter(|w| *w > 0).unwrap_or(default_width)
}

/// Scale `image` to exactly `width` x `height`, skipping the resample when it
/// already fits.
fn fit_to(image: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        image
    } else {
        imageops::resize(&image, width, height, FilterType::Triangle)
    }
}

async fn decode_fitted(
    artifact: Artifact,
    width: u32,
    height: u32,
    timeout: Duration,
) -> Option<RgbaImage> {
    let task = tokio::task::spawn_blocking(move || {
        artifact
            .decode_image()
            .map(|image| fit_to(image, width, height))
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(image)) => image,
        Ok(Err(e)) => {
            warn!(error = %e, "artifact decode task failed");
            None
        }
        Err(_) => {
            warn!(?timeout, "artifact decode timed out");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::PNG_DESCRIPTOR;
    use proptest::prelude::*;

    const RED: Rgba<u8> = Rgba([239, 68, 68, 255]);
    const BLUE: Rgba<u8> = Rgba([59, 130, 246, 255]);

    fn config() -> CanvasConfig {
        CanvasConfig {
            default_width: 64,
            height: 48,
            ..CanvasConfig::default()
        }
    }

    fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        Artifact::encode_png(image).unwrap().payload().unwrap()
    }

    fn blue_photo() -> Vec<u8> {
        png_bytes(&RgbaImage::from_pixel(64, 48, BLUE))
    }

    fn close_to(actual: Rgba<u8>, expected: Rgba<u8>) -> bool {
        actual
            .0
            .iter()
            .zip(expected.0.iter())
            .all(|(a, e)| a.abs_diff(*e) <= 1)
    }

    #[test]
    fn test_new_uses_width_hint_or_default() {
        let session = CanvasSession::new(&config(), Some(120));
        assert_eq!(session.dimensions(), (120, 48));

        let session = CanvasSession::new(&config(), None);
        assert_eq!(session.dimensions(), (64, 48));

        let session = CanvasSession::new(&config(), Some(0));
        assert_eq!(session.dimensions(), (64, 48));
    }

    #[test]
    fn test_new_session_is_blank() {
        let session = CanvasSession::new(&config(), None);
        assert!(session.artifact().is_empty());
        assert!(session.is_blank());
        assert!(!session.is_stroking());
    }

    #[test]
    fn test_stroke_paints_with_brush_color() {
        let mut session = CanvasSession::new(&config(), None);
        session.set_color(RED);
        session.begin_stroke(5.0, 10.0);
        session.extend_stroke(40.0, 10.0);
        let artifact = session.end_stroke().unwrap();

        assert!(!artifact.is_empty());
        assert_eq!(*session.surface().get_pixel(20, 10), RED);
        assert_eq!(session.artifact(), &artifact);
    }

    #[test]
    fn test_extend_without_stroke_is_noop() {
        let mut session = CanvasSession::new(&config(), None);
        session.extend_stroke(10.0, 10.0);
        assert!(session.surface().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_end_without_stroke_is_noop() {
        let mut session = CanvasSession::new(&config(), None);
        assert!(session.end_stroke().is_none());
        assert!(session.artifact().is_empty());
    }

    #[test]
    fn test_begin_twice_restarts_from_new_point() {
        let mut session = CanvasSession::new(&config(), None);
        session.set_brush_size(1);
        session.begin_stroke(0.0, 0.0);
        session.begin_stroke(30.0, 30.0);
        session.extend_stroke(32.0, 30.0);
        session.end_stroke();

        assert_eq!(session.surface().get_pixel(0, 0).0[3], 0);
        assert_eq!(session.surface().get_pixel(15, 15).0[3], 0);
        assert_eq!(session.surface().get_pixel(31, 30).0[3], 255);
    }

    #[test]
    fn test_single_point_stroke_is_visible() {
        let mut blank = CanvasSession::new(&config(), None);
        let blank_artifact = blank.snapshot();

        let mut session = CanvasSession::new(&config(), None);
        session.begin_stroke(12.0, 12.0);
        let artifact = session.end_stroke().unwrap();

        assert!(!artifact.is_empty());
        assert_ne!(artifact, blank_artifact);
        assert_eq!(session.surface().get_pixel(12, 12).0[3], 255);
    }

    #[test]
    fn test_set_brush_size_clamps() {
        let mut session = CanvasSession::new(&config(), None);
        assert_eq!(session.set_brush_size(0), 1);
        assert_eq!(session.set_brush_size(100), 48);
        assert_eq!(session.brush().width(), 48);
    }

    #[test]
    fn test_clear_empties_surface_and_artifact() {
        let mut session = CanvasSession::new(&config(), None);
        session.begin_stroke(1.0, 1.0);
        session.extend_stroke(20.0, 20.0);
        session.end_stroke();
        assert!(!session.artifact().is_empty());

        session.clear();
        assert!(session.artifact().is_empty());
        assert!(session.surface().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_snapshot_of_zero_sized_surface_is_empty() {
        let mut session = CanvasSession::new(
            &CanvasConfig {
                height: 0,
                ..config()
            },
            None,
        );
        assert!(session.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_snapshot_is_idempotent() {
        let mut session = CanvasSession::new(&config(), None);
        session.set_color(RED);
        session.set_brush_size(5);
        session.begin_stroke(3.0, 3.0);
        session.extend_stroke(50.0, 40.0);
        session.end_stroke();
        let first = session.snapshot();

        let mut reopened = CanvasSession::initialize(&config(), None, Some(&first)).await;
        assert_eq!(reopened.artifact(), &first);
        assert_eq!(reopened.snapshot(), first);
    }

    #[tokio::test]
    async fn test_initialize_scales_seed_to_surface() {
        let seed = Artifact::encode_png(&RgbaImage::from_pixel(10, 10, BLUE)).unwrap();
        let session = CanvasSession::initialize(&config(), Some(100), Some(&seed)).await;

        assert_eq!(session.dimensions(), (100, 48));
        assert!(close_to(*session.surface().get_pixel(50, 24), BLUE));
    }

    #[tokio::test]
    async fn test_initialize_with_undecodable_seed_starts_blank() {
        let seed = Artifact::from_bytes(PNG_DESCRIPTOR, b"not a png");
        let session = CanvasSession::initialize(&config(), None, Some(&seed)).await;

        assert!(session.artifact().is_empty());
        assert!(session.surface().pixels().all(|p| p.0[3] == 0));
    }

    #[tokio::test]
    async fn test_initialize_with_malformed_seed_starts_blank() {
        let seed = Artifact::from("no comma here");
        let session = CanvasSession::initialize(&config(), None, Some(&seed)).await;
        assert!(session.artifact().is_empty());
    }

    #[tokio::test]
    async fn test_erase_reveals_background() {
        let photo = Artifact::encode_png(&RgbaImage::from_pixel(64, 48, BLUE)).unwrap();
        let mut session = CanvasSession::initialize(&config(), None, Some(&photo)).await;

        session.set_eraser(true);
        session.set_brush_size(6);
        session.begin_stroke(10.0, 20.0);
        session.extend_stroke(50.0, 20.0);
        let artifact = session.end_stroke().unwrap();

        let decoded = artifact.decode_image().unwrap();
        assert_eq!(decoded.get_pixel(30, 20).0[3], 0);
        assert_eq!(*decoded.get_pixel(30, 5), BLUE);

        let green = Rgba([34, 197, 94, 255]);
        let mut background = RgbaImage::from_pixel(64, 48, green);
        imageops::overlay(&mut background, &decoded, 0, 0);
        assert_eq!(*background.get_pixel(30, 20), green);
        assert_ne!(*background.get_pixel(30, 20), session.brush().color());
    }

    #[tokio::test]
    async fn test_capture_photo_ignores_erase_mode() {
        let mut session = CanvasSession::new(&config(), None);
        session.set_eraser(true);

        let outcome = session
            .capture_photo(png_bytes(&RgbaImage::from_pixel(8, 8, BLUE)))
            .await;

        let PhotoOutcome::Applied(artifact) = outcome else {
            panic!("expected photo to be applied, got {outcome:?}");
        };
        assert_eq!(session.artifact(), &artifact);
        assert!(close_to(*session.surface().get_pixel(32, 24), BLUE));
        assert!(session.brush().is_eraser());
    }

    #[tokio::test]
    async fn test_capture_photo_bad_bytes() {
        let mut session = CanvasSession::new(&config(), None);
        let outcome = session.capture_photo(b"garbage".to_vec()).await;

        assert_eq!(outcome, PhotoOutcome::DecodeFailed);
        assert!(session.artifact().is_empty());
    }

    #[tokio::test]
    async fn test_photo_superseded_by_later_stroke() {
        let mut session = CanvasSession::new(&config(), None);
        let pending = session.request_photo(blue_photo());

        session.set_color(RED);
        session.begin_stroke(1.0, 1.0);
        session.end_stroke();

        assert_eq!(session.finish_photo(pending).await, PhotoOutcome::Superseded);
        assert_ne!(*session.surface().get_pixel(32, 24), BLUE);
    }

    #[tokio::test]
    async fn test_photo_deferred_behind_active_stroke() {
        let mut session = CanvasSession::new(&config(), None);
        session.set_color(RED);
        session.begin_stroke(1.0, 1.0);

        let pending = session.request_photo(blue_photo());
        session.extend_stroke(10.0, 1.0);

        assert_eq!(session.finish_photo(pending).await, PhotoOutcome::Deferred);
        assert_ne!(*session.surface().get_pixel(32, 24), BLUE);

        let artifact = session.end_stroke().unwrap();
        let decoded = artifact.decode_image().unwrap();
        assert_eq!(*decoded.get_pixel(32, 24), BLUE);
        // The opaque photo lands on top of the stroke
        assert_eq!(*decoded.get_pixel(5, 1), BLUE);
    }

    #[tokio::test]
    async fn test_resize_preserves_picture() {
        let mut session = CanvasSession::new(&config(), None);
        session.set_color(RED);
        session.set_brush_size(48);
        session.begin_stroke(32.0, 24.0);
        session.end_stroke();

        session.resize(Some(128)).await;
        assert_eq!(session.dimensions(), (128, 48));
        assert!(close_to(*session.surface().get_pixel(64, 24), RED));
        assert!(!session.artifact().is_empty());
    }

    #[tokio::test]
    async fn test_resize_ends_active_stroke() {
        let mut session = CanvasSession::new(&config(), None);
        session.begin_stroke(4.0, 4.0);
        session.resize(Some(64)).await;

        assert!(!session.is_stroking());
        assert!(!session.artifact().is_empty());
    }

    #[tokio::test]
    async fn test_resize_blank_stays_blank() {
        let mut session = CanvasSession::new(&config(), None);
        session.resize(Some(32)).await;
        assert_eq!(session.dimensions(), (32, 48));
        assert!(session.surface().pixels().all(|p| p.0[3] == 0));
        assert!(session.artifact().is_empty());

        session.resize(None).await;
        assert!(session.artifact().is_empty());
    }

    #[tokio::test]
    async fn test_resize_after_clear_keeps_artifact_empty() {
        let mut session = CanvasSession::new(&config(), None);
        session.begin_stroke(10.0, 10.0);
        session.end_stroke();
        session.clear();

        session.resize(Some(80)).await;
        assert!(session.artifact().is_empty());
        assert!(session.is_blank());
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let mut session = CanvasSession::new(&config(), None);
        session.begin_stroke(f32::NAN, f32::NAN);
        assert!(!session.is_stroking());
        assert!(session.end_stroke().is_none());
        assert!(session.is_blank());

        session.set_brush_size(1);
        session.begin_stroke(1.0, 1.0);
        session.extend_stroke(f32::INFINITY, 1.0);
        session.extend_stroke(10.0, 1.0);
        session.end_stroke();

        assert_eq!(session.surface().get_pixel(5, 1).0[3], 255);
        assert_eq!(session.surface().get_pixel(40, 1).0[3], 0);
    }

    #[test]
    fn test_far_extend_paints_to_the_edge() {
        let mut session = CanvasSession::new(&config(), None);
        session.set_brush_size(1);
        session.begin_stroke(0.0, 20.0);
        session.extend_stroke(2.0e8, 20.0);
        session.end_stroke();

        assert_eq!(session.surface().get_pixel(63, 20).0[3], 255);
        assert_eq!(session.surface().get_pixel(0, 21).0[3], 0);
    }

    #[tokio::test]
    async fn test_restarted_stroke_drops_deferred_photo() {
        let mut session = CanvasSession::new(&config(), None);
        session.set_color(RED);
        session.begin_stroke(1.0, 1.0);

        let pending = session.request_photo(blue_photo());
        assert_eq!(session.finish_photo(pending).await, PhotoOutcome::Deferred);

        session.begin_stroke(20.0, 20.0);
        let artifact = session.end_stroke().unwrap();
        let decoded = artifact.decode_image().unwrap();
        assert_ne!(*decoded.get_pixel(32, 40), BLUE);
        assert_eq!(*decoded.get_pixel(20, 20), RED);
    }

    fn replay(points: &[(f32, f32)], width: i64, erase: bool) -> RgbaImage {
        let mut session = CanvasSession::new(&config(), None);
        session.set_color(RED);
        session.set_brush_size(width);
        session.set_eraser(erase);
        if let Some((&(x, y), rest)) = points.split_first() {
            session.begin_stroke(x, y);
            for &(x, y) in rest {
                session.extend_stroke(x, y);
            }
            session.end_stroke();
        }
        session.surface().clone()
    }

    proptest! {
        #[test]
        fn prop_stroke_replay_is_deterministic(
            points in prop::collection::vec((-10.0f32..80.0, -10.0f32..60.0), 1..12),
            width in 1i64..16,
        ) {
            prop_assert_eq!(replay(&points, width, false), replay(&points, width, false));
        }

        #[test]
        fn prop_erasing_a_blank_surface_leaves_it_blank(
            points in prop::collection::vec((0.0f32..64.0, 0.0f32..48.0), 1..8),
        ) {
            let surface = replay(&points, 8, true);
            prop_assert!(surface.pixels().all(|p| p.0[3] == 0));
        }
    }
}
