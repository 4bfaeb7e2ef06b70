//! Rasterisation of stroke segments.
//!
//! Segments are drawn as a run of round brush stamps. Each segment is first
//! clipped to the surface (grown by the brush radius), so the cost of one call
//! depends only on the visible length and the brush width.

use std::ops::Range;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// A position on the surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: f32,
    /// Vertical offset from the top edge.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Draw a straight segment with round caps.
///
/// Pixels are overwritten with `ink`, so a transparent ink clears them.
/// Segments with a non-finite endpoint draw nothing.
pub fn stamp_segment(surface: &mut RgbaImage, from: Point, to: Point, width: u32, ink: Rgba<u8>) {
    if !(from.is_finite() && to.is_finite()) {
        return;
    }

    let margin = f64::from(width) / 2.0 + 1.0;
    let Some((from, to)) = clip_segment(
        from,
        to,
        (-margin, -margin),
        (
            f64::from(surface.width()) + margin,
            f64::from(surface.height()) + margin,
        ),
    ) else {
        return;
    };

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs()).ceil() as u32;

    if steps == 0 {
        stamp_dot(surface, from, width, ink);
        return;
    }

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp_dot(
            surface,
            Point::new(from.x + dx * t, from.y + dy * t),
            width,
            ink,
        );
    }
}

/// Draw a single round brush stamp centred on `at`.
///
/// The stamp is exactly `width` pixels across. Odd widths are centred on the
/// nearest pixel, even widths on the nearest pixel corner.
pub fn stamp_dot(surface: &mut RgbaImage, at: Point, width: u32, ink: Rgba<u8>) {
    if width == 0 || !at.is_finite() {
        return;
    }

    let radius = f64::from(width) / 2.0;
    let cx = disc_centre(at.x, width);
    let cy = disc_centre(at.y, width);
    let columns = pixel_span(cx, radius, surface.width());

    for y in pixel_span(cy, radius, surface.height()) {
        let oy = f64::from(y) - cy;
        for x in columns.clone() {
            let ox = f64::from(x) - cx;
            if ox * ox + oy * oy <= radius * radius {
                surface.put_pixel(x, y, ink);
            }
        }
    }
}

fn disc_centre(v: f32, width: u32) -> f64 {
    let v = f64::from(v);
    if width % 2 == 0 {
        v.floor() + 0.5
    } else {
        v.round()
    }
}

/// Pixel indices within `radius` of `centre`, limited to `0..len`.
fn pixel_span(centre: f64, radius: f64, len: u32) -> Range<u32> {
    let lo = (centre - radius).ceil().max(0.0);
    let hi = ((centre + radius).floor() + 1.0).min(f64::from(len));
    if hi <= lo {
        return 0..0;
    }
    (lo as u32)..(hi as u32)
}

/// Clip a segment to the rectangle `min..=max` (Liang-Barsky).
///
/// Returns `None` when no part of the segment lies inside.
fn clip_segment(from: Point, to: Point, min: (f64, f64), max: (f64, f64)) -> Option<(Point, Point)> {
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let dx = f64::from(to.x) - x0;
    let dy = f64::from(to.y) - y0;
    let mut enter = 0.0_f64;
    let mut exit = 1.0_f64;

    for (p, q) in [
        (-dx, x0 - min.0),
        (dx, max.0 - x0),
        (-dy, y0 - min.1),
        (dy, max.1 - y0),
    ] {
        if p.abs() < f64::EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            enter = enter.max(t);
        } else {
            exit = exit.min(t);
        }
        if enter > exit {
            return None;
        }
    }

    let at = |t: f64| Point::new((x0 + dx * t) as f32, (y0 + dy * t) as f32);
    Some((at(enter), at(exit)))
}
