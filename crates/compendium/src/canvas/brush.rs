//! Brush state owned by one canvas session.

use image::Rgba;

use crate::config::CanvasConfig;
use crate::error::{Error, Result};

/// Fully transparent pixel written by the eraser.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// How a stroke is composited onto the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushMode {
    /// Paint with the current color.
    #[default]
    Draw,
    /// Clear pixels to transparent.
    Erase,
}

/// Color, width and mode of the brush.
///
/// Draw and erase are a single enum so the two modes can never be active at
/// the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    color: Rgba<u8>,
    width: u32,
    mode: BrushMode,
    min_width: u32,
    max_width: u32,
}

impl Brush {
    /// Create a brush from canvas configuration.
    ///
    /// An unparseable configured color falls back to white.
    #[must_use]
    pub fn from_config(config: &CanvasConfig) -> Self {
        let color = parse_hex_color(&config.brush_color).unwrap_or(Rgba([255, 255, 255, 255]));
        let min_width = config.min_brush_size.max(1);
        let max_width = config.max_brush_size.max(min_width);

        Self {
            color,
            width: config.brush_size.clamp(min_width, max_width),
            mode: BrushMode::Draw,
            min_width,
            max_width,
        }
    }

    /// Current paint color.
    #[must_use]
    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    /// Current width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current compositing mode.
    #[must_use]
    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    /// Whether the eraser is active.
    #[must_use]
    pub fn is_eraser(&self) -> bool {
        self.mode == BrushMode::Erase
    }

    /// The pixel value a stroke writes.
    #[must_use]
    pub fn ink(&self) -> Rgba<u8> {
        match self.mode {
            BrushMode::Draw => self.color,
            BrushMode::Erase => TRANSPARENT,
        }
    }

    /// Set the paint color and switch to draw mode.
    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = color;
        self.mode = BrushMode::Draw;
    }

    /// Turn the eraser on or off.
    pub fn set_eraser(&mut self, on: bool) {
        self.mode = if on { BrushMode::Erase } else { BrushMode::Draw };
    }

    /// Set the width, clamped to the configured range.
    ///
    /// Returns the width actually applied.
    pub fn set_width(&mut self, width: i64) -> u32 {
        let clamped = width.clamp(i64::from(self.min_width), i64::from(self.max_width));
        self.width = u32::try_from(clamped).unwrap_or(self.min_width);
        self.width
    }
}

/// Parse `#rgb` or `#rrggbb` into an opaque color.
///
/// # Errors
///
/// Returns [`Error::InvalidColor`] for anything else.
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>> {
    let hex = value
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| Error::invalid_color(value))?;

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::invalid_color(value));
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| Error::invalid_color(value));

    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, i) in rgb.iter_mut().zip(0..3) {
                let nibble = channel(&hex[i..=i])?;
                *slot = nibble * 17;
            }
            Ok(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Ok(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        _ => Err(Error::invalid_color(value)),
    }
}
