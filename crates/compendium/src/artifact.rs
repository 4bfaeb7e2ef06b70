//! The encoded image artifact.
//!
//! An artifact is a `data:` URL (`data:image/png;base64,<payload>`) holding a
//! complete raster image in one string, so it can live in a single record
//! field. The empty string means "no image".

use std::fmt;
use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Descriptor written in front of every PNG payload this crate produces.
pub const PNG_DESCRIPTOR: &str = "data:image/png;base64";

/// Matches a `data:` descriptor that declares a base64 payload.
static DESCRIPTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(?:[A-Za-z0-9!#$&^_.+-]+/[A-Za-z0-9!#$&^_.+-]+)?(?:;[^;,]*)*;base64$")
        .expect("descriptor regex is valid")
});

/// A self-describing encoded image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifact(String);

impl Artifact {
    /// The artifact meaning "no image".
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Encode a surface as a PNG artifact.
    ///
    /// Returns `None` when the surface cannot be encoded (for example a
    /// zero-sized surface).
    #[must_use]
    pub fn encode_png(surface: &RgbaImage) -> Option<Self> {
        let (width, height) = surface.dimensions();
        if width == 0 || height == 0 {
            warn!(width, height, "refusing to encode an empty surface");
            return None;
        }

        let mut png = Vec::new();
        let encoder = PngEncoder::new(&mut png);
        if let Err(e) = encoder.write_image(surface.as_raw(), width, height, ExtendedColorType::Rgba8)
        {
            warn!(error = %e, "PNG encoding failed");
            return None;
        }

        trace!(bytes = png.len(), "encoded surface");
        Some(Self::from_bytes(PNG_DESCRIPTOR, &png))
    }

    /// Build an artifact from a descriptor (without the trailing comma) and raw bytes.
    #[must_use]
    pub fn from_bytes(descriptor: &str, bytes: &[u8]) -> Self {
        Self(format!("{descriptor},{}", STANDARD.encode(bytes)))
    }

    /// Whether this artifact means "no image".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the artifact text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the artifact, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// The descriptor part, i.e. everything before the first comma.
    #[must_use]
    pub fn descriptor(&self) -> Option<&str> {
        self.0.split_once(',').map(|(descriptor, _)| descriptor)
    }

    /// Strip the descriptor and decode the payload.
    ///
    /// Returns `None` for the empty artifact, for text without a comma
    /// separator, for a descriptor that is not a base64 `data:` URL, and for a
    /// payload that is not valid base64.
    #[must_use]
    pub fn payload(&self) -> Option<Vec<u8>> {
        let (descriptor, payload) = self.0.split_once(',')?;
        if !DESCRIPTOR.is_match(descriptor) {
            trace!(descriptor, "artifact descriptor rejected");
            return None;
        }

        let bytes = STANDARD.decode(payload.trim()).ok()?;
        if bytes.is_empty() {
            return None;
        }
        Some(bytes)
    }

    /// Decode the artifact into pixels.
    ///
    /// Any failure along the way yields `None`; callers treat that as "no image".
    #[must_use]
    pub fn decode_image(&self) -> Option<RgbaImage> {
        let bytes = self.payload()?;
        decode_bytes(&bytes)
    }
}

/// Decode an encoded image (PNG or JPEG) into RGBA pixels.
#[must_use]
pub fn decode_bytes(bytes: &[u8]) -> Option<RgbaImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            warn!(error = %e, "image decode failed");
            None
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Artifact {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Artifact {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<Option<String>> for Artifact {
    fn from(value: Option<String>) -> Self {
        Self(value.unwrap_or_default())
    }
}
