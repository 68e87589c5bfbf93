//! Interval threshold plus cross-shaped opening.

use image::{GrayImage, Luma, RgbImage};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};
use serde::{Deserialize, Serialize};

use crate::{chroma_plane, ChromaChannel, ColorInterval};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Mask value for pixels whose chroma lies inside the calibrated interval.
pub const BACKGROUND: u8 = 255;
/// Mask value for every other pixel.
pub const FOREGROUND: u8 = 0;

/// Radius of the cross used for the opening (19×19 footprint).
pub const DEFAULT_MORPH_RADIUS: u8 = 9;

/// Segmentation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    pub channel: ChromaChannel,
    /// Arm length of the cross structuring element; `0` skips the opening.
    pub morph_radius: u8,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            channel: ChromaChannel::LabA,
            morph_radius: DEFAULT_MORPH_RADIUS,
        }
    }
}

/// Cross-shaped structuring element with arms of length `radius`.
pub fn cross_mask(radius: u8) -> Mask {
    let side = 2 * radius as u32 + 1;
    let r = radius as u32;
    let footprint = GrayImage::from_fn(side, side, |x, y| {
        if x == r || y == r {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    Mask::from_image(&footprint, radius, radius)
}

/// `255` where `interval` contains the chroma value, `0` elsewhere.
pub fn threshold_interval(chroma: &GrayImage, interval: &ColorInterval) -> GrayImage {
    let (w, h) = chroma.dimensions();
    let mut mask = GrayImage::new(w, h);
    for (dst, src) in mask.pixels_mut().zip(chroma.pixels()) {
        dst.0[0] = if interval.contains(src.0[0]) {
            BACKGROUND
        } else {
            FOREGROUND
        };
    }
    mask
}

/// One erosion followed by one dilation with `element`.
pub fn open_mask(mask: &GrayImage, element: &Mask) -> GrayImage {
    let eroded = grayscale_erode(mask, element);
    grayscale_dilate(&eroded, element)
}

/// Frame → binary mask stage.
pub struct Segmenter {
    params: SegmentParams,
    element: Option<Mask>,
}

impl std::fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segmenter")
            .field("params", &self.params)
            .field("opening", &self.element.is_some())
            .finish()
    }
}

impl Segmenter {
    pub fn new(params: SegmentParams) -> Self {
        let element = (params.morph_radius > 0).then(|| cross_mask(params.morph_radius));
        Self { params, element }
    }

    pub fn params(&self) -> &SegmentParams {
        &self.params
    }

    /// Segment one frame. Always succeeds; an unset or inverted interval
    /// simply yields an all-zero mask, and an empty frame an empty mask.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn segment(&self, frame: &RgbImage, interval: &ColorInterval) -> GrayImage {
        let chroma = chroma_plane(frame, self.params.channel);
        let raw = threshold_interval(&chroma, interval);
        match &self.element {
            Some(element) if raw.width() > 0 && raw.height() > 0 => open_mask(&raw, element),
            _ => raw,
        }
    }
}
