//! Skin segmentation for bare-hand AR markers.
//!
//! This crate covers the first stage of the per-frame pipeline:
//! - converting an RGB frame into a single 8-bit chroma plane,
//! - keeping the runtime-calibrated chroma interval,
//! - thresholding against that interval and cleaning the mask with a
//!   cross-shaped opening.
//!
//! Contours, hulls and gestures live in `handmark-gesture`.

mod chroma;
mod interval;
mod segment;

pub use chroma::{chroma_plane, ChromaChannel};
pub use interval::{ColorCalibrator, ColorInterval, SampleError, UNSET_BOUND};
pub use segment::{
    cross_mask, open_mask, threshold_interval, SegmentParams, Segmenter, BACKGROUND,
    DEFAULT_MORPH_RADIUS, FOREGROUND,
};
