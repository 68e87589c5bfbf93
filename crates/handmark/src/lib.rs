//! Bare-hand gesture pipeline for augmented reality.
//!
//! A calibrated chroma interval segments the hand, the convexity defects of
//! its contour give a finger count, and four valley points relative to the
//! hand centroid form a planar marker that a pose solver turns into a view
//! matrix. Showing five fingers right after four emits an
//! [`AdvanceSelection`] that cycles the active overlay asset.
//!
//! This crate provides:
//! - re-exports of the stage crates (`core`, `segment`, `gesture`)
//! - [`HandPipeline`], the per-frame driver owning all cross-frame state
//! - capture sources, selection / preview sinks and the mask thumbnail
//! - JSON config and report helpers plus [`replay`] used by the `handmark` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use handmark::{HandPipeline, PipelineParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = image::open("frame.png")?.to_rgb8();
//! let mut pipeline = HandPipeline::new(PipelineParams::default());
//! pipeline.calibrator_mut().sample_at(320, 240, &frame)?;
//!
//! let result = pipeline.process(&frame);
//! println!("fingers: {}", result.finger_count);
//! # Ok(())
//! # }
//! ```

pub use handmark_core as core;
pub use handmark_gesture as gesture;
pub use handmark_segment as segment;

mod io;
mod pipeline;
pub mod preview;
mod replay;
mod sink;
mod source;

pub use handmark_core::{CameraIntrinsics, PlanarPoseSolver, Pose, PoseError, PoseSolver};
pub use handmark_gesture::{AdvanceSelection, CorrespondenceOutcome, GestureParams};
pub use handmark_segment::{ChromaChannel, ColorInterval, SegmentParams};

pub use io::{CalibrationSample, FrameRecord, HandmarkConfig, HandmarkIoError, RunReport};
pub use pipeline::{
    FrameDiagnostics, FrameResult, HandPipeline, PipelineParams, PoseStage, TickOutcome,
    DEFAULT_MARKER_SIZE,
};
pub use replay::replay;
pub use sink::{AssetCycler, DirectoryPreviewSink, NullPreviewSink, PreviewSink, SelectionSink};
pub use source::{Capture, FrameSource, ImageSequenceSource, QueuedSource};
