//! Per-frame driver: segmentation, gesture analysis, correspondence, pose.
//!
//! All state that survives between frames (the calibrated interval and the
//! previous finger count) lives in [`HandPipeline`]; nothing is global.

use ab_glyph::FontArc;
use handmark_core::{CameraIntrinsics, PlanarPoseSolver, Pose, PoseSolver};
use handmark_gesture::{
    AdvanceSelection, CorrespondenceOutcome, DepthStats, GestureParams, GestureState,
    HandAnalyzer, HullDiagnostics,
};
use handmark_segment::{ColorCalibrator, ColorInterval, SegmentParams, Segmenter};
use image::{GrayImage, RgbImage};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::preview::{annotate_frame, mask_thumbnail};
use crate::{Capture, FrameSource, PreviewSink, SelectionSink};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Physical edge length used to scale the hand marker, in meters.
pub const DEFAULT_MARKER_SIZE: f64 = 0.08;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub segment: SegmentParams,
    pub gesture: GestureParams,
    /// Draw hull, spokes, valley markers and the thumbnail onto a frame copy.
    pub annotate: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            segment: SegmentParams::default(),
            gesture: GestureParams::default(),
            annotate: true,
        }
    }
}

/// Pose solver together with the camera it runs against.
pub struct PoseStage {
    pub solver: Box<dyn PoseSolver>,
    pub camera: CameraIntrinsics,
    pub marker_size: f64,
}

impl PoseStage {
    pub fn planar(camera: CameraIntrinsics, marker_size: f64) -> Self {
        Self {
            solver: Box::new(PlanarPoseSolver),
            camera,
            marker_size,
        }
    }
}

impl std::fmt::Debug for PoseStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseStage")
            .field("camera", &self.camera)
            .field("marker_size", &self.marker_size)
            .finish_non_exhaustive()
    }
}

/// Tuning counters of one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrameDiagnostics {
    pub interval: ColorInterval,
    pub contours: usize,
    pub depth_stats: Vec<DepthStats>,
    pub hull: Option<HullDiagnostics>,
}

/// Output of one pipeline pass.
#[derive(Clone, Debug)]
pub struct FrameResult {
    pub finger_count: u32,
    pub advance: Option<AdvanceSelection>,
    pub relevant_points: Vec<Point2<i32>>,
    pub centroid: Option<Point2<i32>>,
    pub correspondence: CorrespondenceOutcome,
    /// `None` when there is no correspondence or the solver failed.
    pub pose: Option<Pose>,
    pub mask: GrayImage,
    pub preview: RgbImage,
    pub annotated: Option<RgbImage>,
    pub diagnostics: FrameDiagnostics,
}

#[derive(Debug)]
pub enum TickOutcome {
    Processed(Box<FrameResult>),
    Skipped,
    Exhausted,
}

#[derive(Debug)]
pub struct HandPipeline {
    calibrator: ColorCalibrator,
    segmenter: Segmenter,
    analyzer: HandAnalyzer,
    pose: Option<PoseStage>,
    annotate: bool,
    label_font: Option<FontArc>,
}

impl Default for HandPipeline {
    fn default() -> Self {
        Self::new(PipelineParams::default())
    }
}

impl HandPipeline {
    pub fn new(params: PipelineParams) -> Self {
        Self {
            calibrator: ColorCalibrator::new(params.segment.channel),
            segmenter: Segmenter::new(params.segment),
            analyzer: HandAnalyzer::new(params.gesture),
            pose: None,
            annotate: params.annotate,
            label_font: None,
        }
    }

    pub fn with_pose_stage(mut self, stage: PoseStage) -> Self {
        self.pose = Some(stage);
        self
    }

    /// Font for the finger-count label on annotated frames.
    pub fn with_label_font(mut self, font: FontArc) -> Self {
        self.label_font = Some(font);
        self
    }

    /// Calibration entry point for the operator UI (bounds and sampling).
    pub fn calibrator_mut(&mut self) -> &mut ColorCalibrator {
        &mut self.calibrator
    }

    pub fn calibrator(&self) -> &ColorCalibrator {
        &self.calibrator
    }

    pub fn gesture_state(&self) -> GestureState {
        self.analyzer.state()
    }

    /// Run one full pass over `frame`. Never fails: degenerate input yields
    /// the baseline finger count and no pose.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn process(&mut self, frame: &RgbImage) -> FrameResult {
        let interval = self.calibrator.interval();
        let mask = self.segmenter.segment(frame, &interval);
        let analysis = self.analyzer.analyze(&mask);

        let pose = match (&self.pose, analysis.correspondence.matrix()) {
            (Some(stage), Some(m)) => match stage.solver.solve(
                &m.image_points,
                &m.coefficients,
                stage.marker_size,
                &stage.camera,
            ) {
                Ok(pose) => Some(pose),
                Err(err) => {
                    log::warn!("no overlay this frame: {err}");
                    None
                }
            },
            _ => None,
        };

        let preview = mask_thumbnail(&mask);
        let annotated = self
            .annotate
            .then(|| annotate_frame(frame, &analysis, &preview, self.label_font.as_ref()));

        let diagnostics = FrameDiagnostics {
            interval,
            contours: analysis.contours.len(),
            depth_stats: analysis.reading.depth_stats.clone(),
            hull: analysis.centroid.diagnostics,
        };

        FrameResult {
            finger_count: analysis.reading.finger_count,
            advance: analysis.advance,
            relevant_points: analysis.reading.relevant_points,
            centroid: analysis.centroid.centroid,
            correspondence: analysis.correspondence,
            pose,
            mask,
            preview,
            annotated,
            diagnostics,
        }
    }

    /// Forward a result to the selection and preview sinks.
    pub fn publish<S, P>(result: &FrameResult, selection: &mut S, preview: &mut P)
    where
        S: SelectionSink + ?Sized,
        P: PreviewSink + ?Sized,
    {
        selection.finger_count(result.finger_count);
        if let Some(event) = result.advance {
            selection.advance(event);
        }
        preview.show(&result.preview);
    }

    /// Grab one frame, process it and publish the result. A frame without
    /// pixels counts as a skipped tick.
    pub fn tick<F, S, P>(&mut self, source: &mut F, selection: &mut S, preview: &mut P) -> TickOutcome
    where
        F: FrameSource + ?Sized,
        S: SelectionSink + ?Sized,
        P: PreviewSink + ?Sized,
    {
        match source.grab() {
            Capture::Frame(frame) if frame.width() == 0 || frame.height() == 0 => {
                log::debug!("empty frame this tick");
                TickOutcome::Skipped
            }
            Capture::Frame(frame) => {
                let result = self.process(&frame);
                Self::publish(&result, selection, preview);
                TickOutcome::Processed(Box::new(result))
            }
            Capture::Skipped => {
                log::debug!("no frame this tick");
                TickOutcome::Skipped
            }
            Capture::Exhausted => TickOutcome::Exhausted,
        }
    }
}
