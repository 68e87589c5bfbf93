//! JSON configuration and report helpers for replaying captured frames.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ab_glyph::FontArc;
use handmark_core::CameraIntrinsics;
use handmark_gesture::CorrespondenceOutcome;
use handmark_segment::ColorInterval;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{
    FrameDiagnostics, FrameResult, HandPipeline, PipelineParams, PoseStage, DEFAULT_MARKER_SIZE,
};

#[derive(thiserror::Error, Debug)]
pub enum HandmarkIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("label font is not a TrueType/OpenType font")]
    Font(#[from] ab_glyph::InvalidFont),
}

fn default_marker_size() -> f64 {
    DEFAULT_MARKER_SIZE
}

fn default_input_dir() -> String {
    "frames".to_string()
}

/// A pixel the operator picked as skin, applied before frame `frame` is
/// processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationSample {
    pub frame: usize,
    pub x: i32,
    pub y: i32,
}

/// Configuration of one replay run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandmarkConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub annotated_dir: Option<String>,
    #[serde(default)]
    pub preview_dir: Option<String>,
    /// TrueType/OpenType font for the finger-count label; no label without.
    #[serde(default)]
    pub label_font: Option<String>,
    /// Initial interval, as if set with the two slider setters.
    #[serde(default)]
    pub interval: Option<ColorInterval>,
    #[serde(default)]
    pub samples: Vec<CalibrationSample>,
    #[serde(default)]
    pub pipeline: PipelineParams,
    /// Enables the planar pose stage.
    #[serde(default)]
    pub camera: Option<CameraIntrinsics>,
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    #[serde(default)]
    pub texture_count: usize,
    #[serde(default)]
    pub model_count: usize,
}

impl Default for HandmarkConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_path: None,
            annotated_dir: None,
            preview_dir: None,
            label_font: None,
            interval: None,
            samples: Vec::new(),
            pipeline: PipelineParams::default(),
            camera: Some(CameraIntrinsics::default()),
            marker_size: DEFAULT_MARKER_SIZE,
            texture_count: 1,
            model_count: 1,
        }
    }
}

impl HandmarkConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, HandmarkIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), HandmarkIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("handmark_report.json"))
    }

    /// Load the configured label font, if any.
    pub fn load_label_font(&self) -> Result<Option<FontArc>, HandmarkIoError> {
        match &self.label_font {
            Some(path) => Ok(Some(FontArc::try_from_vec(fs::read(path)?)?)),
            None => Ok(None),
        }
    }

    /// Build a pipeline with the configured interval and pose stage.
    pub fn build_pipeline(&self) -> HandPipeline {
        let mut pipeline = HandPipeline::new(self.pipeline.clone());
        if let Some(interval) = self.interval {
            let calibrator = pipeline.calibrator_mut();
            calibrator.set_lower_bound(interval.min);
            calibrator.set_upper_bound(interval.max);
        }
        match self.camera {
            Some(camera) => pipeline.with_pose_stage(PoseStage::planar(camera, self.marker_size)),
            None => pipeline,
        }
    }
}

/// Per-frame entry of a [`RunReport`].
#[derive(Clone, Debug, Serialize)]
pub struct FrameRecord {
    /// Position in the capture sequence, skipped captures included.
    pub index: usize,
    pub finger_count: u32,
    pub advance: bool,
    pub relevant_points: Vec<Point2<i32>>,
    pub centroid: Option<Point2<i32>>,
    pub correspondence: CorrespondenceOutcome,
    /// Column-major OpenGL model-view matrix.
    pub view_matrix: Option<[f64; 16]>,
    pub diagnostics: FrameDiagnostics,
}

impl FrameRecord {
    pub fn new(index: usize, result: &FrameResult) -> Self {
        Self {
            index,
            finger_count: result.finger_count,
            advance: result.advance.is_some(),
            relevant_points: result.relevant_points.clone(),
            centroid: result.centroid,
            correspondence: result.correspondence.clone(),
            view_matrix: result.pose.as_ref().map(|p| p.view_matrix_array()),
            diagnostics: result.diagnostics.clone(),
        }
    }
}

/// Summary of a replay run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    pub input_dir: String,
    pub frames_processed: usize,
    pub frames_skipped: usize,
    pub advances: usize,
    pub final_interval: ColorInterval,
    pub active_texture: usize,
    pub active_model: usize,
    pub frames: Vec<FrameRecord>,
}

impl RunReport {
    pub fn new(cfg: &HandmarkConfig) -> Self {
        Self {
            input_dir: cfg.input_dir.clone(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, index: usize, result: &FrameResult) {
        self.frames_processed += 1;
        self.frames.push(FrameRecord::new(index, result));
    }

    /// Write the report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), HandmarkIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let cfg = HandmarkConfig {
            interval: Some(ColorInterval::new(150, 200)),
            samples: vec![CalibrationSample { frame: 0, x: 5, y: 6 }],
            ..HandmarkConfig::default()
        };
        cfg.write_json(&path).unwrap();
        assert_eq!(HandmarkConfig::load_json(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: HandmarkConfig = serde_json::from_str(r#"{ "input_dir": "shots" }"#).unwrap();
        assert_eq!(cfg.input_dir, "shots");
        assert_eq!(cfg.marker_size, DEFAULT_MARKER_SIZE);
        assert_eq!(cfg.pipeline, PipelineParams::default());
        assert!(cfg.camera.is_none());
        assert_eq!(cfg.output_path(), PathBuf::from("handmark_report.json"));
    }

    #[test]
    fn configured_interval_reaches_the_calibrator() {
        let cfg = HandmarkConfig {
            interval: Some(ColorInterval::new(10, 20)),
            ..HandmarkConfig::default()
        };
        let pipeline = cfg.build_pipeline();
        assert_eq!(pipeline.calibrator().interval(), ColorInterval::new(10, 20));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            HandmarkConfig::load_json(&path),
            Err(HandmarkIoError::Json(_))
        ));
        assert!(matches!(
            HandmarkConfig::load_json(dir.path().join("missing.json")),
            Err(HandmarkIoError::Io(_))
        ));
    }

    #[test]
    fn label_font_is_optional_and_validated() {
        assert!(HandmarkConfig::default().load_label_font().unwrap().is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        fs::write(&path, b"not a font").unwrap();
        let cfg = HandmarkConfig {
            label_font: Some(path.to_string_lossy().into_owned()),
            ..HandmarkConfig::default()
        };
        assert!(matches!(cfg.load_label_font(), Err(HandmarkIoError::Font(_))));
    }
}
