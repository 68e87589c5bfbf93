//! Offline run: feed a directory of captured frames through the pipeline.

use std::fs;
use std::path::Path;

use crate::{
    AssetCycler, Capture, DirectoryPreviewSink, FrameSource, HandPipeline, HandmarkConfig,
    HandmarkIoError, ImageSequenceSource, NullPreviewSink, PreviewSink, RunReport,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Replay `cfg.input_dir` and return the run report.
///
/// Calibration samples are applied to their frame right before it is
/// processed, the way an operator click lands on the live image.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(cfg), fields(input = %cfg.input_dir)))]
pub fn replay(cfg: &HandmarkConfig) -> Result<RunReport, HandmarkIoError> {
    let mut source = ImageSequenceSource::from_dir(&cfg.input_dir)?;
    log::info!("replaying {} frames from {}", source.len(), cfg.input_dir);

    let mut pipeline = cfg.build_pipeline();
    if let Some(font) = cfg.load_label_font()? {
        pipeline = pipeline.with_label_font(font);
    }
    let mut cycler = AssetCycler::new(cfg.texture_count, cfg.model_count);
    let mut preview: Box<dyn PreviewSink> = match &cfg.preview_dir {
        Some(dir) => Box::new(DirectoryPreviewSink::new(dir)?),
        None => Box::new(NullPreviewSink),
    };
    if let Some(dir) = &cfg.annotated_dir {
        fs::create_dir_all(dir)?;
    }

    let mut report = RunReport::new(cfg);
    let mut index = 0usize;
    loop {
        let frame = match source.grab() {
            Capture::Frame(frame) => frame,
            Capture::Skipped => {
                report.frames_skipped += 1;
                index += 1;
                continue;
            }
            Capture::Exhausted => break,
        };

        for sample in cfg.samples.iter().filter(|s| s.frame == index) {
            match pipeline.calibrator_mut().sample_at(sample.x, sample.y, &frame) {
                Ok(value) => log::debug!("sampled chroma {value} at ({}, {})", sample.x, sample.y),
                Err(err) => log::warn!("ignoring calibration sample: {err}"),
            }
        }

        let result = pipeline.process(&frame);
        HandPipeline::publish(&result, &mut cycler, &mut *preview);

        if let (Some(dir), Some(annotated)) = (&cfg.annotated_dir, &result.annotated) {
            annotated.save(Path::new(dir).join(format!("frame_{index:05}.png")))?;
        }
        report.push(index, &result);
        index += 1;
    }

    report.advances = cycler.advances;
    report.active_texture = cycler.texture_index;
    report.active_model = cycler.model_index;
    report.final_interval = pipeline.calibrator().interval();

    log::info!(
        "processed {} frames ({} skipped), {} advance events",
        report.frames_processed,
        report.frames_skipped,
        report.advances
    );
    Ok(report)
}
