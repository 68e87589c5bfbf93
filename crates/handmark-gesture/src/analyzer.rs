use image::GrayImage;
use serde::Serialize;

use crate::{
    analyze_contours, build_correspondence, estimate_centroid, extract_hand_contours,
    AdvanceSelection, CentroidPass, CorrespondenceOutcome, GestureParams, GestureReading,
    GestureState, GestureTracker, HandContour,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Everything derived from one mask.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HandAnalysis {
    pub contours: Vec<HandContour>,
    pub reading: GestureReading,
    pub advance: Option<AdvanceSelection>,
    pub centroid: CentroidPass,
    pub correspondence: CorrespondenceOutcome,
}

impl HandAnalysis {
    pub fn finger_count(&self) -> u32 {
        self.reading.finger_count
    }
}

/// Runs extraction, counting, centroid and correspondence on one mask and
/// owns the finger count carried between frames.
#[derive(Clone, Debug, Default)]
pub struct HandAnalyzer {
    params: GestureParams,
    tracker: GestureTracker,
}

impl HandAnalyzer {
    pub fn new(params: GestureParams) -> Self {
        Self {
            params,
            tracker: GestureTracker::new(),
        }
    }

    pub fn params(&self) -> &GestureParams {
        &self.params
    }

    pub fn state(&self) -> GestureState {
        self.tracker.state()
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, mask), fields(width = mask.width(), height = mask.height()))
    )]
    pub fn analyze(&mut self, mask: &GrayImage) -> HandAnalysis {
        let contours = extract_hand_contours(mask, &self.params);
        let reading = analyze_contours(&contours, self.params.min_defects);
        let advance = self.tracker.update(reading.finger_count);
        if let Some(event) = advance {
            log::info!(
                "advance selection: {} -> {} fingers",
                event.previous,
                event.current
            );
        }

        let centroid = estimate_centroid(mask, &self.params);
        let correspondence = build_correspondence(&reading.relevant_points, centroid.centroid);

        log::debug!(
            "{} contours, {} fingers, {} relevant points, correspondence ready: {}",
            contours.len(),
            reading.finger_count,
            reading.relevant_points.len(),
            correspondence.is_ready()
        );

        HandAnalysis {
            contours,
            reading,
            advance,
            centroid,
            correspondence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn empty_mask_reports_baseline_and_no_matrix() {
        let mut analyzer = HandAnalyzer::default();
        let analysis = analyzer.analyze(&GrayImage::new(80, 60));
        assert_eq!(analysis.finger_count(), 1);
        assert!(analysis.contours.is_empty());
        assert!(analysis.advance.is_none());
        assert!(analysis.correspondence.coefficients().is_empty());
        assert_eq!(analyzer.state().previous, 1);
    }

    #[test]
    fn filled_disc_is_one_finger() {
        let mask = GrayImage::from_fn(160, 160, |x, y| {
            let dx = x as i32 - 80;
            let dy = y as i32 - 80;
            Luma([if dx * dx + dy * dy <= 40 * 40 { 255 } else { 0 }])
        });
        let mut analyzer = HandAnalyzer::default();
        let analysis = analyzer.analyze(&mask);
        assert_eq!(analysis.contours.len(), 1);
        assert_eq!(analysis.finger_count(), 1);
        assert!(analysis.reading.relevant_points.is_empty());
        assert_eq!(
            analysis.correspondence,
            CorrespondenceOutcome::Unhandled { points: 0 }
        );
        assert_eq!(analysis.centroid.centroid, None);
    }
}
