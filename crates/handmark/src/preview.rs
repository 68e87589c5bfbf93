//! Operator feedback: mask thumbnail and frame annotations.

use ab_glyph::{FontArc, PxScale};
use handmark_gesture::HandAnalysis;
use image::imageops::{self, FilterType};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut};
use nalgebra::Point2;

pub const PREVIEW_WIDTH: u32 = 128;
pub const PREVIEW_HEIGHT: u32 = 96;

/// Offset of the thumbnail's top-left corner from the right / bottom edge.
pub const PREVIEW_OFFSET_X: u32 = 135;
pub const PREVIEW_OFFSET_Y: u32 = 103;

const MARKER_RADIUS: i32 = 8;
const GUIDE_COLOR: Rgb<u8> = Rgb([128, 128, 128]);
pub const START_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const FAR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const END_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Top-left corner of the finger-count label.
pub const LABEL_ORIGIN: (i32, i32) = (10, 8);
const LABEL_SCALE: f32 = 24.0;
const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Text of the finger-count label; only drawn once more than one finger is
/// visible.
pub fn finger_label(finger_count: u32) -> Option<String> {
    (finger_count > 1).then(|| format!("Fingers: {finger_count}"))
}

/// The mask as a 128×96 color thumbnail.
pub fn mask_thumbnail(mask: &GrayImage) -> RgbImage {
    let color = RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        let v = mask.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    });
    imageops::resize(&color, PREVIEW_WIDTH, PREVIEW_HEIGHT, FilterType::CatmullRom)
}

/// Paste `thumbnail` near the bottom-right corner of `frame`.
///
/// Returns `false` and leaves the frame untouched when it is too small to
/// hold the thumbnail at the fixed offset.
pub fn composite_preview(frame: &mut RgbImage, thumbnail: &RgbImage) -> bool {
    let (w, h) = frame.dimensions();
    if w < PREVIEW_OFFSET_X || h < PREVIEW_OFFSET_Y {
        return false;
    }
    imageops::replace(
        frame,
        thumbnail,
        (w - PREVIEW_OFFSET_X) as i64,
        (h - PREVIEW_OFFSET_Y) as i64,
    );
    true
}

#[inline]
fn fpt(p: Point2<i32>) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Copy of `frame` with hull edges, centroid spokes, valley markers and the
/// mask thumbnail drawn on it. The finger-count label needs a font.
pub fn annotate_frame(
    frame: &RgbImage,
    analysis: &HandAnalysis,
    thumbnail: &RgbImage,
    label_font: Option<&FontArc>,
) -> RgbImage {
    let mut out = frame.clone();
    if frame.width() == 0 || frame.height() == 0 {
        return out;
    }

    let hull = &analysis.centroid.hull;
    for (i, &p) in hull.iter().enumerate() {
        let q = hull[(i + 1) % hull.len()];
        draw_line_segment_mut(&mut out, fpt(p), fpt(q), GUIDE_COLOR);
    }

    if let Some(c) = analysis.centroid.centroid {
        for &p in &analysis.centroid.extremities {
            draw_line_segment_mut(&mut out, fpt(p), fpt(c), GUIDE_COLOR);
        }
    }

    for valley in &analysis.reading.valleys {
        for (p, color) in [
            (valley.start, START_COLOR),
            (valley.far, FAR_COLOR),
            (valley.end, END_COLOR),
        ] {
            draw_hollow_circle_mut(&mut out, (p.x, p.y), MARKER_RADIUS, color);
        }
    }

    if let (Some(font), Some(text)) = (label_font, finger_label(analysis.finger_count())) {
        let (x, y) = LABEL_ORIGIN;
        draw_text_mut(&mut out, LABEL_COLOR, x, y, PxScale::from(LABEL_SCALE), font, &text);
    }

    composite_preview(&mut out, thumbnail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn thumbnail_has_fixed_size() {
        let mask = GrayImage::from_fn(640, 480, |x, _| Luma([if x < 320 { 255 } else { 0 }]));
        let thumb = mask_thumbnail(&mask);
        assert_eq!(thumb.dimensions(), (PREVIEW_WIDTH, PREVIEW_HEIGHT));
        assert_eq!(thumb.get_pixel(10, 50), &Rgb([255, 255, 255]));
        assert_eq!(thumb.get_pixel(120, 50), &Rgb([0, 0, 0]));
    }

    #[test]
    fn thumbnail_lands_near_bottom_right() {
        let mut frame = RgbImage::from_pixel(320, 240, Rgb([10, 20, 30]));
        let thumb = RgbImage::from_pixel(PREVIEW_WIDTH, PREVIEW_HEIGHT, Rgb([200, 0, 0]));
        assert!(composite_preview(&mut frame, &thumb));

        let (x0, y0) = (320 - PREVIEW_OFFSET_X, 240 - PREVIEW_OFFSET_Y);
        assert_eq!(frame.get_pixel(x0, y0), &Rgb([200, 0, 0]));
        assert_eq!(frame.get_pixel(x0 + 127, y0 + 95), &Rgb([200, 0, 0]));
        assert_eq!(frame.get_pixel(x0 - 1, y0), &Rgb([10, 20, 30]));
        assert_eq!(frame.get_pixel(x0 + 128, y0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn label_needs_more_than_one_finger() {
        assert_eq!(finger_label(0), None);
        assert_eq!(finger_label(1), None);
        assert_eq!(finger_label(5).as_deref(), Some("Fingers: 5"));
    }

    #[test]
    fn valley_markers_are_blue_green_red() {
        assert_eq!(START_COLOR, Rgb([0, 0, 255]));
        assert_eq!(FAR_COLOR, Rgb([0, 255, 0]));
        assert_eq!(END_COLOR, Rgb([255, 0, 0]));
    }

    #[test]
    fn small_frames_are_left_alone() {
        let mut frame = RgbImage::from_pixel(100, 80, Rgb([1, 2, 3]));
        let thumb = RgbImage::from_pixel(PREVIEW_WIDTH, PREVIEW_HEIGHT, Rgb([9, 9, 9]));
        assert!(!composite_preview(&mut frame, &thumb));
        assert!(frame.pixels().all(|p| *p == Rgb([1, 2, 3])));
    }
}
