//! 8-bit chroma channels.
//!
//! Lab values follow the usual 8-bit encoding: sRGB gamma removed, D65
//! white, `a` and `b` offset by 128 and rounded. Hue follows the 8-bit
//! `0..180` convention (degrees halved).

use std::sync::OnceLock;

use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Which chroma value drives segmentation and calibration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromaChannel {
    /// CIE Lab `a` (green–red axis).
    #[default]
    LabA,
    /// CIE Lab `b` (blue–yellow axis).
    LabB,
    /// HSV hue, `0..180`.
    HsvHue,
}

impl ChromaChannel {
    /// Chroma value of a single pixel.
    pub fn value(self, px: Rgb<u8>) -> u8 {
        match self {
            ChromaChannel::LabA => lab_ab(px).0,
            ChromaChannel::LabB => lab_ab(px).1,
            ChromaChannel::HsvHue => hsv_hue(px),
        }
    }
}

/// Convert a frame into one chroma plane of the same size.
pub fn chroma_plane(frame: &RgbImage, channel: ChromaChannel) -> GrayImage {
    let (w, h) = frame.dimensions();
    let mut out = GrayImage::new(w, h);
    for (dst, src) in out.pixels_mut().zip(frame.pixels()) {
        dst.0[0] = channel.value(*src);
    }
    out
}

fn srgb_to_linear_table() -> &'static [f32; 256] {
    static TABLE: OnceLock<[f32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        std::array::from_fn(|i| {
            let c = i as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    })
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

#[inline]
fn saturate(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn lab_ab(px: Rgb<u8>) -> (u8, u8) {
    let lut = srgb_to_linear_table();
    let [r, g, b] = px.0.map(|c| lut[c as usize]);

    let x = (0.412453 * r + 0.357580 * g + 0.180423 * b) / 0.950456;
    let y = 0.212671 * r + 0.715160 * g + 0.072169 * b;
    let z = (0.019334 * r + 0.119193 * g + 0.950227 * b) / 1.088754;

    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));
    (
        saturate(500.0 * (fx - fy) + 128.0),
        saturate(200.0 * (fy - fz) + 128.0),
    )
}

fn hsv_hue(px: Rgb<u8>) -> u8 {
    let [r, g, b] = px.0.map(|c| c as f32);
    let v = r.max(g).max(b);
    let diff = v - r.min(g).min(b);
    if diff <= 0.0 {
        return 0;
    }

    let mut h = if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }
    // 180 wraps back to 0
    (saturate(h * 0.5) as u16 % 180) as u8
}
