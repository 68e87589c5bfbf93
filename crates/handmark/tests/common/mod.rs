#![allow(dead_code)]

use handmark::ColorInterval;
use image::{Rgb, RgbImage};

pub const SKIN: Rgb<u8> = Rgb([255, 0, 0]);
pub const BACKDROP: Rgb<u8> = Rgb([128, 128, 128]);

/// Lab `a` of pure red is ~208 and of neutral gray 128.
pub fn skin_interval() -> ColorInterval {
    ColorInterval::new(180, 240)
}

pub const HAND_WIDTH: u32 = 320;
pub const HAND_HEIGHT: u32 = 360;

/// Fingertip rows of the five 12 px wide fingers, thumb first.
const FINGER_TOPS: [u32; 5] = [145, 135, 130, 135, 145];

fn in_hand(x: u32, y: u32, fingers: &[usize]) -> bool {
    let palm = (100..200).contains(&x) && (200..280).contains(&y);
    let wrist = (125..175).contains(&x) && (280..320).contains(&y);
    let finger = fingers.iter().any(|&k| {
        let x0 = 100 + 22 * k as u32;
        (x0..x0 + 12).contains(&x) && (FINGER_TOPS[k]..200).contains(&y)
    });
    palm || wrist || finger
}

/// Palm, wrist and the listed fingers (indices 0..5) painted in `SKIN`.
pub fn hand_frame(fingers: &[usize]) -> RgbImage {
    RgbImage::from_fn(HAND_WIDTH, HAND_HEIGHT, |x, y| {
        if in_hand(x, y, fingers) {
            SKIN
        } else {
            BACKDROP
        }
    })
}

pub fn open_hand() -> RgbImage {
    hand_frame(&[0, 1, 2, 3, 4])
}

pub fn four_fingers() -> RgbImage {
    hand_frame(&[1, 2, 3, 4])
}

/// A filled disc of radius 40 (about 5000 px²).
pub fn disc_frame() -> RgbImage {
    RgbImage::from_fn(160, 160, |x, y| {
        let dx = x as i32 - 80;
        let dy = y as i32 - 80;
        if dx * dx + dy * dy <= 40 * 40 {
            SKIN
        } else {
            BACKDROP
        }
    })
}
