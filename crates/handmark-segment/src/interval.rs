use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::ChromaChannel;

/// Sentinel for a bound that has not been set yet.
pub const UNSET_BOUND: i32 = -1;

/// Accepted chroma interval `[min, max]`, inclusive on both ends.
///
/// Bounds are plain integers so that slider values can be stored without
/// validation; an unset interval (`-1, -1`) contains no 8-bit value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorInterval {
    pub min: i32,
    pub max: i32,
}

impl Default for ColorInterval {
    fn default() -> Self {
        Self::unset()
    }
}

impl ColorInterval {
    pub const fn unset() -> Self {
        Self {
            min: UNSET_BOUND,
            max: UNSET_BOUND,
        }
    }

    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Both bounds hold a value (negative bounds count as unset).
    pub fn is_set(&self) -> bool {
        self.min >= 0 && self.max >= 0
    }

    #[inline]
    pub fn contains(&self, value: u8) -> bool {
        let v = value as i32;
        self.min <= v && v <= self.max
    }

    /// Widen the interval to include `value`; an unset interval collapses to it.
    pub fn include(&mut self, value: u8) {
        let v = value as i32;
        if !self.is_set() {
            self.min = v;
            self.max = v;
        }
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("sample ({x}, {y}) lies outside the {width}x{height} frame")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

/// Runtime calibration of the segmentation interval.
///
/// The interval only grows through sampling; the two setters overwrite a
/// bound unconditionally and are expected to be driven by UI sliders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorCalibrator {
    interval: ColorInterval,
    channel: ChromaChannel,
}

impl ColorCalibrator {
    pub fn new(channel: ChromaChannel) -> Self {
        Self {
            interval: ColorInterval::unset(),
            channel,
        }
    }

    pub fn with_interval(mut self, interval: ColorInterval) -> Self {
        self.interval = interval;
        self
    }

    #[inline]
    pub fn interval(&self) -> ColorInterval {
        self.interval
    }

    #[inline]
    pub fn channel(&self) -> ChromaChannel {
        self.channel
    }

    pub fn set_lower_bound(&mut self, value: i32) {
        self.interval.min = value;
    }

    pub fn set_upper_bound(&mut self, value: i32) {
        self.interval.max = value;
    }

    /// Forget all calibration.
    pub fn reset(&mut self) {
        self.interval = ColorInterval::unset();
    }

    /// Read the chroma value at `(x, y)` and widen the interval to include it.
    ///
    /// Returns the sampled value. Coordinates outside the frame are rejected
    /// and leave the interval untouched.
    pub fn sample_at(&mut self, x: i32, y: i32, frame: &RgbImage) -> Result<u8, SampleError> {
        let (width, height) = frame.dimensions();
        if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
            return Err(SampleError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }

        let value = self.channel.value(*frame.get_pixel(x as u32, y as u32));
        self.interval.include(value);
        log::debug!(
            "sampled chroma {value} at ({x}, {y}); interval now [{}, {}]",
            self.interval.min,
            self.interval.max
        );
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn frame_with(colors: &[[u8; 3]]) -> RgbImage {
        RgbImage::from_fn(colors.len() as u32, 1, |x, _| Rgb(colors[x as usize]))
    }

    #[test]
    fn unset_interval_contains_nothing() {
        let interval = ColorInterval::unset();
        assert!(!interval.is_set());
        assert!((0..=255u8).all(|v| !interval.contains(v)));
    }

    #[test]
    fn first_sample_initializes_both_bounds() {
        let frame = frame_with(&[[90, 90, 90]]);
        let mut cal = ColorCalibrator::new(ChromaChannel::LabA);
        let v = cal.sample_at(0, 0, &frame).expect("in bounds");
        assert_eq!(v, 128);
        assert_eq!(cal.interval(), ColorInterval::new(128, 128));
    }

    #[test]
    fn later_samples_only_widen() {
        let frame = frame_with(&[[200, 40, 40], [40, 200, 40], [120, 120, 120]]);
        let mut cal = ColorCalibrator::new(ChromaChannel::LabA);
        let reddish = cal.sample_at(0, 0, &frame).unwrap();
        let greenish = cal.sample_at(1, 0, &frame).unwrap();
        cal.sample_at(2, 0, &frame).unwrap();
        assert_eq!(cal.interval(), ColorInterval::new(greenish as i32, reddish as i32));
    }

    #[test]
    fn half_set_interval_is_reinitialized_by_sampling() {
        let frame = frame_with(&[[70, 70, 70]]);
        let mut cal = ColorCalibrator::new(ChromaChannel::LabA);
        cal.set_lower_bound(10);
        cal.sample_at(0, 0, &frame).unwrap();
        assert_eq!(cal.interval(), ColorInterval::new(128, 128));
    }

    #[test]
    fn out_of_bounds_samples_are_rejected() {
        let frame = frame_with(&[[1, 2, 3], [4, 5, 6]]);
        let mut cal = ColorCalibrator::new(ChromaChannel::LabA).with_interval(ColorInterval::new(5, 9));
        for (x, y) in [(-1, 0), (2, 0), (0, 1), (0, -3)] {
            let err = cal.sample_at(x, y, &frame).unwrap_err();
            assert_eq!(
                err,
                SampleError::OutOfBounds {
                    x,
                    y,
                    width: 2,
                    height: 1
                }
            );
        }
        assert_eq!(cal.interval(), ColorInterval::new(5, 9));
    }

    #[test]
    fn setters_do_not_validate() {
        let mut cal = ColorCalibrator::default();
        cal.set_lower_bound(200);
        cal.set_upper_bound(100);
        assert_eq!(cal.interval(), ColorInterval::new(200, 100));
        assert!((0..=255u8).all(|v| !cal.interval().contains(v)));
        cal.reset();
        assert_eq!(cal.interval(), ColorInterval::unset());
    }
}
