//! Capture sources feeding the pipeline one frame per tick.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::HandmarkIoError;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "ppm"];

/// Result of asking a source for the next frame.
#[derive(Debug)]
pub enum Capture {
    Frame(RgbImage),
    /// No frame this tick; the pipeline skips it.
    Skipped,
    /// The source will not produce more frames.
    Exhausted,
}

pub trait FrameSource {
    fn grab(&mut self) -> Capture;
}

/// Image files replayed in path order.
#[derive(Clone, Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageSequenceSource {
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths, next: 0 }
    }

    /// All image files directly inside `dir`, sorted by file name.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, HandmarkIoError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if path.is_file() && is_image {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self::from_paths(paths))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl FrameSource for ImageSequenceSource {
    fn grab(&mut self) -> Capture {
        let Some(path) = self.paths.get(self.next) else {
            return Capture::Exhausted;
        };
        self.next += 1;

        match image::open(path) {
            Ok(img) => Capture::Frame(img.to_rgb8()),
            Err(err) => {
                log::warn!("skipping {}: {err}", path.display());
                Capture::Skipped
            }
        }
    }
}

/// In-memory frames; `None` entries simulate a stalled capture.
#[derive(Clone, Debug, Default)]
pub struct QueuedSource {
    frames: VecDeque<Option<RgbImage>>,
}

impl QueuedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self, frame: RgbImage) {
        self.frames.push_back(Some(frame));
    }

    pub fn push_gap(&mut self) {
        self.frames.push_back(None);
    }
}

impl FromIterator<RgbImage> for QueuedSource {
    fn from_iter<I: IntoIterator<Item = RgbImage>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().map(Some).collect(),
        }
    }
}

impl FrameSource for QueuedSource {
    fn grab(&mut self) -> Capture {
        match self.frames.pop_front() {
            Some(Some(frame)) => Capture::Frame(frame),
            Some(None) => Capture::Skipped,
            None => Capture::Exhausted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn queued_source_replays_frames_and_gaps() {
        let mut source = QueuedSource::new();
        source.push_frame(RgbImage::new(4, 4));
        source.push_gap();
        assert!(matches!(source.grab(), Capture::Frame(_)));
        assert!(matches!(source.grab(), Capture::Skipped));
        assert!(matches!(source.grab(), Capture::Exhausted));
    }

    #[test]
    fn directory_source_sorts_and_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(8, 6, Rgb([1, 2, 3]))
            .save(dir.path().join("b.png"))
            .unwrap();
        RgbImage::from_pixel(8, 6, Rgb([4, 5, 6]))
            .save(dir.path().join("a.png"))
            .unwrap();
        fs::write(dir.path().join("c.png"), b"not a png").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let mut source = ImageSequenceSource::from_dir(dir.path()).unwrap();
        assert_eq!(source.len(), 3);

        match source.grab() {
            Capture::Frame(f) => assert_eq!(f.get_pixel(0, 0), &Rgb([4, 5, 6])),
            other => panic!("expected a frame, got {other:?}"),
        }
        assert!(matches!(source.grab(), Capture::Frame(_)));
        assert!(matches!(source.grab(), Capture::Skipped));
        assert!(matches!(source.grab(), Capture::Exhausted));
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(ImageSequenceSource::from_dir("/definitely/not/here").is_err());
    }
}
