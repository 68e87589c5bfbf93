//! Consumers of the per-frame results: asset selection and preview display.

use std::fs;
use std::path::{Path, PathBuf};

use handmark_gesture::AdvanceSelection;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::HandmarkIoError;

/// Receives the finger count of every processed frame and each advance event.
pub trait SelectionSink {
    fn finger_count(&mut self, count: u32);
    fn advance(&mut self, event: AdvanceSelection);
}

/// Receives the mask thumbnail of every processed frame.
pub trait PreviewSink {
    fn show(&mut self, thumbnail: &RgbImage);
}

/// Cycles the active texture and model on every advance event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCycler {
    pub texture_count: usize,
    pub model_count: usize,
    pub texture_index: usize,
    pub model_index: usize,
    pub last_finger_count: u32,
    pub advances: usize,
}

impl AssetCycler {
    pub fn new(texture_count: usize, model_count: usize) -> Self {
        Self {
            texture_count,
            model_count,
            ..Self::default()
        }
    }
}

#[inline]
fn wrap_next(index: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (index + 1) % count
    }
}

impl SelectionSink for AssetCycler {
    fn finger_count(&mut self, count: u32) {
        self.last_finger_count = count;
    }

    fn advance(&mut self, _event: AdvanceSelection) {
        self.texture_index = wrap_next(self.texture_index, self.texture_count);
        self.model_index = wrap_next(self.model_index, self.model_count);
        self.advances += 1;
        log::info!(
            "active texture {} / {}, model {} / {}",
            self.texture_index,
            self.texture_count,
            self.model_index,
            self.model_count
        );
    }
}

/// Discards thumbnails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPreviewSink;

impl PreviewSink for NullPreviewSink {
    fn show(&mut self, _thumbnail: &RgbImage) {}
}

/// Writes every thumbnail as `preview_00000.png`, `preview_00001.png`, ...
#[derive(Clone, Debug)]
pub struct DirectoryPreviewSink {
    dir: PathBuf,
    written: usize,
}

impl DirectoryPreviewSink {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, HandmarkIoError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl PreviewSink for DirectoryPreviewSink {
    fn show(&mut self, thumbnail: &RgbImage) {
        let path = self.dir.join(format!("preview_{:05}.png", self.written));
        match thumbnail.save(&path) {
            Ok(()) => self.written += 1,
            Err(err) => log::warn!("failed to write preview {}: {err}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: AdvanceSelection = AdvanceSelection {
        previous: 4,
        current: 5,
    };

    #[test]
    fn cycler_wraps_each_index_independently() {
        let mut cycler = AssetCycler::new(3, 2);
        for _ in 0..4 {
            cycler.advance(EVENT);
        }
        assert_eq!(cycler.texture_index, 1);
        assert_eq!(cycler.model_index, 0);
        assert_eq!(cycler.advances, 4);
    }

    #[test]
    fn empty_asset_lists_stay_at_zero() {
        let mut cycler = AssetCycler::new(0, 0);
        cycler.advance(EVENT);
        assert_eq!((cycler.texture_index, cycler.model_index), (0, 0));
    }

    #[test]
    fn cycler_remembers_the_last_count() {
        let mut cycler = AssetCycler::default();
        cycler.finger_count(3);
        cycler.finger_count(5);
        assert_eq!(cycler.last_finger_count, 5);
        assert_eq!(cycler.advances, 0);
    }

    #[test]
    fn directory_sink_numbers_thumbnails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectoryPreviewSink::new(dir.path().join("previews")).unwrap();
        sink.show(&RgbImage::new(16, 12));
        sink.show(&RgbImage::new(16, 12));
        assert_eq!(sink.written(), 2);
        assert!(dir.path().join("previews/preview_00001.png").is_file());
    }
}
