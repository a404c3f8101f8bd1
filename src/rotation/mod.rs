//! Rotation through the images of one local directory.
//!
//! The controller owns the loaded collection and the index of the active
//! image. Every successful rotation hands the new path to the wallpaper
//! setter; the UI reads [`Rotation::display_label`] afterwards.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::scanner::scan_directory;

pub const NO_SELECTION_LABEL: &str = "No image selected";

/// Something that can put an image on the desktop.
///
/// Implementations must not block the caller on the outcome.
pub trait WallpaperSetter {
    fn set_wallpaper(&self, path: &Path);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    NoImages,
}

#[derive(Debug)]
pub struct Rotation<S> {
    images: Vec<PathBuf>,
    active: Option<usize>,
    setter: S,
}

impl<S: WallpaperSetter> Rotation<S> {
    pub fn new(setter: S) -> Self {
        Self {
            images: Vec::new(),
            active: None,
            setter,
        }
    }

    pub fn load(&mut self, dir: &Path) -> Result<LoadOutcome> {
        let images = scan_directory(dir)?;
        Ok(self.replace(images))
    }

    /// Installs a freshly scanned collection.
    ///
    /// An empty scan keeps whatever was loaded before.
    pub fn replace(&mut self, images: Vec<PathBuf>) -> LoadOutcome {
        if images.is_empty() {
            return LoadOutcome::NoImages;
        }

        let count = images.len();
        self.images = images;
        self.active = Some(0);
        self.apply(0);

        LoadOutcome::Loaded(count)
    }

    pub fn next(&mut self) -> Option<&Path> {
        let len = self.images.len();
        if len == 0 {
            return None;
        }

        let index = (self.active.unwrap_or(0) + 1) % len;
        self.rotate_to(index)
    }

    pub fn previous(&mut self) -> Option<&Path> {
        let len = self.images.len();
        if len == 0 {
            return None;
        }

        let index = (self.active.unwrap_or(0) + len - 1) % len;
        self.rotate_to(index)
    }

    pub fn select(&mut self, index: usize) -> Option<&Path> {
        if index >= self.images.len() {
            return None;
        }
        self.rotate_to(index)
    }

    fn rotate_to(&mut self, index: usize) -> Option<&Path> {
        self.active = Some(index);
        self.apply(index);
        self.active_path()
    }

    fn apply(&self, index: usize) {
        let path = &self.images[index];
        tracing::info!(path = %path.display(), index, "applying wallpaper");
        self.setter.set_wallpaper(path);
    }

    #[cfg(test)]
    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active
            .and_then(|i| self.images.get(i))
            .map(PathBuf::as_path)
    }

    pub fn active_name(&self) -> Option<String> {
        self.active_path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    pub fn display_label(&self) -> String {
        self.active_name()
            .unwrap_or_else(|| String::from(NO_SELECTION_LABEL))
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.images.len()
    }
}
