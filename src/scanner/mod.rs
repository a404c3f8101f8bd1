use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|x| ext.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

/// Lists the images directly inside `dir`, in file-name order.
///
/// Subdirectories are not visited. Entries that fail to stat are skipped.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && is_image_path(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

pub async fn scan_directory_async(dir: PathBuf) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || scan_directory(&dir))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}
