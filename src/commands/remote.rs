use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::rotation::WallpaperSetter;
use crate::wallhaven::download_image;

/// Downloads a remote wallpaper to `dest` and applies it.
///
/// The setter is only invoked after a successful download.
pub async fn apply_remote<S>(client: reqwest::Client, url: String, dest: PathBuf, setter: S) -> Result<PathBuf>
where
    S: WallpaperSetter,
{
    tracing::info!(url = %url, "downloading wallpaper");
    let path = download_image(&client, &url, &dest).await?;
    apply_downloaded(&setter, &path);
    Ok(path)
}

fn apply_downloaded<S: WallpaperSetter>(setter: &S, path: &Path) {
    tracing::info!(path = %path.display(), "applying downloaded wallpaper");
    setter.set_wallpaper(path);
}
