use std::io;
use std::path::Path;

use crate::config::LinuxBackend;

pub fn set_wallpaper(path: &Path, _backend: LinuxBackend) -> io::Result<()> {
    let path = path
        .to_str()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "non UTF-8 wallpaper path"))?;
    wallpaper::set_from_path(path).map_err(|e| io::Error::other(e.to_string()))
}
