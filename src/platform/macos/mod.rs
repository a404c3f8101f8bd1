use std::io;
use std::path::Path;

use super::check_status;
use crate::config::LinuxBackend;

pub fn set_wallpaper(path: &Path, _backend: LinuxBackend) -> io::Result<()> {
    let script = format!(
        "tell application \"Finder\" to set desktop picture to POSIX file \"{}\"",
        path.display()
    );
    let status = std::process::Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .status()?;
    check_status("osascript", status)
}
