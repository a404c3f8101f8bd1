use std::io;
use std::path::Path;
use std::process::Command;

use super::check_status;
use crate::config::LinuxBackend;

pub fn set_wallpaper(path: &Path, backend: LinuxBackend) -> io::Result<()> {
    match backend {
        LinuxBackend::Gnome => {
            let uri = format!("file://{}", path.display());
            for key in ["picture-uri", "picture-uri-dark"] {
                let status = Command::new("gsettings")
                    .args(["set", "org.gnome.desktop.background", key])
                    .arg(&uri)
                    .status()?;
                check_status("gsettings", status)?;
            }
            Ok(())
        }
        LinuxBackend::Swww => {
            let status = Command::new("swww")
                .arg("img")
                .arg(path)
                .arg("--transition-type")
                .arg("outer")
                .arg("--transition-fps")
                .arg("60")
                .status()?;
            check_status("swww", status)
        }
    }
}
