use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::rotation::WallpaperSetter;

pub fn current_wallpaper_copy() -> PathBuf {
    std::env::temp_dir().join("current_wallpaper")
}

/// Path next to `dest` for staging a replacement before renaming it into place.
pub fn staging_path(dest: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{nanos}.part"));
    dest.with_file_name(name)
}

pub fn copy_to_current_wallpaper<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    copy_replacing(path.as_ref(), &current_wallpaper_copy())
}

/// Copies `src` over `dest` without ever leaving a half-written `dest`.
pub fn copy_replacing(src: &Path, dest: &Path) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = staging_path(dest);
    if let Err(e) = fs::copy(src, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, dest)
}

enum Job {
    Apply(PathBuf),
    #[cfg(test)]
    Flush(Sender<()>),
}

/// A single worker thread that applies wallpapers strictly in request order.
#[derive(Debug, Clone)]
pub struct ApplyQueue {
    tx: Sender<Job>,
}

impl ApplyQueue {
    pub fn spawn<F>(mut apply: F) -> Self
    where
        F: FnMut(&Path) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Job>();

        let spawned = std::thread::Builder::new()
            .name(String::from("wallpaper-apply"))
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    match job {
                        Job::Apply(path) => apply(&path),
                        #[cfg(test)]
                        Job::Flush(done) => {
                            let _ = done.send(());
                        }
                    }
                }
            });

        if let Err(e) = spawned {
            tracing::error!("could not start wallpaper worker: {e}");
        }

        Self { tx }
    }

    pub fn push(&self, path: PathBuf) {
        if self.tx.send(Job::Apply(path)).is_err() {
            tracing::warn!("wallpaper worker is gone, apply dropped");
        }
    }

    /// Blocks until every apply queued so far has run.
    #[cfg(test)]
    pub fn flush(&self) {
        let (done_tx, done_rx) = mpsc::channel();
        if self.tx.send(Job::Flush(done_tx)).is_ok() {
            let _ = done_rx.recv();
        }
    }
}

/// Sets the desktop background through the platform tool, off the UI thread.
#[derive(Debug, Clone)]
pub struct OsSetter {
    queue: ApplyQueue,
}

impl OsSetter {
    pub fn from_config(cfg: &Config) -> Self {
        let backend = cfg.linux_backend;
        let copy_to_tmp = cfg.copy_to_tmp;

        let queue = ApplyQueue::spawn(move |path| {
            if copy_to_tmp {
                if let Err(e) = copy_to_current_wallpaper(path) {
                    tracing::warn!(path = %path.display(), "could not copy wallpaper: {e}");
                }
            }

            if let Err(e) = crate::platform::set_wallpaper(path, backend) {
                tracing::warn!(path = %path.display(), "setting wallpaper failed: {e}");
            }
        });

        Self { queue }
    }
}

impl WallpaperSetter for OsSetter {
    fn set_wallpaper(&self, path: &Path) {
        self.queue.push(path.to_path_buf());
    }
}
