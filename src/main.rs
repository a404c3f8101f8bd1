mod commands;
mod config;
mod error;
mod gallery;
mod platform;
mod rotation;
mod scanner;
mod tray;
mod ui;
mod wallhaven;
mod wallpaper;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use single_instance::SingleInstance;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::Error;

const INSTANCE_NAME: &str = "WallpaperChangerMutex";

const USAGE: &str = "Usage:\n  wallchanger [--dir <path> | --remote]\n";

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Changer(Option<PathBuf>),
    Remote,
}

fn parse_args<I>(args: I) -> Result<Mode, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    let mut selected: Option<Mode> = None;

    while let Some(arg) = args.next() {
        let next_mode = match arg.as_str() {
            "--dir" => {
                let p = args
                    .next()
                    .ok_or_else(|| "Missing value after --dir".to_string())?;
                Mode::Changer(Some(PathBuf::from(p)))
            }
            "--remote" => Mode::Remote,
            "--help" | "-h" => return Err(USAGE.to_string()),
            _ => return Err(format!("Unknown argument: {arg}\n{USAGE}")),
        };

        if selected.is_some() {
            return Err("Only one of --dir/--remote can be given".to_string());
        }

        selected = Some(next_mode);
    }

    Ok(selected.unwrap_or(Mode::Changer(None)))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}

/// Holds the named instance lock for as long as the returned guard lives.
fn enforce_single_instance() -> Result<SingleInstance, Error> {
    let inst = SingleInstance::new(INSTANCE_NAME).map_err(|e| Error::SingleInstance(e.to_string()))?;
    if !inst.is_single() {
        return Err(Error::AlreadyRunning);
    }
    Ok(inst)
}

fn main() -> iced::Result {
    init_tracing();

    let mode = match parse_args(std::env::args().skip(1)) {
        Ok(m) => m,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let cfg = config::load_or_create_config();

    match mode {
        Mode::Remote => ui::browser::run(cfg),
        Mode::Changer(start_dir) => {
            let _guard = match enforce_single_instance() {
                Ok(guard) => Some(guard),
                Err(Error::AlreadyRunning) => {
                    tracing::error!("another instance is already running");
                    ui::show_startup_error(
                        "Error",
                        "Another instance of this application is already running.",
                    );
                    std::process::exit(1);
                }
                Err(e) => {
                    tracing::warn!("unable to enforce single instance, continuing: {e}");
                    None
                }
            };

            ui::changer::run(cfg, start_dir)
        }
    }
}
