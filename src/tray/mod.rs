//! Tray icon for the changer window.
//!
//! The tray runs outside iced's update loop. Menu activations are turned
//! into [`Command`] tokens and posted over a channel; [`commands`] drains
//! that channel as an iced subscription so every action lands on the UI
//! thread.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
use linux as backend;

#[cfg(not(target_os = "linux"))]
mod native;
#[cfg(not(target_os = "linux"))]
use native as backend;

use std::sync::{Arc, Mutex};

use iced::Subscription;
use iced::futures::SinkExt;
use image::{Rgba, RgbaImage};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::commands::Command;
use crate::error::Result;

pub const TRAY_TITLE: &str = "Wallpaper Changer";
const ICON_SIZE: u32 = 24;

/// Receiving end of the tray channel, handed to the subscription once.
pub type CommandInbox = Arc<Mutex<Option<UnboundedReceiver<Command>>>>;

pub struct Tray {
    stop: Box<dyn FnOnce()>,
}

impl Tray {
    pub fn new(stop: impl FnOnce() + 'static) -> Self {
        Self {
            stop: Box::new(stop),
        }
    }

    /// Stops the tray loop and removes the icon.
    pub fn shutdown(self) {
        (self.stop)();
        tracing::debug!("tray stopped");
    }
}

impl std::fmt::Debug for Tray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tray").finish_non_exhaustive()
    }
}

pub fn channel() -> (UnboundedSender<Command>, CommandInbox) {
    let (tx, rx) = unbounded_channel();
    (tx, Arc::new(Mutex::new(Some(rx))))
}

pub fn spawn(tx: UnboundedSender<Command>) -> Result<Tray> {
    let handle = backend::spawn(tx)?;
    tracing::info!("tray icon started");
    Ok(Tray::new(move || handle.shutdown()))
}

pub(crate) fn post(tx: &UnboundedSender<Command>, cmd: Command) {
    if tx.send(cmd).is_err() {
        tracing::debug!(?cmd, "tray command dropped, UI is gone");
    }
}

/// Streams commands posted by the tray into the iced runtime.
pub fn commands(inbox: CommandInbox) -> Subscription<Command> {
    #[derive(Hash)]
    struct TrayCommands;

    Subscription::run_with_id(
        TrayCommands,
        iced::stream::channel(16, move |mut output| async move {
            let rx = inbox.lock().ok().and_then(|mut slot| slot.take());
            let Some(mut rx) = rx else {
                return;
            };

            while let Some(cmd) = rx.recv().await {
                if output.send(cmd).await.is_err() {
                    break;
                }
            }
        }),
    )
}

/// White disc with a grey rim on a black square.
pub(crate) fn icon_image() -> RgbaImage {
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = center;

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist <= radius - 1.0 {
            Rgba([255, 255, 255, 255])
        } else if dist <= radius {
            Rgba([128, 128, 128, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_has_white_centre_and_black_corner() {
        let img = icon_image();
        assert_eq!(img.dimensions(), (ICON_SIZE, ICON_SIZE));
        assert_eq!(img.get_pixel(ICON_SIZE / 2, ICON_SIZE / 2), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn posted_commands_arrive_in_order() {
        let (tx, inbox) = channel();
        post(&tx, Command::Next);
        post(&tx, Command::Quit);

        let mut rx = inbox.lock().unwrap().take().unwrap();
        assert_eq!(rx.try_recv().ok(), Some(Command::Next));
        assert_eq!(rx.try_recv().ok(), Some(Command::Quit));
        assert!(inbox.lock().unwrap().is_none());
    }

    #[test]
    fn shutdown_runs_stop_once() {
        let stopped = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = stopped.clone();
        let tray = Tray::new(move || counter.set(counter.get() + 1));

        tray.shutdown();
        assert_eq!(stopped.get(), 1);
    }

    #[test]
    fn posting_after_receiver_dropped_does_not_panic() {
        let (tx, inbox) = channel();
        drop(inbox);
        post(&tx, Command::Previous);
    }
}
