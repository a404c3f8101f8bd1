use std::path::{Path, PathBuf};

use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length, Size, Subscription, Task, Theme, application, window};
use rfd::{AsyncFileDialog, MessageLevel};
use tokio::sync::mpsc::UnboundedSender;

use super::{platform_specific_settings, show_dialog};
use crate::commands::Command;
use crate::config::Config;
use crate::rotation::{LoadOutcome, Rotation, WallpaperSetter};
use crate::scanner::scan_directory_async;
use crate::tray::{self, CommandInbox, Tray};
use crate::wallpaper::OsSetter;

const ABOUT_TEXT: &str = concat!("Wallpaper Changer\nVersion ", env!("CARGO_PKG_VERSION"));

pub fn run(cfg: Config, start_dir: Option<PathBuf>) -> iced::Result {
    application("Wallpaper Changer", update::<OsSetter>, view::<OsSetter>)
        .theme(|_| Theme::Dark)
        .window(window::Settings {
            size: Size::new(360.0, 220.0),
            resizable: false,
            platform_specific: platform_specific_settings("wallchanger"),
            ..Default::default()
        })
        .exit_on_close_request(false)
        .subscription(subscription::<OsSetter>)
        .run_with(move || {
            let (tx, inbox) = tray::channel();
            let mut state = Changer::new(OsSetter::from_config(&cfg), tx, inbox);

            let load = match start_dir {
                Some(dir) => state.load_start(&dir).map_or_else(Task::none, Notice::show),
                None => Task::none(),
            };

            // The tray is created from the first update, once the event loop runs.
            (state, Task::batch([Task::done(Message::StartTray), load]))
        })
}

#[derive(Debug)]
struct Changer<S> {
    rotation: Rotation<S>,
    tray: Option<Tray>,
    /// Handed to the tray when it starts.
    tray_tx: Option<UnboundedSender<Command>>,
    inbox: CommandInbox,
    /// A directory pick or scan is outstanding.
    busy: bool,
}

#[derive(Debug, Clone)]
enum Message {
    StartTray,
    Command(Command),
    Select(usize),
    DirectoryPicked(Option<PathBuf>),
    Scanned(PathBuf, Result<Vec<PathBuf>, String>),
    About,
    DialogClosed,
    CloseRequested(window::Id),
}

/// Something the user is told about in a message box.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Notice {
    NoImages,
    Failed(String),
    About,
}

impl Notice {
    fn show(self) -> Task<Message> {
        let (level, title, description) = match self {
            Notice::NoImages => (
                MessageLevel::Warning,
                "No Images",
                String::from("No valid images found in the selected directory."),
            ),
            Notice::Failed(e) => (MessageLevel::Error, "Error", e),
            Notice::About => (MessageLevel::Info, "About", String::from(ABOUT_TEXT)),
        };

        Task::perform(
            show_dialog(level, title.to_string(), description),
            |_| Message::DialogClosed,
        )
    }
}

fn subscription<S>(state: &Changer<S>) -> Subscription<Message> {
    Subscription::batch([
        tray::commands(state.inbox.clone()).map(Message::Command),
        window::close_requests().map(Message::CloseRequested),
    ])
}

fn update<S: WallpaperSetter>(state: &mut Changer<S>, message: Message) -> Task<Message> {
    match message {
        Message::StartTray => state.start_tray(),
        Message::Command(cmd) => return state.dispatch(cmd),
        Message::Select(index) => {
            if state.busy {
                tracing::debug!(index, "select ignored while a directory is loading");
            } else {
                state.rotation.select(index);
            }
        }
        Message::DirectoryPicked(None) => {
            state.busy = false;
        }
        Message::DirectoryPicked(Some(dir)) => {
            state.busy = true;
            let d = dir.clone();
            return Task::perform(scan_directory_async(dir), move |res| {
                Message::Scanned(d.clone(), res.map_err(|e| e.to_string()))
            });
        }
        Message::Scanned(dir, res) => {
            if let Some(notice) = state.on_scanned(&dir, res) {
                return notice.show();
            }
        }
        Message::About => return Notice::About.show(),
        Message::DialogClosed => {}
        Message::CloseRequested(id) => {
            if state.tray.is_some() {
                return window::change_mode(id, window::Mode::Hidden);
            }
            return iced::exit();
        }
    }
    Task::none()
}

fn report_load(dir: &Path, outcome: LoadOutcome) -> Option<Notice> {
    match outcome {
        LoadOutcome::Loaded(count) => {
            tracing::info!(dir = %dir.display(), count, "loaded images");
            None
        }
        LoadOutcome::NoImages => {
            tracing::warn!(dir = %dir.display(), "no images found");
            Some(Notice::NoImages)
        }
    }
}

async fn pick_directory() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Choose Wallpaper Directory")
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}

impl<S: WallpaperSetter> Changer<S> {
    fn new(setter: S, tray_tx: UnboundedSender<Command>, inbox: CommandInbox) -> Self {
        Self {
            rotation: Rotation::new(setter),
            tray: None,
            tray_tx: Some(tray_tx),
            inbox,
            busy: false,
        }
    }

    fn load_start(&mut self, dir: &Path) -> Option<Notice> {
        match self.rotation.load(dir) {
            Ok(outcome) => report_load(dir, outcome),
            Err(e) => {
                tracing::error!(dir = %dir.display(), "could not load start directory: {e}");
                Some(Notice::Failed(e.to_string()))
            }
        }
    }

    fn start_tray(&mut self) {
        let Some(tx) = self.tray_tx.take() else {
            return;
        };

        self.tray = match tray::spawn(tx) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!("tray unavailable, closing the window will quit: {e}");
                None
            }
        };
    }

    fn on_scanned(&mut self, dir: &Path, res: Result<Vec<PathBuf>, String>) -> Option<Notice> {
        self.busy = false;
        match res {
            Ok(images) => {
                let outcome = self.rotation.replace(images);
                report_load(dir, outcome)
            }
            Err(e) => {
                tracing::error!(dir = %dir.display(), "scan failed: {e}");
                Some(Notice::Failed(e))
            }
        }
    }

    fn dispatch(&mut self, cmd: Command) -> Task<Message> {
        match cmd {
            Command::Next | Command::Previous | Command::ChooseDirectory if self.busy => {
                tracing::debug!(?cmd, "ignored while a directory is loading");
            }
            Command::Next => {
                self.rotation.next();
            }
            Command::Previous => {
                self.rotation.previous();
            }
            Command::ChooseDirectory => {
                self.busy = true;
                return Task::perform(pick_directory(), Message::DirectoryPicked);
            }
            Command::Show => {
                return window::get_oldest().and_then(|id| {
                    Task::batch([
                        window::change_mode(id, window::Mode::Windowed),
                        window::gain_focus(id),
                    ])
                });
            }
            Command::Quit => {
                if let Some(tray) = self.tray.take() {
                    tray.shutdown();
                }
                return iced::exit();
            }
        }
        Task::none()
    }
}

fn view<S: WallpaperSetter>(state: &Changer<S>) -> Element<'_, Message> {
    // Clicking the name puts the current image back, e.g. after another tool changed it.
    let label = button(text(state.rotation.display_label()).size(14))
        .style(button::text)
        .on_press_maybe(state.rotation.active_index().map(Message::Select));

    let rotate = row![
        button(Command::Previous.label()).on_press(Message::Command(Command::Previous)),
        button(Command::Next.label()).on_press(Message::Command(Command::Next)),
    ]
    .spacing(10);

    let content = column![
        label,
        button(Command::ChooseDirectory.label())
            .on_press(Message::Command(Command::ChooseDirectory)),
        rotate,
        button("About").on_press(Message::About),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
