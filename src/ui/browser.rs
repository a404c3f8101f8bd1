use std::collections::HashMap;
use std::path::PathBuf;

use iced::event::Event;
use iced::widget::image::Handle as IcedImageHandle;
use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{Image, button, column, container, pick_list, row, scrollable, text};
use iced::{Color, Element, Length, Size, Task, Theme, application, window};
use rfd::MessageLevel;

use super::{platform_specific_settings, show_dialog};
use crate::commands::apply_remote;
use crate::config::Config;
use crate::gallery::Gallery;
use crate::wallhaven::{self, Category, Entry, Resolution, SearchParams, Sorting};
use crate::wallpaper::OsSetter;

const THUMB_SIZE: u32 = 180;
const MAX_COLUMNS: usize = 4;

pub fn run(cfg: Config) -> iced::Result {
    application("Wallpaper Selector", update, view)
        .theme(|_| Theme::Dark)
        .window(window::Settings {
            size: Size::new(800.0, 600.0),
            resizable: true,
            platform_specific: platform_specific_settings("wallchanger-browser"),
            ..Default::default()
        })
        .subscription(|_state| iced::event::listen().map(Message::EventOccurred))
        .run_with(move || {
            let client = match wallhaven::client() {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("falling back to default HTTP client: {e}");
                    reqwest::Client::new()
                }
            };

            let state = Browser {
                client,
                setter: OsSetter::from_config(&cfg),
                config: cfg,
                params: SearchParams::default(),
                gallery: Gallery::default(),
                thumbs: HashMap::new(),
                status: String::from("Loading…"),
                window_width: 800,
            };
            (state, Task::done(Message::Search))
        })
}

struct Browser {
    client: reqwest::Client,
    setter: OsSetter,
    config: Config,
    params: SearchParams,
    gallery: Gallery,
    thumbs: HashMap<String, IcedImageHandle>,
    status: String,
    window_width: u32,
}

#[derive(Debug, Clone)]
enum Message {
    CategoryChanged(Category),
    ResolutionChanged(Resolution),
    SortingChanged(Sorting),
    Search,
    Searched(Result<Vec<Entry>, String>),
    LoadedThumb(String, Option<IcedImageHandle>),
    Select(usize),
    SetWallpaper,
    Applied(String, Result<PathBuf, String>),
    DialogClosed,
    EventOccurred(Event),
}

fn update(state: &mut Browser, message: Message) -> Task<Message> {
    match message {
        Message::CategoryChanged(c) => {
            state.params.category = c;
            return Task::done(Message::Search);
        }
        Message::ResolutionChanged(r) => {
            state.params.resolution = r;
            return Task::done(Message::Search);
        }
        Message::SortingChanged(s) => {
            state.params.sorting = s;
            return Task::done(Message::Search);
        }
        Message::Search => {
            if !state.gallery.try_begin() {
                tracing::debug!("search queued behind running request");
                return Task::none();
            }

            state.status = String::from("Searching…");
            let client = state.client.clone();
            let cfg = state.config.clone();
            let params = state.params;
            return Task::perform(
                async move { wallhaven::search(&client, &cfg, params).await },
                |res| Message::Searched(res.map_err(|e| e.to_string())),
            );
        }
        Message::Searched(res) => {
            let rerun = state.gallery.finish();
            match res {
                Ok(entries) => {
                    state.status = format!("{} wallpapers", entries.len());
                    state.thumbs.clear();
                    state.gallery.replace(entries);
                }
                Err(e) => {
                    tracing::error!("failed to fetch wallpapers: {e}");
                    state.status = format!("Search failed: {e}");
                }
            }

            let mut tasks = vec![state.load_thumbs()];
            if rerun {
                tasks.push(Task::done(Message::Search));
            }
            return Task::batch(tasks);
        }
        Message::LoadedThumb(full_url, handle) => {
            let still_listed = state.gallery.entries().iter().any(|e| e.full_url == full_url);
            if let (true, Some(handle)) = (still_listed, handle) {
                state.thumbs.insert(full_url, handle);
            }
        }
        Message::Select(index) => {
            if let Some(entry) = state.gallery.select(index) {
                tracing::info!(url = %entry.full_url, "selected image");
            }
        }
        Message::SetWallpaper => {
            let Some(url) = state.gallery.selected().map(|e| e.full_url.clone()) else {
                tracing::warn!("no image selected");
                return Task::perform(
                    show_dialog(
                        MessageLevel::Warning,
                        String::from("No Image"),
                        String::from("Select a wallpaper first."),
                    ),
                    |_| Message::DialogClosed,
                );
            };

            if state.gallery.is_busy() || !state.gallery.try_begin() {
                tracing::debug!("apply ignored while a request is running");
                return Task::none();
            }

            state.status = String::from("Downloading…");
            let u = url.clone();
            return Task::perform(
                apply_remote(
                    state.client.clone(),
                    url,
                    state.config.download_path.clone(),
                    state.setter.clone(),
                ),
                move |res| Message::Applied(u.clone(), res.map_err(|e| e.to_string())),
            );
        }
        Message::Applied(url, res) => {
            let rerun = state.gallery.finish();
            match res {
                Ok(_) => {
                    state.gallery.record_applied(url);
                    let history = state.gallery.history();
                    let recent: Vec<&str> = history.iter().collect();
                    tracing::info!(latest = history.latest(), ?recent, "wallpaper history");
                    state.status = format!("Wallpaper set ({} in history)", history.len());
                }
                Err(e) => {
                    tracing::error!(url = %url, "failed to apply wallpaper: {e}");
                    state.status = format!("Download failed: {e}");
                }
            }
            if rerun {
                return Task::done(Message::Search);
            }
        }
        Message::DialogClosed => {}
        Message::EventOccurred(Event::Window(window::Event::Resized(size))) => {
            state.window_width = size.width as u32;
        }
        Message::EventOccurred(_) => {}
    }
    Task::none()
}

impl Browser {
    fn load_thumbs(&self) -> Task<Message> {
        let tasks: Vec<Task<Message>> = self
            .gallery
            .entries()
            .iter()
            .filter(|e| !self.thumbs.contains_key(&e.full_url))
            .map(|e| {
                let client = self.client.clone();
                let thumb_url = e.thumb_url.clone();
                let full_url = e.full_url.clone();
                Task::perform(
                    async move {
                        match wallhaven::fetch_thumbnail(&client, &thumb_url).await {
                            Ok(bytes) => Some(IcedImageHandle::from_bytes(bytes)),
                            Err(e) => {
                                tracing::warn!(url = %thumb_url, "failed to load thumbnail: {e}");
                                None
                            }
                        }
                    },
                    move |h| Message::LoadedThumb(full_url.clone(), h),
                )
            })
            .collect();

        Task::batch(tasks)
    }

    fn columns(&self) -> usize {
        ((self.window_width / THUMB_SIZE) as usize).clamp(1, MAX_COLUMNS)
    }

    fn thumbnail_widget(&self, index: usize, entry: &Entry) -> Element<'_, Message> {
        let base: Element<Message> = match self.thumbs.get(&entry.full_url) {
            Some(handle) => Image::new(handle.clone())
                .width(Length::Fixed(THUMB_SIZE as f32))
                .height(Length::Fixed(THUMB_SIZE as f32))
                .into(),
            None => container(text(" "))
                .width(Length::Fixed(THUMB_SIZE as f32))
                .height(Length::Fixed(THUMB_SIZE as f32))
                .into(),
        };

        let selected = self.gallery.selected_index() == Some(index);

        button(container(base).padding(2))
            .style(move |_theme, _status| iced::widget::button::Style {
                text_color: Color::WHITE,
                border: iced::Border {
                    color: Color::WHITE,
                    width: if selected { 2.0 } else { 0.0 },
                    ..Default::default()
                },
                ..Default::default()
            })
            .on_press(Message::Select(index))
            .into()
    }
}

fn view(state: &Browser) -> Element<'_, Message> {
    let filters = row![
        pick_list(&Category::ALL[..], Some(state.params.category), Message::CategoryChanged),
        pick_list(&Resolution::ALL[..], Some(state.params.resolution), Message::ResolutionChanged),
        pick_list(&Sorting::ALL[..], Some(state.params.sorting), Message::SortingChanged),
    ]
    .spacing(8);

    let cols = state.columns();
    let tiles: Vec<Element<Message>> = state
        .gallery
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| state.thumbnail_widget(i, e))
        .collect();

    let mut rows_ui: Vec<Element<Message>> = Vec::new();
    let mut it = tiles.into_iter();
    loop {
        let Some(first) = it.next() else { break };
        let mut r = row![first].spacing(4);
        for elem in it.by_ref().take(cols - 1) {
            r = r.push(elem);
        }
        rows_ui.push(r.into());
    }

    let grid = scrollable(container(column(rows_ui).spacing(4)).width(Length::Fill))
        .direction(Direction::Vertical(Scrollbar::default()))
        .height(Length::Fill);

    let set_button = if state.gallery.is_busy() {
        button("Set as Wallpaper")
    } else {
        button("Set as Wallpaper").on_press(Message::SetWallpaper)
    };

    let footer = row![set_button, text(&state.status)].spacing(12);

    container(column![filters, grid, footer].spacing(8))
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
        .into()
}
