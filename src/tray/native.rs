use tokio::sync::mpsc::UnboundedSender;
use tray_icon::menu::{Menu, MenuEvent, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use super::{TRAY_TITLE, icon_image, post};
use crate::commands::Command;
use crate::error::{Error, Result};

pub struct Handle(TrayIcon);

impl Handle {
    pub fn shutdown(self) {
        MenuEvent::set_event_handler(None::<fn(MenuEvent)>);
        drop(self.0);
    }
}

fn build_icon() -> Result<Icon> {
    let img = icon_image();
    let (w, h) = img.dimensions();
    Icon::from_rgba(img.into_raw(), w, h).map_err(|e| Error::Tray(e.to_string()))
}

/// Must be called on the thread running the window event loop.
pub fn spawn(tx: UnboundedSender<Command>) -> Result<Handle> {
    let menu = Menu::new();
    for cmd in Command::TRAY {
        let item = MenuItem::with_id(cmd.menu_id(), cmd.label(), true, None);
        menu.append(&item).map_err(|e| Error::Tray(e.to_string()))?;
    }

    let icon = TrayIconBuilder::new()
        .with_icon(build_icon()?)
        .with_tooltip(TRAY_TITLE)
        .with_menu(Box::new(menu))
        .build()
        .map_err(|e| Error::Tray(e.to_string()))?;

    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        match Command::from_menu_id(&event.id.0) {
            Some(cmd) => post(&tx, cmd),
            None => tracing::debug!(id = ?event.id, "unknown tray menu item"),
        }
    }));

    Ok(Handle(icon))
}
