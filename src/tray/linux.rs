use ksni::menu::StandardItem;
use ksni::{MenuItem, TrayService};
use tokio::sync::mpsc::UnboundedSender;

use super::{TRAY_TITLE, icon_image, post};
use crate::commands::Command;
use crate::error::{Error, Result};

pub struct Handle(ksni::Handle<ChangerTray>);

impl Handle {
    pub fn shutdown(self) {
        self.0.shutdown();
    }
}

pub struct ChangerTray {
    tx: UnboundedSender<Command>,
}

impl ksni::Tray for ChangerTray {
    fn id(&self) -> String {
        String::from("wallchanger")
    }

    fn title(&self) -> String {
        String::from(TRAY_TITLE)
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        let img = icon_image();

        // SNI wants ARGB in network byte order.
        let mut data = Vec::with_capacity((img.width() * img.height() * 4) as usize);
        for pixel in img.pixels() {
            let [r, g, b, a] = pixel.0;
            data.extend_from_slice(&[a, r, g, b]);
        }

        vec![ksni::Icon {
            width: img.width() as i32,
            height: img.height() as i32,
            data,
        }]
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        post(&self.tx, Command::Show);
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        Command::TRAY
            .into_iter()
            .map(|cmd| {
                let item: MenuItem<Self> = StandardItem {
                    label: cmd.label().to_string(),
                    activate: Box::new(move |tray: &mut Self| post(&tray.tx, cmd)),
                    ..Default::default()
                }
                .into();
                item
            })
            .collect()
    }
}

pub fn spawn(tx: UnboundedSender<Command>) -> Result<Handle> {
    // StatusNotifierItem lives on the session bus.
    if std::env::var_os("DBUS_SESSION_BUS_ADDRESS").is_none() {
        return Err(Error::Tray(String::from("no D-Bus session bus")));
    }

    let service = TrayService::new(ChangerTray { tx });
    let handle = service.handle();
    service.spawn();
    Ok(Handle(handle))
}
