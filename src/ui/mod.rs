pub mod browser;
pub mod changer;

use rfd::{AsyncMessageDialog, MessageButtons, MessageDialog, MessageLevel};

#[cfg(target_os = "linux")]
pub fn platform_specific_settings(app_id: &str) -> iced::window::settings::PlatformSpecific {
    iced::window::settings::PlatformSpecific {
        application_id: String::from(app_id),
        override_redirect: false,
    }
}

#[cfg(not(target_os = "linux"))]
pub fn platform_specific_settings(_app_id: &str) -> iced::window::settings::PlatformSpecific {
    iced::window::settings::PlatformSpecific::default()
}

pub async fn show_dialog(level: MessageLevel, title: String, description: String) {
    AsyncMessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}

/// Modal error box for failures that happen before any window exists.
pub fn show_startup_error(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}
