pub mod remote;

pub use remote::apply_remote;

/// Actions the changer window accepts from its buttons and from the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    ChooseDirectory,
    Show,
    Quit,
}

impl Command {
    /// Commands offered by the tray menu, in menu order.
    pub const TRAY: [Command; 4] = [Command::Show, Command::Next, Command::Previous, Command::Quit];

    #[cfg(any(test, not(target_os = "linux")))]
    pub fn menu_id(self) -> &'static str {
        match self {
            Command::Next => "next",
            Command::Previous => "previous",
            Command::ChooseDirectory => "choose-directory",
            Command::Show => "show",
            Command::Quit => "exit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::Next => "Next Wallpaper",
            Command::Previous => "Previous Wallpaper",
            Command::ChooseDirectory => "Choose Directory",
            Command::Show => "Show Window",
            Command::Quit => "Exit",
        }
    }

    #[cfg(any(test, not(target_os = "linux")))]
    pub fn from_menu_id(id: &str) -> Option<Self> {
        match id {
            "next" => Some(Command::Next),
            "previous" => Some(Command::Previous),
            "choose-directory" => Some(Command::ChooseDirectory),
            "show" => Some(Command::Show),
            "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}
