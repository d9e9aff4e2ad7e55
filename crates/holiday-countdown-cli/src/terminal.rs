//! Terminal rendering of the countdown widget.

use holiday_countdown_core::{IconKind, WidgetDisplay};

/// Holds the widget state the presenter sets; `render` turns it into a line.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    title: String,
    content: String,
    icon: Option<IconKind>,
    icon_visible: bool,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self) -> String {
        let marker = match (self.icon_visible, self.icon) {
            (true, Some(IconKind::Loading)) => "[*] ",
            (true, Some(IconKind::Urgent)) => "[!] ",
            _ => "",
        };
        format!("{}{}: {}", marker, self.title, self.content)
    }
}

impl WidgetDisplay for TerminalDisplay {
    fn display(&mut self, title: &str, content: &str) {
        self.title = title.to_string();
        self.content = content.to_string();
    }

    fn set_icon(&mut self, icon: IconKind) {
        self.icon = Some(icon);
    }

    fn set_icon_visible(&mut self, visible: bool) {
        self.icon_visible = visible;
    }
}
