//! Color theme definitions

use ratatui::style::{Color, Modifier, Style};

/// Colors for the lifecycle stage of a consent or inspection
#[derive(Debug, Clone, Copy)]
pub struct StatusPalette {
    pub in_progress: Color,
    pub approved: Color,
    pub attention: Color,
    pub rejected: Color,
    pub closed: Color,
}

/// Lifecycle stage a status label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStage {
    InProgress,
    Approved,
    Attention,
    Rejected,
    Closed,
    Unknown,
}

impl From<&str> for StatusStage {
    fn from(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "lodged" | "vetting" | "processing" => Self::InProgress,
            "granted" | "passed" => Self::Approved,
            "on hold" | "partial pass" | "booked" => Self::Attention,
            "refused" | "failed" => Self::Rejected,
            "withdrawn" | "cancelled" => Self::Closed,
            _ => Self::Unknown,
        }
    }
}

/// Application color theme
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,
    pub fg_bright: Color,
    pub accent: Color,
    pub warning: Color,

    // Table chrome
    pub frame: Color,
    pub frame_focused: Color,
    pub selected_row: Color,
    pub cursor_row: Color,
    pub highlight: Color,

    pub status: StatusPalette,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            fg_dim: Color::DarkGray,
            fg_bright: Color::White,
            accent: Color::Cyan,
            warning: Color::Yellow,
            frame: Color::DarkGray,
            frame_focused: Color::Cyan,
            selected_row: Color::Rgb(30, 60, 90),
            cursor_row: Color::Blue,
            highlight: Color::Yellow,
            status: StatusPalette {
                in_progress: Color::LightBlue,
                approved: Color::Green,
                attention: Color::Yellow,
                rejected: Color::Red,
                closed: Color::DarkGray,
            },
        }
    }
}

impl Theme {
    /// Theme by settings name; unknown names get the dark default
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "default" | "dark" => Self::default(),
            other => {
                tracing::warn!("Unknown theme '{}', using default", other);
                Self::default()
            }
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            fg_dim: Color::Gray,
            fg_bright: Color::Black,
            accent: Color::Blue,
            warning: Color::Rgb(170, 110, 0),
            frame: Color::Gray,
            frame_focused: Color::Blue,
            selected_row: Color::Rgb(200, 220, 245),
            cursor_row: Color::LightBlue,
            highlight: Color::Magenta,
            status: StatusPalette {
                in_progress: Color::Blue,
                approved: Color::Rgb(0, 120, 60),
                attention: Color::Rgb(170, 110, 0),
                rejected: Color::Red,
                closed: Color::Gray,
            },
        }
    }

    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    pub fn bright(&self) -> Style {
        Style::default().fg(self.fg_bright)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn highlight(&self) -> Style {
        Style::default().fg(self.highlight).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.frame)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.frame_focused)
    }

    /// Row whose record is in the selection set
    pub fn selected(&self) -> Style {
        Style::default().bg(self.selected_row)
    }

    /// Row under the cursor
    pub fn cursor(&self) -> Style {
        Style::default()
            .bg(self.cursor_row)
            .fg(self.fg_bright)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive(&self) -> Style {
        self.dim()
    }

    pub fn header(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD)
    }

    /// Header of the column under the column cursor
    pub fn header_focused(&self) -> Style {
        self.header().add_modifier(Modifier::UNDERLINED)
    }

    /// Color for consent status and inspection outcome text
    pub fn status_style(&self, label: &str) -> Style {
        let color = match StatusStage::from(label) {
            StatusStage::InProgress => self.status.in_progress,
            StatusStage::Approved => self.status.approved,
            StatusStage::Attention => self.status.attention,
            StatusStage::Rejected => self.status.rejected,
            StatusStage::Closed => self.status.closed,
            StatusStage::Unknown => return self.normal(),
        };
        Style::default().fg(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_map_to_stages() {
        assert_eq!(StatusStage::from("On hold"), StatusStage::Attention);
        assert_eq!(StatusStage::from(" GRANTED "), StatusStage::Approved);
        assert_eq!(StatusStage::from("Cancelled"), StatusStage::Closed);
        assert_eq!(StatusStage::from("Unallocated"), StatusStage::Unknown);

        let theme = Theme::default();
        assert_eq!(theme.status_style("Refused").fg, Some(Color::Red));
        assert_eq!(theme.status_style("whatever"), theme.normal());
    }
}
