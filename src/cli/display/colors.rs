//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for a destination endpoint
    pub fn get_endpoint_color(&self, connected: bool) -> TableColor {
        if connected {
            self.success
        } else {
            self.warning
        }
    }

    /// Scheduled backups are highlighted, manual ones muted
    pub fn get_schedule_color(&self, schedule: &str) -> TableColor {
        if schedule.is_empty() {
            self.muted
        } else {
            self.info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
    }

    #[test]
    fn test_endpoint_and_schedule_colors() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_endpoint_color(true), TableColor::Green);
        assert_eq!(theme.get_endpoint_color(false), TableColor::Yellow);
        assert_eq!(theme.get_schedule_color("0 2 * * *"), TableColor::Cyan);
        assert_eq!(theme.get_schedule_color(""), TableColor::DarkGrey);
    }
}
