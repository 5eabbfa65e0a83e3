//! Theming system for swipedeck

mod palettes;

use ratatui::style::Color;

/// A color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
}

impl Theme {
    /// Look a theme up by name, falling back to Tokyo Night
    pub fn by_name(name: &str) -> Self {
        match name {
            "Tokyo Night" | "tokyo-night" => Theme::tokyo_night(),
            "Tokyo Night Day" | "tokyo-night-day" => Theme::tokyo_night_day(),
            other => {
                tracing::warn!(theme = other, "unknown theme, using Tokyo Night");
                Theme::tokyo_night()
            }
        }
    }

    /// Pick a foreground for a card faded to `opacity` (0.0 to 1.0).
    /// Terminals have no alpha, so opacity is bucketed into three shades.
    pub fn faded(&self, opacity: f32) -> Color {
        if opacity >= 0.85 {
            self.fg_secondary
        } else if opacity >= 0.5 {
            self.fg_primary
        } else {
            self.fg_muted
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_tokyo_night() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Tokyo Night");
    }

    #[test]
    fn light_theme_by_name() {
        assert_eq!(Theme::by_name("tokyo-night-day").name, "Tokyo Night Day");
    }

    #[test]
    fn unknown_name_falls_back() {
        assert_eq!(Theme::by_name("Solarized").name, "Tokyo Night");
    }

    #[test]
    fn fading_dims_the_card() {
        let theme = Theme::default();
        assert_eq!(theme.faded(1.0), theme.fg_secondary);
        assert_eq!(theme.faded(0.6), theme.fg_primary);
        assert_eq!(theme.faded(0.0), theme.fg_muted);
    }
}
