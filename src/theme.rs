use ratatui::style::Color;

/// Binary light/dark preference, applied immediately to the whole surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Light => "Light Mode",
            Theme::Dark => "Dark Mode",
        }
    }

    // Palette

    pub fn bg(&self) -> Color {
        match self {
            Theme::Light => Color::White,
            Theme::Dark => Color::Black,
        }
    }

    pub fn fg(&self) -> Color {
        match self {
            Theme::Light => Color::Black,
            Theme::Dark => Color::White,
        }
    }

    pub fn muted(&self) -> Color {
        match self {
            Theme::Light => Color::Gray,
            Theme::Dark => Color::DarkGray,
        }
    }

    pub fn accent(&self) -> Color {
        Color::Cyan
    }

    pub fn code(&self) -> Color {
        match self {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::LightGreen,
        }
    }

    pub fn border(&self) -> Color {
        self.muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_both_ways() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
    }

    #[test]
    fn round_trips_through_str() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(Theme::from_str(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::from_str("solarized"), None);
    }
}
