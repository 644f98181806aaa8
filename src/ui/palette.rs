//! Colors for the light and dark themes

use ratatui::style::{Color, Modifier, Style};

use crate::theme::Theme;

/// Resolved colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub accent_strong: Color,
    pub error: Color,
    pub success: Color,
    pub disabled: Color,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: Color::Rgb(255, 255, 255),
        foreground: Color::Rgb(33, 37, 41),
        muted: Color::Rgb(108, 117, 125),
        border: Color::Rgb(204, 204, 204),
        accent: Color::Rgb(0, 123, 255),
        accent_strong: Color::Rgb(0, 86, 179),
        error: Color::Rgb(220, 53, 69),
        success: Color::Rgb(40, 167, 69),
        disabled: Color::Rgb(173, 181, 189),
    };

    pub const DARK: Palette = Palette {
        background: Color::Rgb(18, 18, 18),
        foreground: Color::Rgb(224, 224, 224),
        muted: Color::Rgb(150, 150, 150),
        border: Color::Rgb(68, 68, 68),
        accent: Color::Rgb(0, 123, 255),
        accent_strong: Color::Rgb(77, 163, 255),
        error: Color::Rgb(255, 107, 107),
        success: Color::Rgb(81, 207, 102),
        disabled: Color::Rgb(90, 90, 90),
    };

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::LIGHT,
            Theme::Dark => Self::DARK,
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    /// Border of an input, by focus and validity
    pub fn input_border(&self, focused: bool, invalid: bool) -> Style {
        let color = if invalid {
            self.error
        } else if focused {
            self.accent
        } else {
            self.border
        };
        Style::default().fg(color)
    }

    /// Style of a navigation button
    pub fn button(&self, enabled: bool, primary: bool) -> Style {
        if !enabled {
            return Style::default().fg(self.disabled);
        }
        if primary {
            Style::default()
                .fg(Color::White)
                .bg(self.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.accent_strong)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_per_theme() {
        assert_eq!(Palette::for_theme(Theme::Light), Palette::LIGHT);
        assert_eq!(Palette::for_theme(Theme::Dark), Palette::DARK);
        assert_ne!(Palette::LIGHT.background, Palette::DARK.background);
    }

    #[test]
    fn test_invalid_border_wins_over_focus() {
        let palette = Palette::LIGHT;
        assert_eq!(palette.input_border(true, true).fg, Some(palette.error));
        assert_eq!(palette.input_border(true, false).fg, Some(palette.accent));
        assert_eq!(palette.input_border(false, false).fg, Some(palette.border));
    }

    #[test]
    fn test_disabled_button_is_dimmed() {
        let palette = Palette::DARK;
        assert_eq!(palette.button(false, true).fg, Some(palette.disabled));
        assert_eq!(palette.button(true, true).bg, Some(palette.accent));
    }
}
