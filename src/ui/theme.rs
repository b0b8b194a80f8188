//! Theme color definitions for the UI
//!
//! Provides dark and light color palettes selected from the config.

use crate::config::Theme;
use ratatui::style::Color;

/// Complete color palette for the UI
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Main background
    pub bg: Color,
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (headings, active tab)
    pub cyan: Color,
    /// Success / OK status
    pub green: Color,
    /// Warning status
    pub yellow: Color,
    /// Error status
    pub red: Color,
    /// Idle grid cell background
    pub cell_off: Color,
    /// Highlighted grid cell background
    pub cell_on: Color,
    /// Aim target fill
    pub target: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(22, 22, 30),
            fg: Color::Rgb(200, 200, 210),
            dim: Color::Rgb(90, 90, 110),
            cyan: Color::Rgb(80, 200, 220),
            green: Color::Rgb(80, 200, 120),
            yellow: Color::Rgb(240, 180, 80),
            red: Color::Rgb(240, 90, 100),
            cell_off: Color::Rgb(40, 40, 50),
            cell_on: Color::Rgb(80, 200, 220),
            target: Color::Rgb(240, 90, 100),
        }
    }

    /// High contrast for bright terminals
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(245, 245, 248),
            fg: Color::Rgb(30, 30, 40),
            dim: Color::Rgb(130, 130, 150),
            cyan: Color::Rgb(0, 130, 160),
            green: Color::Rgb(30, 150, 70),
            yellow: Color::Rgb(180, 120, 0),
            red: Color::Rgb(200, 50, 60),
            cell_off: Color::Rgb(220, 220, 228),
            cell_on: Color::Rgb(0, 130, 160),
            target: Color::Rgb(200, 50, 60),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::dark()
    }
}
