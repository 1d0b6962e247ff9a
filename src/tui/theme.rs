//! Color themes for the live view.
//!
//! Built-in themes: default, dracula, nord, monochrome, matrix.
//! Selected via `--theme` or the saved preference.

use ratatui::style::Color;
use std::borrow::Cow;

/// Colors used by the live view
#[derive(Clone, Debug)]
pub struct Theme {
    name: Cow<'static, str>,

    // Chrome
    pub border: Color,
    pub text: Color,
    pub text_dim: Color,
    pub header: Color,
    pub shortcut: Color,

    // Chart
    pub plot: Color,
    pub axis: Color,

    // Outcome highlighting
    pub success: Color,
    pub warning: Color, // diagnostics, moderate loss
    pub error: Color,   // failed probes, heavy loss
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Terminal palette colors, readable on light and dark backgrounds
    pub fn default_theme() -> Self {
        Self {
            name: Cow::Borrowed("default"),
            border: Color::Cyan,
            text: Color::White,
            text_dim: Color::Gray,
            header: Color::Cyan,
            shortcut: Color::Yellow,
            plot: Color::LightBlue,
            axis: Color::Cyan,
            success: Color::LightGreen,
            warning: Color::LightYellow,
            error: Color::LightRed,
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: Cow::Borrowed("dracula"),
            border: Color::Rgb(189, 147, 249),   // Purple
            text: Color::Rgb(248, 248, 242),     // Foreground
            text_dim: Color::Rgb(98, 114, 164),  // Comment
            header: Color::Rgb(255, 121, 198),   // Pink
            shortcut: Color::Rgb(241, 250, 140), // Yellow
            plot: Color::Rgb(139, 233, 253),     // Cyan
            axis: Color::Rgb(189, 147, 249),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(255, 184, 108),
            error: Color::Rgb(255, 85, 85),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: Cow::Borrowed("nord"),
            border: Color::Rgb(136, 192, 208),   // Nord8
            text: Color::Rgb(236, 239, 244),     // Nord6
            text_dim: Color::Rgb(76, 86, 106),   // Nord3
            header: Color::Rgb(136, 192, 208),
            shortcut: Color::Rgb(235, 203, 139), // Nord13
            plot: Color::Rgb(129, 161, 193),     // Nord9
            axis: Color::Rgb(136, 192, 208),
            success: Color::Rgb(163, 190, 140),  // Nord14
            warning: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),     // Nord11
        }
    }

    pub fn monochrome() -> Self {
        Self {
            name: Cow::Borrowed("monochrome"),
            border: Color::Rgb(200, 200, 200),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(120, 120, 120),
            header: Color::Rgb(255, 255, 255),
            shortcut: Color::Rgb(200, 200, 200),
            plot: Color::Rgb(230, 230, 230),
            axis: Color::Rgb(160, 160, 160),
            success: Color::Rgb(200, 200, 200),
            warning: Color::Rgb(170, 170, 170),
            error: Color::Rgb(255, 255, 255),
        }
    }

    pub fn matrix() -> Self {
        Self {
            name: Cow::Borrowed("matrix"),
            border: Color::Rgb(0, 255, 0),
            text: Color::Rgb(0, 255, 0),
            text_dim: Color::Rgb(0, 100, 0),
            header: Color::Rgb(0, 255, 0),
            shortcut: Color::Rgb(100, 255, 100),
            plot: Color::Rgb(150, 255, 150),
            axis: Color::Rgb(0, 160, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(200, 255, 100),
            error: Color::Rgb(255, 100, 100),
        }
    }

    /// Get a theme by name, falling back to the default
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            "nord" => Self::nord(),
            "monochrome" | "mono" => Self::monochrome(),
            "matrix" | "hacker" => Self::matrix(),
            _ => Self::default_theme(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `name` selects a built-in theme (aliases included)
    pub fn is_known(name: &str) -> bool {
        matches!(
            name.to_lowercase().as_str(),
            "default" | "dracula" | "nord" | "monochrome" | "mono" | "matrix" | "hacker"
        )
    }

    /// List all available theme names
    pub fn list() -> &'static [&'static str] {
        &["default", "dracula", "nord", "monochrome", "matrix"]
    }
}
