//! # Theme
//!
//! The theme holds colors, spacing, font families and icon resources used by
//! widgets and canvases. It is installed process-wide and read through
//! [`current`]; callers query it each time they need a value rather than
//! keeping a copy, so [`set_theme`] takes effect on the next refresh.
//!
//! ```rust
//! use tessera_core::theme::{self, Theme};
//!
//! theme::set_theme(Theme {
//!     padding: 6,
//!     ..Theme::default()
//! });
//! assert_eq!(theme::padding(), 6);
//! ```

use std::path::PathBuf;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::{Color, Resource, TextStyle};

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub button: Color,
    pub text: Color,
    pub padding: i32,
    pub text_size: i32,
    pub icon_inline_size: i32,
    pub text_font: String,
    pub text_bold_font: String,
    pub text_italic_font: String,
    pub text_bold_italic_font: String,
    pub icon_dir: PathBuf,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#424242"),
            button: Color::from_hex("#212121"),
            text: Color::WHITE,
            padding: 4,
            text_size: 14,
            icon_inline_size: 24,
            text_font: "NotoSans-Regular".into(),
            text_bold_font: "NotoSans-Bold".into(),
            text_italic_font: "NotoSans-Italic".into(),
            text_bold_italic_font: "NotoSans-BoldItalic".into(),
            icon_dir: PathBuf::from("icons"),
        }
    }
}

impl Theme {
    /// Picks the font family for a text style.
    pub fn font_for(&self, style: TextStyle) -> &str {
        if style.contains(TextStyle::BOLD) {
            if style.contains(TextStyle::ITALIC) {
                &self.text_bold_italic_font
            } else {
                &self.text_bold_font
            }
        } else if style.contains(TextStyle::ITALIC) {
            &self.text_italic_font
        } else {
            &self.text_font
        }
    }

    pub fn confirm_icon(&self) -> Resource {
        Resource::new("check", self.icon_dir.join("check.png"))
    }

    pub fn cancel_icon(&self) -> Resource {
        Resource::new("cancel", self.icon_dir.join("cancel.png"))
    }
}

static THEME: Lazy<RwLock<Theme>> = Lazy::new(|| RwLock::new(Theme::default()));

pub fn current() -> Theme {
    THEME.read().clone()
}

pub fn set_theme(theme: Theme) {
    *THEME.write() = theme;
}

pub fn background_color() -> Color {
    THEME.read().background
}

pub fn padding() -> i32 {
    THEME.read().padding
}

pub fn icon_inline_size() -> i32 {
    THEME.read().icon_inline_size
}

pub fn confirm_icon() -> Resource {
    THEME.read().confirm_icon()
}

pub fn cancel_icon() -> Resource {
    THEME.read().cancel_icon()
}
