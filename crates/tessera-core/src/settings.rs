//! Runtime configuration.
//!
//! Settings start from defaults, are overlaid by an optional JSON file named
//! by `TESSERA_SETTINGS`, and finally by the `TESSERA_SCALE` environment
//! variable:
//!
//! ```json
//! { "scale": 1.5, "theme": { "padding": 6, "background": "#202020" } }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SettingsError;
use crate::theme::{self, Theme};
use crate::Color;

pub const SCALE_ENV: &str = "TESSERA_SCALE";
pub const SETTINGS_ENV: &str = "TESSERA_SETTINGS";

/// Partial theme; unset fields keep the defaults.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeOverrides {
    pub background: Option<String>,
    pub button: Option<String>,
    pub text: Option<String>,
    pub padding: Option<i32>,
    pub text_size: Option<i32>,
    pub icon_inline_size: Option<i32>,
    pub text_font: Option<String>,
    pub text_bold_font: Option<String>,
    pub text_italic_font: Option<String>,
    pub text_bold_italic_font: Option<String>,
    pub icon_dir: Option<PathBuf>,
}

impl ThemeOverrides {
    pub fn apply(&self, theme: &mut Theme) {
        if let Some(c) = &self.background {
            theme.background = Color::from_hex(c);
        }
        if let Some(c) = &self.button {
            theme.button = Color::from_hex(c);
        }
        if let Some(c) = &self.text {
            theme.text = Color::from_hex(c);
        }
        if let Some(p) = self.padding {
            theme.padding = p;
        }
        if let Some(s) = self.text_size {
            theme.text_size = s;
        }
        if let Some(s) = self.icon_inline_size {
            theme.icon_inline_size = s;
        }
        if let Some(f) = &self.text_font {
            theme.text_font = f.clone();
        }
        if let Some(f) = &self.text_bold_font {
            theme.text_bold_font = f.clone();
        }
        if let Some(f) = &self.text_italic_font {
            theme.text_italic_font = f.clone();
        }
        if let Some(f) = &self.text_bold_italic_font {
            theme.text_bold_italic_font = f.clone();
        }
        if let Some(d) = &self.icon_dir {
            theme.icon_dir = d.clone();
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub scale: f32,
    pub theme: ThemeOverrides,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            theme: ThemeOverrides::default(),
        }
    }
}

impl Settings {
    /// Reads `TESSERA_SETTINGS` and `TESSERA_SCALE` from the environment.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var_os(SETTINGS_ENV).map(PathBuf::from);
        let scale = std::env::var(SCALE_ENV).ok();
        Self::load_from(path.as_deref(), scale.as_deref())
    }

    /// Defaults, overlaid by the file at `settings_path`, then by `scale`.
    pub fn load_from(
        settings_path: Option<&Path>,
        scale: Option<&str>,
    ) -> Result<Self, SettingsError> {
        let mut settings = match settings_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(v) = scale {
            settings.scale = parse_scale(v)?;
        }
        log::debug!("loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        validate_scale(settings.scale)?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn theme(&self) -> Theme {
        let mut theme = Theme::default();
        self.theme.apply(&mut theme);
        theme
    }

    /// Installs the configured theme process-wide.
    pub fn install(&self) {
        theme::set_theme(self.theme());
    }
}

pub fn parse_scale(v: &str) -> Result<f32, SettingsError> {
    let scale = v
        .trim()
        .parse::<f32>()
        .map_err(|_| SettingsError::InvalidScale(v.to_string()))?;
    validate_scale(scale)
}

fn validate_scale(scale: f32) -> Result<f32, SettingsError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(SettingsError::InvalidScale(scale.to_string()))
    }
}
