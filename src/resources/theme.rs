//! Widget theme.
//!
//! A [`Theme`] is shared by every widget built from it through an
//! `Arc<Theme>`; changing the theme means building a new one and handing it
//! to new widgets. Themes can be loaded from the `[theme]` section of an INI
//! file, with any missing key keeping the built-in default.

use std::path::Path;

use configparser::ini::Ini;
use log::warn;

use crate::components::clickable::ClickState;
use crate::components::tint::Color;
use crate::error::SceneError;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub idle: Color,
    pub hover: Color,
    pub pressed: Color,
    pub disabled: Color,
    pub text: Color,
    pub font: String,
    pub font_size: f32,
    /// Texture for widget faces. Empty means a solid quad.
    pub face_texture: String,
    /// Sound played when a button is clicked.
    pub click_sound: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            idle: Color::new(60, 60, 70, 255),
            hover: Color::new(90, 90, 110, 255),
            pressed: Color::new(40, 40, 50, 255),
            disabled: Color::new(60, 60, 60, 128),
            text: Color::WHITE,
            font: "default".into(),
            font_size: 16.0,
            face_texture: String::new(),
            click_sound: None,
        }
    }
}

impl Theme {
    /// Face colour for a clickable state.
    pub fn face_color(&self, state: ClickState, enabled: bool) -> Color {
        if !enabled {
            return self.disabled;
        }
        match state {
            ClickState::Idle => self.idle,
            ClickState::Hovering => self.hover,
            ClickState::Pressed => self.pressed,
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|e| SceneError::Config(format!("failed to load theme: {}", e)))?;
        Ok(Self::from_ini(&config))
    }

    fn from_ini(config: &Ini) -> Self {
        let mut theme = Self::default();
        let color = |key: &str, slot: &mut Color| {
            if let Some(hex) = config.get("theme", key) {
                match Color::from_hex(&hex) {
                    Some(c) => *slot = c,
                    None => warn!("Ignoring invalid theme colour {} = '{}'", key, hex),
                }
            }
        };
        color("idle", &mut theme.idle);
        color("hover", &mut theme.hover);
        color("pressed", &mut theme.pressed);
        color("disabled", &mut theme.disabled);
        color("text", &mut theme.text);
        if let Some(font) = config.get("theme", "font") {
            theme.font = font;
        }
        if let Some(size) = config.getfloat("theme", "font_size").ok().flatten() {
            theme.font_size = size as f32;
        }
        if let Some(tex) = config.get("theme", "face_texture") {
            theme.face_texture = tex;
        }
        theme.click_sound = config.get("theme", "click_sound");
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_color_follows_state() {
        let theme = Theme::default();
        assert_eq!(theme.face_color(ClickState::Hovering, true), theme.hover);
        assert_eq!(theme.face_color(ClickState::Pressed, false), theme.disabled);
    }

    #[test]
    fn ini_overrides_only_given_keys() {
        let mut ini = Ini::new();
        ini.read("[theme]\nhover = ff0000\nclick_sound = click\nfont_size = 20\n".to_string())
            .unwrap();
        let theme = Theme::from_ini(&ini);
        assert_eq!(theme.hover, Color::new(255, 0, 0, 255));
        assert_eq!(theme.idle, Theme::default().idle);
        assert_eq!(theme.click_sound.as_deref(), Some("click"));
        assert_eq!(theme.font_size, 20.0);
    }
}
