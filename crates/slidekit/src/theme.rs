use std::fmt;
use std::str::FromStr;

use eframe::egui::Color32;

use crate::document::Document;
use crate::store::Store;

pub const STORAGE_KEY: &str = "theme";
pub const TOGGLE_ID: &str = "themeToggle";
pub const ICON_ID: &str = "themeIcon";
pub const ROOT_ATTR: &str = "data-theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn icon_class(self) -> &'static str {
        match self {
            Self::Dark => "fas fa-sun",
            Self::Light => "fas fa-moon",
        }
    }

    fn toggle_title(self) -> &'static str {
        match self {
            Self::Dark => "Switch to light mode",
            Self::Light => "Switch to dark mode",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => anyhow::bail!("Invalid theme: {s}. Must be 'light' or 'dark'."),
        }
    }
}

/// Owns the light/dark flag, mirrors it onto the document and persists it.
#[derive(Debug)]
pub struct ThemeManager {
    current: ThemePreference,
}

impl ThemeManager {
    /// Read the saved preference (falling back to `fallback`, then light)
    /// and apply it right away.
    pub fn new(
        doc: &mut Document,
        store: &mut dyn Store,
        fallback: Option<ThemePreference>,
    ) -> Self {
        let current = store
            .get(STORAGE_KEY)
            .and_then(|v| v.parse().ok())
            .or(fallback)
            .unwrap_or_default();
        let mut manager = Self { current };
        manager.set_theme(current, doc, store);
        manager
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    pub fn set_theme(&mut self, value: ThemePreference, doc: &mut Document, store: &mut dyn Store) {
        let root = doc.root();
        doc.get_mut(root).set_attr(ROOT_ATTR, value.as_str());
        self.current = value;
        if let Err(e) = store.set(STORAGE_KEY, value.as_str()) {
            tracing::warn!("could not persist theme: {e}");
        }

        if let Some(icon) = doc.by_id_mut(ICON_ID) {
            icon.set_class_name(value.icon_class());
        }
        if let Some(toggle) = doc.by_id_mut(TOGGLE_ID) {
            toggle.title = value.toggle_title().to_string();
        }
        tracing::debug!(theme = %value, "theme applied");
    }

    pub fn toggle_theme(&mut self, doc: &mut Document, store: &mut dyn Store) {
        self.set_theme(self.current.toggled(), doc, store);
    }

    pub fn palette(&self) -> Theme {
        Theme::from_preference(self.current)
    }
}

/// Colours and sizes the painter uses for a theme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub surface: Color32,
    pub h1_size: f32,
    pub body_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            surface: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            h1_size: 72.0,
            body_size: 36.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            surface: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            h1_size: 72.0,
            body_size: 36.0,
        }
    }

    pub fn from_preference(pref: ThemePreference) -> Self {
        match pref {
            ThemePreference::Dark => Self::dark(),
            ThemePreference::Light => Self::light(),
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let opacity = opacity.clamp(0.0, 1.0);
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;
    use crate::store::MemoryStore;

    fn doc() -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        let toggle = doc.append(body, Element::new("button").with_id(TOGGLE_ID));
        doc.append(toggle, Element::new("i").with_id(ICON_ID));
        doc
    }

    #[test]
    fn test_defaults_to_light() {
        let mut doc = doc();
        let mut store = MemoryStore::new();
        let theme = ThemeManager::new(&mut doc, &mut store, None);
        assert_eq!(theme.current(), ThemePreference::Light);
        assert_eq!(doc.get(doc.root()).attr(ROOT_ATTR), Some("light"));
        let icon = doc.by_id(ICON_ID).unwrap();
        assert_eq!(doc.get(icon).class_name(), "fas fa-moon");
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut doc = doc();
        let mut store = MemoryStore::new();
        let mut theme = ThemeManager::new(&mut doc, &mut store, None);

        theme.toggle_theme(&mut doc, &mut store);
        assert_eq!(theme.current(), ThemePreference::Dark);
        let toggle = doc.by_id(TOGGLE_ID).unwrap();
        assert_eq!(doc.get(toggle).title, "Switch to light mode");

        theme.toggle_theme(&mut doc, &mut store);
        assert_eq!(theme.current(), ThemePreference::Light);
        assert_eq!(store.get(STORAGE_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_persists_across_reload() {
        let mut store = MemoryStore::new();
        {
            let mut doc = doc();
            let mut theme = ThemeManager::new(&mut doc, &mut store, None);
            theme.toggle_theme(&mut doc, &mut store);
        }
        let mut doc = doc();
        let theme = ThemeManager::new(&mut doc, &mut store, None);
        assert_eq!(theme.current(), ThemePreference::Dark);
        assert_eq!(doc.get(doc.root()).attr(ROOT_ATTR), Some("dark"));
    }

    #[test]
    fn test_saved_value_beats_fallback() {
        let mut doc = doc();
        let mut store = MemoryStore::new();
        let theme = ThemeManager::new(&mut doc, &mut store, Some(ThemePreference::Dark));
        assert_eq!(theme.current(), ThemePreference::Dark);

        store.set(STORAGE_KEY, "light").unwrap();
        let theme = ThemeManager::new(&mut doc, &mut store, Some(ThemePreference::Dark));
        assert_eq!(theme.current(), ThemePreference::Light);
    }

    #[test]
    fn test_garbage_value_falls_back() {
        let mut doc = doc();
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "sepia").unwrap();
        let theme = ThemeManager::new(&mut doc, &mut store, None);
        assert_eq!(theme.current(), ThemePreference::Light);
    }
}
