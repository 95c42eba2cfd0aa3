use anyhow::Result;

use super::store::PreferenceStore;

pub const THEME_KEY: &str = "theme";
pub const SIDEBAR_KEY: &str = "sidebarOpen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Unknown values fall back to light, matching a fresh install
    pub fn parse(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Theme and sidebar state, persisted on every change
#[derive(Debug, Clone)]
pub struct ViewPreferences {
    store: PreferenceStore,
    theme: Theme,
    sidebar_open: bool,
}

impl ViewPreferences {
    pub fn load(store: PreferenceStore) -> Self {
        let theme = store.get(THEME_KEY).map(Theme::parse).unwrap_or_default();
        // Anything but an explicit "false" keeps the sidebar open
        let sidebar_open = store.get(SIDEBAR_KEY) != Some("false");
        Self { store, theme, sidebar_open }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Flip the theme and persist it. The in-memory value changes even if the
    /// write fails; the error is returned for the caller to report.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.theme = self.theme.toggled();
        self.store.set(THEME_KEY, self.theme.as_str())?;
        Ok(self.theme)
    }

    pub fn toggle_sidebar(&mut self) -> Result<bool> {
        self.sidebar_open = !self.sidebar_open;
        self.store.set(SIDEBAR_KEY, if self.sidebar_open { "true" } else { "false" })?;
        Ok(self.sidebar_open)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults_without_stored_values() {
        let prefs = ViewPreferences::load(PreferenceStore::in_memory());
        assert_eq!(prefs.theme(), Theme::Light);
        assert!(prefs.sidebar_open());
    }

    #[test]
    fn test_load_stored_values() {
        let dir = TempDir::new().unwrap();
        let mut store = PreferenceStore::open(dir.path());
        store.set(THEME_KEY, "dark").unwrap();
        store.set(SIDEBAR_KEY, "false").unwrap();

        let prefs = ViewPreferences::load(PreferenceStore::open(dir.path()));
        assert_eq!(prefs.theme(), Theme::Dark);
        assert!(!prefs.sidebar_open());
    }

    #[test]
    fn test_sidebar_non_false_values_mean_open() {
        let mut store = PreferenceStore::in_memory();
        store.set(SIDEBAR_KEY, "no").unwrap();
        assert!(ViewPreferences::load(store).sidebar_open());
    }

    #[test]
    fn test_toggle_theme_twice_restores_value() {
        let dir = TempDir::new().unwrap();
        let mut prefs = ViewPreferences::load(PreferenceStore::open(dir.path()));

        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(PreferenceStore::open(dir.path()).get(THEME_KEY), Some("dark"));

        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(PreferenceStore::open(dir.path()).get(THEME_KEY), Some("light"));
    }

    #[test]
    fn test_toggle_sidebar_persists_string() {
        let dir = TempDir::new().unwrap();
        let mut prefs = ViewPreferences::load(PreferenceStore::open(dir.path()));

        assert!(!prefs.toggle_sidebar().unwrap());
        assert_eq!(PreferenceStore::open(dir.path()).get(SIDEBAR_KEY), Some("false"));

        assert!(prefs.toggle_sidebar().unwrap());
        assert_eq!(PreferenceStore::open(dir.path()).get(SIDEBAR_KEY), Some("true"));
    }

    #[test]
    fn test_theme_parse_unknown_is_light() {
        assert_eq!(Theme::parse("solarized"), Theme::Light);
        assert_eq!(Theme::parse("dark"), Theme::Dark);
    }
}
