use std::path::Path;

use serde::Deserialize;

use crate::error::ServerError;

#[derive(Deserialize)]
struct CatalogFile {
    themes: Vec<String>,
}

/// Round themes loaded once at startup. Draws are uniform with replacement,
/// so back-to-back rounds may repeat a theme.
pub struct ThemeCatalog {
    themes: Vec<String>,
}

impl ThemeCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let raw = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&raw)?;
        Self::from_themes(file.themes)
    }

    pub fn from_themes(themes: Vec<String>) -> Result<Self, ServerError> {
        if themes.is_empty() {
            return Err(ServerError::EmptyCatalog);
        }
        Ok(Self { themes })
    }

    pub fn draw(&self) -> &str {
        let idx = rand::random::<usize>() % self.themes.len();
        &self.themes[idx]
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_an_empty_catalog() {
        assert!(matches!(
            ThemeCatalog::from_themes(Vec::new()),
            Err(ServerError::EmptyCatalog)
        ));
    }

    #[test]
    fn draws_from_the_loaded_set() {
        let catalog =
            ThemeCatalog::from_themes(vec!["disco".into(), "road trip".into()]).unwrap();
        for _ in 0..20 {
            let theme = catalog.draw();
            assert!(theme == "disco" || theme == "road trip");
        }
    }

    #[test]
    fn loads_the_catalog_file_shape() {
        let path = std::env::temp_dir().join(format!("themes-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"themes": ["one", "two", "three"]}"#).unwrap();
        let catalog = ThemeCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 3);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_errors_surface() {
        assert!(ThemeCatalog::load("/definitely/not/here.json").is_err());
        let path = std::env::temp_dir().join(format!("themes-bad-{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ThemeCatalog::load(&path),
            Err(ServerError::Json(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
