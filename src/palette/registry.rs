//! Append-only palette registry.

use std::sync::{Arc, RwLock};

use super::{builtin_palettes, Palette, PaletteError, DEFAULT_PALETTE_ID};

/// A runtime-extensible collection of palettes.
///
/// Palettes are shared as `Arc<Palette>` and never mutated after
/// registration. Appends take a write lock briefly; readers always observe
/// either the list before or after an append.
#[derive(Debug, Default)]
pub struct PaletteRegistry {
    palettes: RwLock<Vec<Arc<Palette>>>,
}

impl PaletteRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in palettes.
    pub fn with_builtins() -> Self {
        let palettes = builtin_palettes().into_iter().map(Arc::new).collect();
        Self {
            palettes: RwLock::new(palettes),
        }
    }

    /// Append a palette. Ids must be unique.
    pub fn register(&self, palette: Palette) -> Result<Arc<Palette>, PaletteError> {
        palette.validate()?;
        let mut palettes = self.palettes.write().unwrap_or_else(|e| e.into_inner());
        if palettes.iter().any(|p| p.id() == palette.id()) {
            return Err(PaletteError::DuplicateId(palette.id().to_string()));
        }
        let palette = Arc::new(palette);
        palettes.push(Arc::clone(&palette));
        log::info!(
            "Registered palette '{}' with {} symbols",
            palette.id(),
            palette.len()
        );
        Ok(palette)
    }

    /// Snapshot of all palettes in registration order.
    pub fn list(&self) -> Vec<Arc<Palette>> {
        self.palettes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Palette>> {
        self.palettes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|p| p.id() == id)
            .cloned()
    }

    /// Like [`PaletteRegistry::get`] but reports unknown ids as an error.
    pub fn require(&self, id: &str) -> Result<Arc<Palette>, PaletteError> {
        self.get(id)
            .ok_or_else(|| PaletteError::NotFound(id.to_string()))
    }

    /// The moon palette, or the first registered palette if moon is absent.
    pub fn default_palette(&self) -> Option<Arc<Palette>> {
        self.get(DEFAULT_PALETTE_ID)
            .or_else(|| self.list().into_iter().next())
    }

    pub fn len(&self) -> usize {
        self.palettes.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_builtins_lists_all() {
        let registry = PaletteRegistry::with_builtins();
        assert_eq!(registry.len(), builtin_palettes().len());
        assert_eq!(registry.default_palette().unwrap().id(), "moon");
    }

    #[test]
    fn test_register_appends() {
        let registry = PaletteRegistry::with_builtins();
        let before = registry.len();
        let palette = Palette::builder("custom", "Custom", ["x", "y"]).build().unwrap();
        registry.register(palette).unwrap();
        assert_eq!(registry.len(), before + 1);
        assert_eq!(registry.list().last().unwrap().id(), "custom");
        assert_eq!(registry.get("custom").unwrap().symbols(), &["x", "y"]);
    }

    #[test]
    fn test_duplicate_id_rejected_and_original_untouched() {
        let registry = PaletteRegistry::with_builtins();
        let impostor = Palette::builder("moon", "Not the moon", ["a"]).build().unwrap();
        let err = registry.register(impostor).unwrap_err();
        assert_eq!(err, PaletteError::DuplicateId("moon".to_string()));
        assert_eq!(registry.get("moon").unwrap().name(), "Moon Phases");
    }

    #[test]
    fn test_listed_arcs_survive_later_appends() {
        let registry = PaletteRegistry::new();
        registry
            .register(Palette::builder("a", "A", ["1"]).build().unwrap())
            .unwrap();
        let snapshot = registry.list();
        registry
            .register(Palette::builder("b", "B", ["2"]).build().unwrap())
            .unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_registry_has_no_default() {
        let registry = PaletteRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.default_palette().is_none());
        assert!(matches!(registry.require("moon"), Err(PaletteError::NotFound(_))));
    }
}
