//! Data-driven tower content and its loaders.
//!
//! This crate reads the RON/TOML files under a data directory into a
//! [`tower_core::ContentRegistry`]:
//! - Species (`units.ron`)
//! - Spells and abilities (`spells.ron`, `abilities.ron`)
//! - Item catalog (`items.ron`)
//! - Traps and characters (`traps.ron`, `characters.ron`)
//! - Tuning and weight tables (`tables.toml`)
//!
//! Content is immutable once loaded and never appears in saved game state
//! except by name.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, CharacterLoader, ContentFactory, ItemLoader, SpellLoader, TablesLoader,
    TrapLoader, UnitLoader, load_registry,
};

use std::path::PathBuf;

/// Directory of the content shipped with this crate.
pub fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[cfg(all(test, feature = "loaders"))]
mod tests {
    use super::*;

    #[test]
    fn bundled_content_loads() {
        let registry = load_registry(bundled_data_dir()).unwrap();
        assert!(registry.unit_count() > 0);
        assert!(registry.item_count() > 0);
    }
}
