//! Base-value table loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use stats_core::BaseStatTable;

use crate::loaders::{LoadResult, read_file};

/// TOML layout of a character sheet.
///
/// ```toml
/// [stats]
/// max_health = 120
/// attack = 14.5
/// ```
#[derive(Debug, Clone, Deserialize)]
struct TableDocument {
    stats: BTreeMap<String, f32>,
}

/// Loader for base-value tables.
///
/// The format is chosen by extension: `.ron` files hold a serialized
/// [`BaseStatTable`], anything else is read as TOML with a `[stats]` section.
pub struct TableLoader;

impl TableLoader {
    /// Load a base-value table from a TOML or RON file.
    ///
    /// Stat names are matched case-insensitively in snake_case. Unknown names
    /// and non-finite values are rejected.
    pub fn load(path: &Path) -> LoadResult<BaseStatTable> {
        let content = read_file(path)?;
        let table = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::parse_ron(&content)?,
            _ => Self::parse_toml(&content)?,
        };
        tracing::debug!(path = %path.display(), stats = table.len(), "loaded base table");
        Ok(table)
    }

    pub fn parse_toml(content: &str) -> LoadResult<BaseStatTable> {
        let document: TableDocument = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse base table TOML: {}", e))?;
        let table = BaseStatTable::from_named(
            document
                .stats
                .iter()
                .map(|(name, value)| (name.as_str(), *value)),
        )?;
        Ok(table)
    }

    pub fn parse_ron(content: &str) -> LoadResult<BaseStatTable> {
        let table: BaseStatTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse base table RON: {}", e))?;
        table.validate()?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stats_core::{StatKind, StatsError};

    #[test]
    fn parses_toml_sheet() {
        let table = TableLoader::parse_toml(
            r#"
            [stats]
            max_health = 120
            Attack = 14.5
            magic_defense = 3
            "#,
        )
        .unwrap();
        assert_eq!(table.get(StatKind::MaxHealth), Some(120.0));
        assert_eq!(table.get(StatKind::Attack), Some(14.5));
        assert_eq!(table.get(StatKind::MagicDefense), Some(3.0));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn rejects_unknown_stat() {
        let err = TableLoader::parse_toml("[stats]\nluck = 7\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<StatsError>(),
            Some(&StatsError::UnknownStat("luck".into()))
        );
    }

    #[test]
    fn ron_round_trip() {
        let table = BaseStatTable::standard();
        let text = ron::ser::to_string(&table).unwrap();
        assert_eq!(TableLoader::parse_ron(&text).unwrap(), table);
    }

    #[test]
    fn loads_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("hero.toml");
        std::fs::write(&toml_path, "[stats]\nmax_mana = 80\n").unwrap();
        let table = TableLoader::load(&toml_path).unwrap();
        assert_eq!(table.get(StatKind::MaxMana), Some(80.0));

        let ron_path = dir.path().join("hero.ron");
        let text = ron::ser::to_string(&BaseStatTable::new().with(StatKind::Defense, 9.0)).unwrap();
        std::fs::write(&ron_path, text).unwrap();
        let table = TableLoader::load(&ron_path).unwrap();
        assert_eq!(table.get(StatKind::Defense), Some(9.0));

        assert!(TableLoader::load(&dir.path().join("missing.toml")).is_err());
    }
}
