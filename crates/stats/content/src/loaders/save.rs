//! Save file reader/writer.

use std::path::Path;

use stats_core::{CharacterSave, ResourcePool, StatsConfig};

use crate::loaders::{LoadResult, read_file};

/// RON save files holding a [`CharacterSave`].
pub struct SaveFile;

impl SaveFile {
    /// Writes `save` as pretty-printed RON, replacing any existing file.
    pub fn write(path: &Path, save: &CharacterSave) -> LoadResult<()> {
        let text = ron::ser::to_string_pretty(save, ron::ser::PrettyConfig::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize save: {}", e))?;
        std::fs::write(path, text)
            .map_err(|e| anyhow::anyhow!("Failed to write save {}: {}", path.display(), e))?;
        tracing::info!(path = %path.display(), "save written");
        Ok(())
    }

    /// Reads and validates a save.
    pub fn read(path: &Path) -> LoadResult<CharacterSave> {
        let content = read_file(path)?;
        let save: CharacterSave = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse save RON: {}", e))?;
        save.validate()?;
        Ok(save)
    }

    /// Reads a save and rebuilds the character from it.
    pub fn restore(path: &Path, config: StatsConfig) -> LoadResult<ResourcePool> {
        let save = Self::read(path)?;
        Ok(ResourcePool::from_save_with_config(&save, config)?)
    }
}
