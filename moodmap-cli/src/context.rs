use std::path::Path;

use moodmap::config::{ConfigBuilder, ConfigLoader};
use moodmap::prelude::*;

pub struct MoodmapCliContext {
    pub moodmap: Moodmap,
}

impl MoodmapCliContext {
    /// Load the configuration (an explicit file, else the default files and
    /// environment), apply the storage overrides and initialize moodmap.
    pub async fn new(
        config_file: Option<&Path>,
        data_dir: Option<&Path>,
        memory: bool,
    ) -> moodmap::Result<Self> {
        let config = match config_file {
            Some(path) => ConfigLoader::load_from(path)?,
            None => ConfigLoader::load()?,
        };

        let mut builder = ConfigBuilder::from_config(config);
        if memory {
            builder = builder.with_memory_storage();
        } else if let Some(dir) = data_dir {
            builder = builder.with_data_dir(dir);
        }

        let moodmap = moodmap::init(builder.build()?).await?;
        Ok(Self { moodmap })
    }

    pub fn from_moodmap(moodmap: Moodmap) -> Self {
        Self { moodmap }
    }
}
