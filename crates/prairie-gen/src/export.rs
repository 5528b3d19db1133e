//! JSON snapshot of one generated landscape.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use prairie_config::Config;
use prairie_terrain::{Placement, TerrainGrid};
use serde::Serialize;

/// Everything a renderer needs to rebuild the scene.
#[derive(Serialize)]
pub struct Snapshot<'a> {
    pub config: &'a Config,
    pub grid: &'a TerrainGrid,
    pub placements: &'a [Placement],
}

/// Write `snapshot` to `path` as compact JSON.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot<'_>) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, snapshot)?;
    writer.flush()
}
