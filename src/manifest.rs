use serde::Serialize;

use crate::{ArchiveEntry, DecodedEntry, TextureFormat};

/// Summary of an unpacked archive, written next to the exported images.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub archive: String,
    #[serde(rename = "entry")]
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub index: usize,
    pub name: String,
    pub file: String,
    pub format: TextureFormat,
    pub width: u16,
    pub height: u16,
    pub crc32: u32,
}

impl ManifestEntry {
    pub fn new(entry: &ArchiveEntry, decoded: &DecodedEntry, file: String) -> Self {
        Self {
            index: entry.index,
            name: entry.name.to_string(),
            file,
            format: decoded.info.format,
            width: decoded.info.width,
            height: decoded.info.height,
            crc32: decoded.crc32(),
        }
    }
}

impl Manifest {
    pub fn new(archive: impl Into<String>, mut entries: Vec<ManifestEntry>) -> Self {
        entries.sort_by_key(|entry| entry.index);

        Self {
            archive: archive.into(),
            entries,
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
