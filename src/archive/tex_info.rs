use serde::Serialize;
use thiserror::Error;

/// Size of the texture info record that precedes the texture data.
pub const TEX_INFO_SIZE: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextureFormat {
    Etc1,
    Etc1A4,
}

impl TextureFormat {
    pub const fn from_raw(value: u32) -> Option<Self> {
        match value {
            0x0c => Some(Self::Etc1),
            0x0d => Some(Self::Etc1A4),
            _ => None,
        }
    }

    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::Etc1A4)
    }
}

/// CTPK texture info entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexInfo {
    pub magic: u32,
    pub file_path_offset: u32,
    pub data_size: u32,
    pub data_offset: u32,
    pub format: TextureFormat,
    pub width: u16,
    pub height: u16,
    pub mip_level: u8,
    pub kind: u8,
    pub cube_map: u16,
    pub bitmap_size_offset: u32,
    pub timestamp: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TexInfoError {
    #[error("Texture info record needs 36 bytes but only {0} are present")]
    TruncatedHeader(usize),
    #[error("Texture info declares {declared} bytes of texture data but only {available} follow")]
    TruncatedData { declared: usize, available: usize },
    #[error("Unsupported texture format {0:#x}")]
    UnsupportedFormat(u32),
}

impl TexInfo {
    /// Parse the record at the start of a decompressed entry, returning it together
    /// with the texture data that follows.
    pub fn parse(record: &[u8]) -> Result<(Self, &[u8]), TexInfoError> {
        if record.len() < TEX_INFO_SIZE {
            return Err(TexInfoError::TruncatedHeader(record.len()));
        }

        let u32_at = |offset: usize| {
            u32::from_le_bytes([
                record[offset],
                record[offset + 1],
                record[offset + 2],
                record[offset + 3],
            ])
        };
        let u16_at = |offset: usize| u16::from_le_bytes([record[offset], record[offset + 1]]);

        let raw_format = u32_at(16);
        let format = TextureFormat::from_raw(raw_format)
            .ok_or(TexInfoError::UnsupportedFormat(raw_format))?;

        let info = Self {
            magic: u32_at(0),
            file_path_offset: u32_at(4),
            data_size: u32_at(8),
            data_offset: u32_at(12),
            format,
            width: u16_at(20),
            height: u16_at(22),
            mip_level: record[24],
            kind: record[25],
            cube_map: u16_at(26),
            bitmap_size_offset: u32_at(28),
            timestamp: u32_at(32),
        };

        let data = &record[TEX_INFO_SIZE..];
        let declared = info.data_size as usize;
        if data.len() < declared {
            return Err(TexInfoError::TruncatedData {
                declared,
                available: data.len(),
            });
        }

        if data.len() > declared {
            log::warn!(
                "Texture info declares {} bytes of data but {} follow, ignoring the rest",
                declared,
                data.len()
            );
        }

        Ok((info, &data[..declared]))
    }
}
