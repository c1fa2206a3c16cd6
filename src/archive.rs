use image::RgbaImage;
use std::{fs, ops::Range, path::Path};
use thiserror::Error;

use crate::{compression, texture, DecompressError, TextureError};

mod tex_info;
pub use tex_info::{TexInfo, TexInfoError, TextureFormat, TEX_INFO_SIZE};

pub const MAGIC: &[u8; 11] = b"AML_Arciver";

const ENTRY_COUNT_OFFSET: usize = 0x80;
const ENTRIES_OFFSET: usize = ENTRY_COUNT_OFFSET + 4;
const NAME_SIZE: usize = 0x40;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to read archive file")]
    Read(#[from] std::io::Error),
    #[error("Not an AML_Arciver archive")]
    InvalidMagic,
    #[error("Archive ends at {len:#x} but {what} needs bytes up to {end:#x}")]
    Truncated {
        what: String,
        end: usize,
        len: usize,
    },
}

#[derive(Error, Debug)]
pub enum EntryError {
    #[error("Failed to decompress entry")]
    Decompress(#[from] DecompressError),
    #[error("Failed to read texture info")]
    TexInfo(#[from] TexInfoError),
    #[error("Failed to decode texture")]
    Texture(#[from] TextureError),
}

#[derive(Debug, Clone)]
struct EntryHeader {
    name: String,
    data: Range<usize>,
}

/// An `AML_Arciver` archive, fully loaded into memory.
#[derive(Debug, Clone)]
pub struct Archive {
    data: Vec<u8>,
    headers: Vec<EntryHeader>,
}

#[derive(Debug, Clone, Copy)]
pub struct ArchiveEntry<'a> {
    pub index: usize,
    pub name: &'a str,
    /// compressed entry data
    pub data: &'a [u8],
}

#[derive(Debug, Clone)]
pub struct DecodedEntry {
    pub info: TexInfo,
    pub image: RgbaImage,
}

impl Archive {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let data = fs::read(path.as_ref())?;
        Self::from_vec(data)
    }

    pub fn from_vec(data: Vec<u8>) -> Result<Self, ArchiveError> {
        if !data.starts_with(MAGIC) {
            return Err(ArchiveError::InvalidMagic);
        }

        let count = read_u32(&data, ENTRY_COUNT_OFFSET, "entry count")? as usize;
        log::debug!("Archive holds {} entries", count);

        let mut headers = Vec::new();
        let mut offset = ENTRIES_OFFSET;
        for index in 0..count {
            let name = slice(&data, offset, NAME_SIZE, || format!("name of entry {}", index))?;
            let name = c_string(name);
            offset += NAME_SIZE;

            let size = read_u32(&data, offset, "entry size")? as usize;
            offset += 4;

            slice(&data, offset, size, || format!("data of entry '{}'", name))?;
            headers.push(EntryHeader {
                name,
                data: offset..offset + size,
            });
            offset += size;
        }

        Ok(Self { data, headers })
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ArchiveEntry<'_>> {
        self.headers.get(index).map(|header| ArchiveEntry {
            index,
            name: &header.name,
            data: &self.data[header.data.clone()],
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = ArchiveEntry<'_>> {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}

impl ArchiveEntry<'_> {
    /// Name usable as a single file name, with path separators flattened.
    pub fn file_stem(&self) -> String {
        self.name.replace('/', "_")
    }

    /// Decompress the entry and return the raw texture info record.
    pub fn decompress(&self) -> Result<Vec<u8>, DecompressError> {
        compression::decompress(self.data)
    }

    pub fn tex_info(&self) -> Result<TexInfo, EntryError> {
        let record = self.decompress()?;
        let (info, _) = TexInfo::parse(&record)?;
        Ok(info)
    }

    pub fn decode(&self) -> Result<DecodedEntry, EntryError> {
        let record = self.decompress()?;
        let (info, payload) = TexInfo::parse(&record)?;

        log::debug!(
            "Decoding '{}': {:?} {}x{}",
            self.name,
            info.format,
            info.width,
            info.height
        );

        let image = texture::decode_image(
            payload,
            info.width.into(),
            info.height.into(),
            info.format.has_alpha(),
        )?;

        Ok(DecodedEntry { info, image })
    }
}

impl DecodedEntry {
    /// Checksum of the decoded RGBA8 pixels.
    pub fn crc32(&self) -> u32 {
        crc32fast::hash(self.image.as_raw())
    }
}

fn slice<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    what: impl FnOnce() -> String,
) -> Result<&'a [u8], ArchiveError> {
    let end = offset + len;
    data.get(offset..end).ok_or_else(|| ArchiveError::Truncated {
        what: what(),
        end,
        len: data.len(),
    })
}

fn read_u32(data: &[u8], offset: usize, what: &str) -> Result<u32, ArchiveError> {
    let bytes = slice(data, offset, 4, || what.to_string())?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Latin-1 string up to the first NUL.
fn c_string(data: &[u8]) -> String {
    data.iter()
        .take_while(|&&byte| byte != 0)
        .map(|&byte| byte as char)
        .collect()
}
