mod archive;
pub use archive::{
    Archive, ArchiveEntry, ArchiveError, DecodedEntry, EntryError, TexInfo, TexInfoError,
    TextureFormat, MAGIC, TEX_INFO_SIZE,
};

mod compression;
pub use compression::{decompress, DecompressError, Decompressor, Operation};

mod manifest;
pub use manifest::{Manifest, ManifestEntry};

pub mod texture;
pub use texture::{decode_image, decode_texture, TextureError};
