use amlunpack::{
    Archive, ArchiveError, EntryError, Manifest, ManifestEntry, TexInfo, TexInfoError,
    TextureError, TextureFormat,
};

mod common;

fn etc1_entry(width: u16, height: u16) -> Vec<u8> {
    let blocks = (width as usize / 4) * (height as usize / 4);
    let payload = (0..blocks)
        .flat_map(|index| common::solid_color_block(index as u8 % 16, 3, 5))
        .collect::<Vec<_>>();

    common::tex_record(0x0c, width, height, &payload)
}

#[test]
fn test_parse_tex_info() -> anyhow::Result<()> {
    let record = common::tex_record(0x0d, 64, 32, &[7; 64 * 32]);
    let (info, payload) = TexInfo::parse(&record)?;

    assert_eq!(info.format, TextureFormat::Etc1A4);
    assert!(info.format.has_alpha());
    assert_eq!((info.width, info.height), (64, 32));
    assert_eq!(info.data_size, 64 * 32);
    assert_eq!((info.mip_level, info.kind), (1, 2));
    assert_eq!(info.timestamp, 0x1234_5678);
    assert_eq!(payload.len(), 64 * 32);

    Ok(())
}

#[test]
fn test_tex_info_errors() {
    assert_eq!(
        TexInfo::parse(&[0; 20]),
        Err(TexInfoError::TruncatedHeader(20))
    );

    assert_eq!(
        TexInfo::parse(&common::tex_record(0x0b, 4, 4, &[0; 8])),
        Err(TexInfoError::UnsupportedFormat(0x0b))
    );

    let mut record = common::tex_record(0x0c, 4, 4, &[0; 8]);
    record.truncate(40);
    assert_eq!(
        TexInfo::parse(&record),
        Err(TexInfoError::TruncatedData {
            declared: 8,
            available: 4
        })
    );
}

#[test]
fn test_tex_info_ignores_extra_data() -> anyhow::Result<()> {
    let mut record = common::tex_record(0x0c, 4, 4, &[1; 8]);
    record.extend_from_slice(&[2; 4]);

    let (_, payload) = TexInfo::parse(&record)?;
    assert_eq!(payload, [1; 8]);

    Ok(())
}

#[test]
fn test_read_archive() -> anyhow::Result<()> {
    let first = etc1_entry(8, 8);
    let second = etc1_entry(16, 4);

    let data = common::archive(&[
        ("ui/title", common::encode_literals(&first, 0xab)),
        ("font", common::encode_literals(&second, 0x00)),
    ]);
    let archive = Archive::from_vec(data)?;

    assert_eq!(archive.len(), 2);
    let names = archive.entries().map(|entry| entry.name).collect::<Vec<_>>();
    assert_eq!(names, ["ui/title", "font"]);

    let entry = archive.get(0).expect("first entry exists");
    assert_eq!(entry.file_stem(), "ui_title");
    assert_eq!(entry.decompress()?, first);

    let decoded = entry.decode()?;
    assert_eq!(decoded.info.format, TextureFormat::Etc1);
    assert_eq!(decoded.image.dimensions(), (8, 8));
    // 8x8 tiles are stored in natural order
    assert_eq!(
        decoded.image.get_pixel(5, 1).0,
        [17 + 2, 3 * 17 + 2, 5 * 17 + 2, 255]
    );

    let decoded = archive.get(1).expect("second entry exists").decode()?;
    assert_eq!(decoded.image.dimensions(), (16, 4));

    assert!(archive.get(2).is_none());

    Ok(())
}

#[test]
fn test_archive_errors() {
    assert!(matches!(
        Archive::from_vec(b"NOT_Arciver".to_vec()),
        Err(ArchiveError::InvalidMagic)
    ));

    // magic but no entry count
    assert!(matches!(
        Archive::from_vec(b"AML_Arciver".to_vec()),
        Err(ArchiveError::Truncated { .. })
    ));

    let mut data = common::archive(&[("entry", vec![0; 16])]);
    data.truncate(data.len() - 1);
    assert!(matches!(
        Archive::from_vec(data),
        Err(ArchiveError::Truncated { end, len, .. }) if end == len + 1
    ));

    assert!(matches!(
        Archive::open("does/not/exist.arc"),
        Err(ArchiveError::Read(_))
    ));
}

#[test]
fn test_entry_errors_are_per_entry() -> anyhow::Result<()> {
    let bad_texture = common::tex_record(0x0c, 6, 4, &[0; 8]);

    let data = common::archive(&[
        ("empty", Vec::new()),
        ("bad", common::encode_literals(&bad_texture, 0xff)),
        ("good", common::encode_literals(&etc1_entry(4, 4), 0xff)),
    ]);
    let archive = Archive::from_vec(data)?;

    let results = archive
        .entries()
        .map(|entry| entry.decode())
        .collect::<Vec<_>>();

    assert!(matches!(results[0], Err(EntryError::Decompress(_))));
    assert!(matches!(
        results[1],
        Err(EntryError::Texture(TextureError::InvalidDimensions {
            width: 6,
            height: 4
        }))
    ));
    assert!(results[2].is_ok());

    Ok(())
}

#[test]
fn test_manifest() -> anyhow::Result<()> {
    let data = common::archive(&[
        ("b", common::encode_literals(&etc1_entry(4, 4), 0xee)),
        ("a", common::encode_literals(&etc1_entry(8, 4), 0xee)),
    ]);
    let archive = Archive::from_vec(data)?;

    let mut entries = Vec::new();
    for entry in archive.entries().collect::<Vec<_>>().into_iter().rev() {
        let decoded = entry.decode()?;
        entries.push(ManifestEntry::new(
            &entry,
            &decoded,
            format!("{}.png", entry.file_stem()),
        ));
    }

    let manifest = Manifest::new("test.arc", entries);
    assert_eq!(manifest.entries[0].name, "b");
    assert_eq!(manifest.entries[1].width, 8);

    let first = archive.get(0).expect("first entry exists").decode()?;
    let expected_crc = crc32fast::hash(first.image.as_raw());
    assert_eq!(manifest.entries[0].crc32, expected_crc);

    let text = manifest.to_toml()?;
    assert!(text.contains("archive = \"test.arc\""));
    assert!(text.contains("[[entry]]"));
    assert!(text.contains("file = \"a.png\""));
    assert!(text.contains("format = \"Etc1\""));

    Ok(())
}
