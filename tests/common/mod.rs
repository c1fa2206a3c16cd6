#![allow(dead_code)]

/// Encode `data` using literals only. Marker bytes inside the data are escaped.
pub fn encode_literals(data: &[u8], marker: u8) -> Vec<u8> {
    let mut out = vec![marker];
    for &byte in data {
        out.push(byte);
        if byte == marker {
            out.push(marker);
        }
    }
    out
}

/// First byte value that does not occur in `data`.
pub fn unused_byte(data: &[u8]) -> Option<u8> {
    (0..=u8::MAX).find(|value| !data.contains(value))
}

/// ETC1 color block in individual mode with the same 4 bit color in both sub-blocks,
/// modifier table 0 and every pixel code 0 (+2).
pub fn solid_color_block(r: u8, g: u8, b: u8) -> [u8; 8] {
    let nibbles = |value: u8| (value << 4) | value;
    [0, 0, 0, 0, 0x00, nibbles(b), nibbles(g), nibbles(r)]
}

/// Build a CTPK texture info record followed by its payload.
pub fn tex_record(format: u32, width: u16, height: u16, payload: &[u8]) -> Vec<u8> {
    let mut record = Vec::new();
    record.extend_from_slice(b"CTPK");
    record.extend_from_slice(&0u32.to_le_bytes());
    record.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    record.extend_from_slice(&36u32.to_le_bytes());
    record.extend_from_slice(&format.to_le_bytes());
    record.extend_from_slice(&width.to_le_bytes());
    record.extend_from_slice(&height.to_le_bytes());
    record.extend_from_slice(&[1, 2]);
    record.extend_from_slice(&0u16.to_le_bytes());
    record.extend_from_slice(&0u32.to_le_bytes());
    record.extend_from_slice(&0x1234_5678u32.to_le_bytes());
    assert_eq!(record.len(), 36);

    record.extend_from_slice(payload);
    record
}

/// Build an archive from already compressed entries.
pub fn archive(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut data = b"AML_Arciver".to_vec();
    data.resize(0x80, 0);
    data.extend_from_slice(&(entries.len() as u32).to_le_bytes());

    for (name, compressed) in entries {
        let mut name_field = name.as_bytes().to_vec();
        name_field.resize(0x40, 0);

        data.extend_from_slice(&name_field);
        data.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
        data.extend_from_slice(compressed);
    }

    data
}
