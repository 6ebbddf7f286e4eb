//! GLB container writer.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Layout: 12-byte header (`glTF`, version 2, total length), a JSON chunk
//! padded with spaces, and an optional BIN chunk padded with zeros. Every
//! chunk length is a multiple of 4.

use std::collections::BTreeMap;

use byteorder::{LittleEndian, WriteBytesExt};
use serde_json::Value;

use crate::error::{Error, Result};

use super::buffer::BUFFER_ALIGNMENT;
use super::types::GltfDocument;

/// `glTF` in little-endian.
pub const GLB_MAGIC: u32 = 0x46546C67;
pub const GLB_VERSION: u32 = 2;
/// `JSON`
pub const CHUNK_JSON: u32 = 0x4E4F534A;
/// `BIN\0`
pub const CHUNK_BIN: u32 = 0x004E4942;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Serialize `document` and `bin` into a GLB container. The JSON chunk has
/// its object keys sorted; the BIN chunk is omitted when `bin` is empty.
///
/// # Errors
/// Returns [`Error::GlbTooLarge`] if the container exceeds `u32::MAX` bytes,
/// or a JSON error if the document cannot be serialized.
pub fn write_glb(document: &GltfDocument, bin: Option<&[u8]>) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(&sort_keys(serde_json::to_value(document)?))?;
    let bin = bin.filter(|b| !b.is_empty());

    let json_len = padded(json.len());
    let bin_len = bin.map_or(0, |b| padded(b.len()));
    let total = HEADER_LEN
        + CHUNK_HEADER_LEN
        + json_len
        + bin.map_or(0, |_| CHUNK_HEADER_LEN + bin_len);
    let total_u32 = u32::try_from(total).map_err(|_| Error::GlbTooLarge { size: total })?;

    let mut out = Vec::with_capacity(total);
    out.write_u32::<LittleEndian>(GLB_MAGIC)?;
    out.write_u32::<LittleEndian>(GLB_VERSION)?;
    out.write_u32::<LittleEndian>(total_u32)?;

    out.write_u32::<LittleEndian>(json_len as u32)?;
    out.write_u32::<LittleEndian>(CHUNK_JSON)?;
    out.extend_from_slice(&json);
    out.resize(out.len() + (json_len - json.len()), b' ');

    if let Some(bin) = bin {
        out.write_u32::<LittleEndian>(bin_len as u32)?;
        out.write_u32::<LittleEndian>(CHUNK_BIN)?;
        out.extend_from_slice(bin);
        out.resize(out.len() + (bin_len - bin.len()), 0);
    }

    tracing::debug!("GLB: {} bytes (json {}, bin {})", total, json_len, bin_len);
    Ok(out)
}

/// Rebuild every object in `value` with its keys in lexicographic order.
#[must_use]
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn padded(len: usize) -> usize {
    len.next_multiple_of(BUFFER_ALIGNMENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::gltf::types::{GltfAsset, GltfBuffer, GltfScene};
    use byteorder::ReadBytesExt;
    use std::io::Cursor;

    fn document(byte_length: usize) -> GltfDocument {
        GltfDocument {
            asset: GltfAsset {
                version: "2.0".to_string(),
                generator: Some("test".to_string()),
            },
            scene: 0,
            scenes: vec![GltfScene {
                name: Some("defaultScene".to_string()),
                nodes: vec![],
            }],
            nodes: vec![],
            meshes: vec![],
            cameras: vec![],
            materials: vec![],
            textures: vec![],
            images: vec![],
            animations: vec![],
            accessors: vec![],
            buffer_views: vec![],
            buffers: vec![GltfBuffer {
                byte_length,
                uri: None,
                name: Some("primary_buffer".to_string()),
            }],
        }
    }

    #[test]
    fn test_glb_header_and_chunks() {
        let glb = write_glb(&document(5), Some(&[1, 2, 3, 4, 5])).unwrap();
        let mut cursor = Cursor::new(&glb);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), GLB_MAGIC);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 2);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap() as usize, glb.len());

        let json_len = cursor.read_u32::<LittleEndian>().unwrap() as usize;
        assert_eq!(json_len % 4, 0);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), CHUNK_JSON);
        let json = &glb[20..20 + json_len];
        let value: Value = serde_json::from_slice(json).unwrap();
        assert_eq!(value["buffers"][0]["byteLength"], 5);

        let bin_header = 20 + json_len;
        let bin_len = u32::from_le_bytes(glb[bin_header..bin_header + 4].try_into().unwrap());
        assert_eq!(bin_len, 8);
        assert_eq!(&glb[bin_header + 4..bin_header + 8], b"BIN\0");
        assert_eq!(&glb[bin_header + 8..], &[1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn test_glb_without_bin() {
        let glb = write_glb(&document(0), None).unwrap();
        let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
        assert_eq!(glb.len(), 20 + json_len);
        assert_eq!(&glb[0..4], b"glTF");
    }

    #[test]
    fn test_sort_keys_recursive() {
        let value = serde_json::json!({"b": {"z": 1, "a": 2}, "a": [{"y": 0, "x": 1}]});
        let sorted = serde_json::to_string(&sort_keys(value)).unwrap();
        assert_eq!(sorted, r#"{"a":[{"x":1,"y":0}],"b":{"a":2,"z":1}}"#);
    }
}
