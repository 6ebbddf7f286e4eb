//! Face-vertex deduplication
//!
//! Hosts report geometry per triangle corner. glTF wants one indexed vertex
//! array, so equal attribute tuples have to collapse onto a single entry.
//! Each source vertex owns a primary slot; a corner that disagrees with the
//! tuple already in its slot (UV seam, hard edge) is matched against the
//! earlier splits of that slot, and only gets a fresh entry appended after
//! all primary slots when none of them match.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::scene::{FaceVertex, MeshSource};

/// Index count at or above which `UNSIGNED_INT` indices are needed.
const U16_INDEX_LIMIT: usize = 0xFFFF;

/// The full attribute tuple of one emitted vertex. Compared exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexKey {
    pub position: [f64; 3],
    pub normal: [f64; 3],
    pub uv: [f64; 2],
    pub color: Option<[f64; 3]>,
}

/// Indexed geometry of one mesh, ready for packing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<[f64; 3]>,
    pub normals: Vec<[f64; 3]>,
    pub uvs: Vec<[f64; 2]>,
    /// Present only for meshes with a color set.
    pub colors: Option<Vec<[f64; 3]>>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    /// Number of unique vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether the index accessor needs `UNSIGNED_INT` components.
    #[must_use]
    pub fn use_32bit_indices(&self) -> bool {
        self.positions.len() >= U16_INDEX_LIMIT
    }

    fn push(&mut self, key: &VertexKey) {
        self.positions.push(key.position);
        self.normals.push(key.normal);
        self.uvs.push(key.uv);
        if let (Some(colors), Some(color)) = (self.colors.as_mut(), key.color) {
            colors.push(color);
        }
    }
}

/// Flip a V coordinate into OpenGL texture space, staying inside its UDIM tile.
#[must_use]
pub fn flip_v_coordinate(v: f64) -> f64 {
    let tile = v.floor();
    tile + 1.0 - (v - tile)
}

/// Collapse a mesh's face-vertex stream into indexed geometry.
///
/// # Errors
/// Returns [`Error::InvalidMesh`] if a corner references a source vertex
/// outside the declared vertex count, or if a colored mesh has a corner
/// without a color.
pub fn deduplicate(mesh: &MeshSource, flip_v: bool) -> Result<MeshGeometry> {
    let slot_count = mesh.vertex_count;
    let mut slots: Vec<Option<VertexKey>> = vec![None; slot_count];
    let mut appended: Vec<VertexKey> = Vec::new();
    // slot -> positions in `appended` split off from it
    let mut splits: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut raw_indices: Vec<usize> = Vec::with_capacity(mesh.triangles.len() * 3);

    for corner in mesh.triangles.iter().flatten() {
        let key = vertex_key(mesh, corner, flip_v)?;
        let slot = corner.vertex as usize;
        let Some(entry) = slots.get_mut(slot) else {
            return Err(Error::InvalidMesh {
                mesh: mesh.name.clone(),
                message: format!(
                    "face vertex references vertex {slot} but the mesh has {slot_count}"
                ),
            });
        };

        match *entry {
            None => {
                *entry = Some(key);
                raw_indices.push(slot);
            }
            Some(existing) if existing == key => raw_indices.push(slot),
            Some(_) => {
                let slot_splits = splits.entry(slot).or_default();
                let split = match slot_splits.iter().copied().find(|&i| appended[i] == key) {
                    Some(i) => i,
                    None => {
                        appended.push(key);
                        slot_splits.push(appended.len() - 1);
                        appended.len() - 1
                    }
                };
                raw_indices.push(slot_count + split);
            }
        }
    }

    // Unvisited primary slots are dropped and the survivors renumbered.
    let mut geometry = MeshGeometry {
        colors: mesh.has_colors.then(Vec::new),
        ..MeshGeometry::default()
    };
    let mut remap = vec![0u32; slot_count + appended.len()];
    let entries = slots
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.as_ref().map(|key| (i, key)))
        .chain(appended.iter().enumerate().map(|(i, key)| (slot_count + i, key)));

    for (raw, key) in entries {
        remap[raw] = u32::try_from(geometry.positions.len()).map_err(|_| Error::InvalidMesh {
            mesh: mesh.name.clone(),
            message: "too many vertices for 32-bit indices".to_string(),
        })?;
        geometry.push(key);
    }

    geometry.indices = raw_indices.into_iter().map(|raw| remap[raw]).collect();

    tracing::debug!(
        "Deduplicated mesh {}: {} corners -> {} vertices ({} split)",
        mesh.name,
        geometry.indices.len(),
        geometry.vertex_count(),
        appended.len()
    );

    Ok(geometry)
}

fn vertex_key(mesh: &MeshSource, corner: &FaceVertex, flip_v: bool) -> Result<VertexKey> {
    let [u, v] = corner.uv;
    let uv = if flip_v { [u, flip_v_coordinate(v)] } else { [u, v] };

    let color = if mesh.has_colors {
        Some(corner.color.ok_or_else(|| Error::InvalidMesh {
            mesh: mesh.name.clone(),
            message: format!("vertex {} has no color but the mesh has a color set", corner.vertex),
        })?)
    } else {
        None
    };

    Ok(VertexKey {
        position: corner.position,
        normal: corner.normal,
        uv,
        color,
    })
}
