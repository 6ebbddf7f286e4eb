//! Mesh methods for `GltfBuilder`

use std::collections::BTreeMap;

use crate::error::Result;
use crate::exporter::dedup::{MeshGeometry, deduplicate};
use crate::scene::{BoundingBox, MeshId, SceneSource};

use super::super::accessors::AccessorLayout;
use super::super::buffer::AccessorData;
use super::super::types::{AccessorBounds, GltfMesh, GltfPrimitive, PRIMITIVE_MODE_TRIANGLES};
use super::GltfBuilder;

impl GltfBuilder {
    /// Pack a host mesh and return its index, or `None` if it has no
    /// triangles. A mesh shared by several nodes is packed once.
    pub(crate) fn add_mesh<S: SceneSource + ?Sized>(
        &mut self,
        source: &S,
        id: MeshId,
    ) -> Result<Option<usize>> {
        if let Some(&index) = self.mesh_indices.get(&id) {
            return Ok(index);
        }

        let mesh = source.mesh(id)?;
        if mesh.triangles.is_empty() {
            tracing::warn!("Mesh {} has no triangles, skipping", mesh.name);
            self.mesh_indices.insert(id, None);
            return Ok(None);
        }

        let geometry = deduplicate(&mesh, self.options.flip_v)?;
        let (indices, attributes) = self.add_geometry(&mesh.name, &geometry, &mesh.bounds)?;
        let material = self.material_for_shader(source, mesh.shader)?;

        let index = self.meshes.push(GltfMesh {
            name: Some(mesh.name.clone()),
            primitives: vec![GltfPrimitive {
                attributes,
                indices: Some(indices),
                material: Some(material),
                mode: PRIMITIVE_MODE_TRIANGLES,
            }],
        });
        self.mesh_indices.insert(id, Some(index));
        Ok(Some(index))
    }

    /// Pack indices and vertex attributes, in that order. Returns the index
    /// accessor and the attribute accessors by semantic.
    fn add_geometry(
        &mut self,
        name: &str,
        geometry: &MeshGeometry,
        bounds: &BoundingBox,
    ) -> Result<(usize, BTreeMap<String, usize>)> {
        let mut attributes = BTreeMap::new();

        let vertex_count = geometry.vertex_count() as u64;
        let indices = self.create_accessor(
            AccessorData::Unsigned(&geometry.indices),
            AccessorLayout::indices(geometry.use_32bit_indices()),
            format!("{name}_idx"),
        )?;
        self.registry.set_bounds(
            indices,
            AccessorBounds::Integer(vec![0]),
            AccessorBounds::Integer(vec![vertex_count.saturating_sub(1)]),
        );

        let position = self.create_accessor(
            AccessorData::Float(geometry.positions.as_flattened()),
            AccessorLayout::POSITION,
            format!("{name}_pos"),
        )?;
        self.registry.set_bounds(
            position,
            AccessorBounds::Float(narrow(&bounds.min)),
            AccessorBounds::Float(narrow(&bounds.max)),
        );
        attributes.insert("POSITION".to_string(), position);

        let normal = self.create_accessor(
            AccessorData::Float(geometry.normals.as_flattened()),
            AccessorLayout::NORMAL,
            format!("{name}_norm"),
        )?;
        attributes.insert("NORMAL".to_string(), normal);

        let texcoord = self.create_accessor(
            AccessorData::Float(geometry.uvs.as_flattened()),
            AccessorLayout::TEXCOORD,
            format!("{name}_uv"),
        )?;
        attributes.insert("TEXCOORD_0".to_string(), texcoord);

        if let Some(colors) = &geometry.colors {
            let color = self.create_accessor(
                AccessorData::Float(colors.as_flattened()),
                AccessorLayout::COLOR,
                format!("{name}_color"),
            )?;
            attributes.insert("COLOR_0".to_string(), color);
        }

        Ok((indices, attributes))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(values: &[f64; 3]) -> Vec<f32> {
    values.iter().map(|&v| v as f32).collect()
}
