//! Buffer view and accessor registry
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use crate::error::{Error, Result};

use super::buffer::{AccessorData, AccessorType, BufferTarget, ComponentType, TypedBuffer};
use super::table::EntityTable;
use super::types::{AccessorBounds, GltfAccessor, GltfBufferView};

/// Element layout and GPU target of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorLayout {
    pub accessor_type: AccessorType,
    pub component_type: ComponentType,
    pub target: Option<BufferTarget>,
}

impl AccessorLayout {
    pub const POSITION: Self = Self::attribute(AccessorType::Vec3);
    pub const NORMAL: Self = Self::attribute(AccessorType::Vec3);
    pub const TEXCOORD: Self = Self::attribute(AccessorType::Vec2);
    pub const COLOR: Self = Self::attribute(AccessorType::Vec3);
    pub const KEY_TIMES: Self = Self::animation(AccessorType::Scalar);

    const fn attribute(accessor_type: AccessorType) -> Self {
        Self {
            accessor_type,
            component_type: ComponentType::Float,
            target: Some(BufferTarget::ArrayBuffer),
        }
    }

    /// Float animation data, no GPU target.
    #[must_use]
    pub const fn animation(accessor_type: AccessorType) -> Self {
        Self {
            accessor_type,
            component_type: ComponentType::Float,
            target: None,
        }
    }

    /// Scalar element indices.
    #[must_use]
    pub const fn indices(wide: bool) -> Self {
        Self {
            accessor_type: AccessorType::Scalar,
            component_type: if wide {
                ComponentType::UnsignedInt
            } else {
                ComponentType::UnsignedShort
            },
            target: Some(BufferTarget::ElementArrayBuffer),
        }
    }
}

/// Owns the buffer views and accessors of an export session.
#[derive(Debug, Clone, Default)]
pub struct AccessorRegistry {
    buffer_views: EntityTable<GltfBufferView>,
    accessors: EntityTable<GltfAccessor>,
}

impl AccessorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` to `buffer`, wrap the new bytes in a view and register
    /// an accessor over it. Returns the accessor index.
    ///
    /// # Errors
    /// Returns [`Error::AccessorArityMismatch`] if the flat data does not
    /// divide into whole elements, or any packing error from the buffer.
    pub fn create_accessor(
        &mut self,
        buffer: &mut TypedBuffer,
        buffer_index: usize,
        data: AccessorData<'_>,
        layout: AccessorLayout,
        name: Option<String>,
    ) -> Result<usize> {
        let arity = layout.accessor_type.arity();
        if data.len() % arity != 0 {
            return Err(Error::AccessorArityMismatch {
                len: data.len(),
                arity,
            });
        }

        let start = buffer.append(data, layout.component_type)?;
        let view = self.buffer_views.push(GltfBufferView {
            buffer: buffer_index,
            byte_offset: start,
            byte_length: buffer.len() - start,
            target: layout.target.map(BufferTarget::code),
        });

        Ok(self.accessors.push(GltfAccessor {
            buffer_view: view,
            byte_offset: 0,
            component_type: layout.component_type.code(),
            count: data.len() / arity,
            accessor_type: layout.accessor_type.as_str().to_string(),
            min: None,
            max: None,
            name,
        }))
    }

    /// Append an image payload and return the index of a view covering it.
    pub fn create_image_view(
        &mut self,
        buffer: &mut TypedBuffer,
        buffer_index: usize,
        bytes: &[u8],
    ) -> usize {
        let (byte_offset, byte_length) = buffer.append_bytes(bytes);
        self.buffer_views.push(GltfBufferView {
            buffer: buffer_index,
            byte_offset,
            byte_length,
            target: None,
        })
    }

    /// Attach `min`/`max` to an accessor.
    pub fn set_bounds(&mut self, accessor: usize, min: AccessorBounds, max: AccessorBounds) {
        if let Some(acc) = self.accessors.get_mut(accessor) {
            acc.min = Some(min);
            acc.max = Some(max);
        }
    }

    pub fn clear(&mut self) {
        self.buffer_views.clear();
        self.accessors.clear();
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<GltfBufferView>, Vec<GltfAccessor>) {
        (self.buffer_views.into_vec(), self.accessors.into_vec())
    }
}
