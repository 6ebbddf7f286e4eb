//! Typed binary buffer
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};

/// Every append leaves the buffer length on this boundary.
pub const BUFFER_ALIGNMENT: usize = 4;

/// Accessor component type (glTF `componentType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    /// glTF enum value.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::UnsignedShort => 5123,
            Self::UnsignedInt => 5125,
            Self::Float => 5126,
        }
    }

    /// Size of one component in bytes.
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsignedShort => "UNSIGNED_SHORT",
            Self::UnsignedInt => "UNSIGNED_INT",
            Self::Float => "FLOAT",
        }
    }
}

/// Accessor element type (glTF `type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
}

impl AccessorType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
        }
    }

    /// Components per element.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
        }
    }
}

/// GPU binding hint of a buffer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Vertex attributes.
    ArrayBuffer,
    /// Indices.
    ElementArrayBuffer,
}

impl BufferTarget {
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::ArrayBuffer => 34962,
            Self::ElementArrayBuffer => 34963,
        }
    }
}

/// Flat component data for one accessor.
#[derive(Debug, Clone, Copy)]
pub enum AccessorData<'a> {
    /// Narrowed to `f32` when written.
    Float(&'a [f64]),
    Unsigned(&'a [u32]),
}

impl AccessorData<'_> {
    /// Number of flat components.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(values) => values.len(),
            Self::Unsigned(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append-only little-endian byte buffer backing buffer views.
#[derive(Debug, Clone, Default)]
pub struct TypedBuffer {
    name: String,
    data: Vec<u8>,
}

impl TypedBuffer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Encode `data` as `component` values, then pad to [`BUFFER_ALIGNMENT`].
    /// Returns the length before the append, i.e. the data's byte offset.
    ///
    /// # Errors
    /// Returns [`Error::ComponentOutOfRange`] if an index does not fit
    /// `UNSIGNED_SHORT`, or [`Error::ComponentKindMismatch`] when float data
    /// is paired with an integer component type (or the reverse).
    pub fn append(&mut self, data: AccessorData<'_>, component: ComponentType) -> Result<usize> {
        let offset = self.data.len();
        if let Err(e) = self.write_components(data, component) {
            self.data.truncate(offset);
            return Err(e);
        }
        self.align();
        Ok(offset)
    }

    /// Append raw bytes (image payloads), then pad.
    /// Returns `(offset, length)` of the unpadded payload.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> (usize, usize) {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        self.align();
        (offset, bytes.len())
    }

    fn write_components(&mut self, data: AccessorData<'_>, component: ComponentType) -> Result<()> {
        self.data.reserve(data.len() * component.size());

        match (data, component) {
            (AccessorData::Float(values), ComponentType::Float) => {
                for &v in values {
                    #[allow(clippy::cast_possible_truncation)]
                    self.data.write_f32::<LittleEndian>(v as f32)?;
                }
            }
            (AccessorData::Unsigned(values), ComponentType::UnsignedShort) => {
                for &v in values {
                    let narrowed = u16::try_from(v).map_err(|_| Error::ComponentOutOfRange {
                        value: u64::from(v),
                        component: component.as_str(),
                    })?;
                    self.data.write_u16::<LittleEndian>(narrowed)?;
                }
            }
            (AccessorData::Unsigned(values), ComponentType::UnsignedInt) => {
                for &v in values {
                    self.data.write_u32::<LittleEndian>(v)?;
                }
            }
            _ => {
                return Err(Error::ComponentKindMismatch {
                    component: component.as_str(),
                });
            }
        }
        Ok(())
    }

    fn align(&mut self) {
        let padding = (BUFFER_ALIGNMENT - (self.data.len() % BUFFER_ALIGNMENT)) % BUFFER_ALIGNMENT;
        self.data.extend(std::iter::repeat_n(0u8, padding));
    }
}
