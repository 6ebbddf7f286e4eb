//! Error types for `Meshwright`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `Meshwright` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Configuration Errors ====================
    /// The output path does not end in `.gltf` or `.glb`.
    #[error("output file must have a .gltf or .glb extension: {path}")]
    InvalidOutputExtension {
        /// The rejected output path.
        path: PathBuf,
    },

    /// Unknown resource format (expected `embedded`, `source` or `bin`).
    #[error("invalid resource format: {0} (expected embedded, source or bin)")]
    InvalidResourceFormat(String),

    /// Unknown animation mode (expected `none` or `keyed`).
    #[error("invalid animation mode: {0} (expected none or keyed)")]
    InvalidAnimationMode(String),

    /// An option string entry carried a value outside its allowed set.
    #[error("option {key} is not valid: {value}")]
    InvalidOptionValue {
        /// The option key, e.g. `vFlip`.
        key: String,
        /// The rejected value.
        value: String,
    },

    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    // ==================== Scene Errors ====================
    /// The scene has no exportable top-level nodes.
    #[error("scene is empty, no file will be exported")]
    EmptyScene,

    /// The scene source returned an id it cannot resolve.
    #[error("unknown {kind} id: {id}")]
    UnknownEntity {
        /// Entity kind (node, mesh, camera, shader).
        kind: &'static str,
        /// The unresolved id.
        id: usize,
    },

    /// Mesh geometry violates the face-vertex stream contract.
    #[error("invalid mesh {mesh}: {message}")]
    InvalidMesh {
        /// The mesh name.
        mesh: String,
        /// Description of what is invalid.
        message: String,
    },

    /// A keyframe track has mismatched times and values.
    #[error("invalid keyframes on {node}.{channel}: {message}")]
    InvalidKeyframes {
        /// The animated node name.
        node: String,
        /// The channel path (translation, rotation, scale).
        channel: &'static str,
        /// Description of what is invalid.
        message: String,
    },

    /// A node is its own ancestor.
    #[error("node {node} is part of a hierarchy cycle")]
    HierarchyCycle {
        /// The node name.
        node: String,
    },

    /// The export session was used out of order.
    #[error("export session is {state}, expected {expected}")]
    InvalidExportState {
        /// The current session state.
        state: &'static str,
        /// The state the operation needs.
        expected: &'static str,
    },

    /// Failed to load or parse a scene description file.
    #[error("failed to load scene description {path}: {message}")]
    SceneDescriptionFailed {
        /// The description file path.
        path: PathBuf,
        /// The parse error message.
        message: String,
    },

    // ==================== Packing Errors ====================
    /// A value does not fit the accessor component type.
    #[error("value {value} does not fit component type {component}")]
    ComponentOutOfRange {
        /// The offending value.
        value: u64,
        /// The component type name.
        component: &'static str,
    },

    /// Flat data length is not a multiple of the accessor type arity.
    #[error("accessor data of {len} components is not a multiple of {arity}")]
    AccessorArityMismatch {
        /// Number of flat components supplied.
        len: usize,
        /// Components per element.
        arity: usize,
    },

    /// Float data was supplied for an integer component type, or vice versa.
    #[error("accessor data does not match component type {component}")]
    ComponentKindMismatch {
        /// The requested component type name.
        component: &'static str,
    },

    /// The GLB container would exceed the 32-bit length field.
    #[error("GLB output too large: {size} bytes")]
    GlbTooLarge {
        /// The computed container size.
        size: usize,
    },

    // ==================== Texture Errors ====================
    /// Metallic and roughness maps must share dimensions to be packed.
    #[error(
        "error processing material {material}: metallic map ({metallic_width}x{metallic_height}) and roughness map ({roughness_width}x{roughness_height}) must have same dimensions"
    )]
    TextureDimensionMismatch {
        /// The material being processed.
        material: String,
        /// Metallic map width.
        metallic_width: u32,
        /// Metallic map height.
        metallic_height: u32,
        /// Roughness map width.
        roughness_width: u32,
        /// Roughness map height.
        roughness_height: u32,
    },

    /// Failed to decode or encode a texture image.
    #[error("image processing failed for {path}: {message}")]
    ImageProcessingFailed {
        /// The image path.
        path: PathBuf,
        /// The underlying error message.
        message: String,
    },

    // ==================== Serialization Errors ====================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io(err.error)
    }
}

/// A specialized Result type for `Meshwright` operations.
pub type Result<T> = std::result::Result<T, Error>;
