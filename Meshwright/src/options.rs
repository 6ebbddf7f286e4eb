//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Export configuration
//!
//! Recognized options:
//! - output path (required, `.gltf` or `.glb`)
//! - resource format: `embedded`, `source` or `bin`
//! - animation mode: `none` or `keyed`
//! - UV V-flip
//!
//! Options can also be read from a host translator option string such as
//! `resFormat=embedded;anim=keyed;vFlip=1;`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Container the document is written as, derived from the output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `.gltf` JSON text, with resources per [`ResourceFormat`].
    Gltf,
    /// `.glb` single-file binary container.
    Glb,
}

impl OutputFormat {
    /// Determine the output format from a file path.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOutputExtension`] for anything other than
    /// `.gltf` or `.glb`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("gltf") => Ok(Self::Gltf),
            Some("glb") => Ok(Self::Glb),
            _ => Err(Error::InvalidOutputExtension {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// How binary resources (buffer and images) are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceFormat {
    /// Base64 data URIs inside the `.gltf` document.
    Embedded,
    /// Images copied next to the output and referenced by file name.
    Source,
    /// A sibling `<basename>.bin` holding the packed buffer.
    #[default]
    Bin,
}

impl ResourceFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Source => "source",
            Self::Bin => "bin",
        }
    }
}

impl FromStr for ResourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "embedded" => Ok(Self::Embedded),
            "source" => Ok(Self::Source),
            "bin" => Ok(Self::Bin),
            other => Err(Error::InvalidResourceFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ResourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether keyframed transform channels are exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationMode {
    /// No animation is written.
    None,
    /// Keyed translation/rotation/scale channels become one animation.
    #[default]
    Keyed,
}

impl AnimationMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Keyed => "keyed",
        }
    }
}

impl FromStr for AnimationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "keyed" => Ok(Self::Keyed),
            other => Err(Error::InvalidAnimationMode(other.to_string())),
        }
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single export invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Destination `.gltf` or `.glb` path.
    pub output: PathBuf,
    /// Where buffer and image bytes end up.
    pub resource_format: ResourceFormat,
    /// Animation export mode.
    pub animation: AnimationMode,
    /// Flip the V texture coordinate for OpenGL-style UV space.
    pub flip_v: bool,
    /// Pretty-print `.gltf` JSON (GLB JSON is always compact).
    pub pretty: bool,
}

impl ExportOptions {
    /// Options with defaults: `bin` resources, `keyed` animation, V-flip on.
    #[must_use]
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            resource_format: ResourceFormat::default(),
            animation: AnimationMode::default(),
            flip_v: true,
            pretty: false,
        }
    }

    #[must_use]
    pub fn with_resource_format(mut self, format: ResourceFormat) -> Self {
        self.resource_format = format;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: AnimationMode) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn with_flip_v(mut self, flip_v: bool) -> Self {
        self.flip_v = flip_v;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Validate the options and return the output format.
    ///
    /// # Errors
    /// Returns a configuration error if the output path is unusable.
    pub fn validate(&self) -> Result<OutputFormat> {
        let format = OutputFormat::from_path(&self.output)?;
        self.output_basename()?;
        Ok(format)
    }

    /// Directory the output (and any side files) are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        match self.output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Output file name without its extension.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the path has no UTF-8 file stem.
    pub fn output_basename(&self) -> Result<&str> {
        self.output
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidPath(self.output.display().to_string()))
    }

    /// File name of the sibling binary buffer (`<basename>.bin`).
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the output has no file stem.
    pub fn bin_file_name(&self) -> Result<String> {
        Ok(format!("{}.bin", self.output_basename()?))
    }

    /// Apply a host translator option string, e.g.
    /// `resFormat=embedded;anim=keyed;vFlip=1;`.
    ///
    /// Unknown keys are ignored. Empty entries (trailing `;`) are skipped.
    ///
    /// # Errors
    /// Returns a configuration error for malformed entries or invalid values.
    pub fn apply_option_string(&mut self, options: &str) -> Result<()> {
        for entry in options.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((key, value)) = entry.split_once('=') else {
                return Err(Error::InvalidOptionValue {
                    key: entry.to_string(),
                    value: String::new(),
                });
            };

            match key {
                "resFormat" => self.resource_format = value.parse()?,
                "anim" => self.animation = value.parse()?,
                "vFlip" => {
                    self.flip_v = match value {
                        "1" => true,
                        "0" => false,
                        _ => {
                            return Err(Error::InvalidOptionValue {
                                key: key.to_string(),
                                value: value.to_string(),
                            });
                        }
                    }
                }
                _ => tracing::debug!("Ignoring unknown export option: {}", key),
            }
        }
        Ok(())
    }
}
