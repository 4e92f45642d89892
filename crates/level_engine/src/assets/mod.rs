//! Asset lookup
//!
//! The level interpreter never loads asset data itself. It asks an
//! [`AssetLookup`] to turn a name into a handle and stores the handle on the
//! controller that needs it. [`AssetCatalog`] is the in-memory implementation
//! used by the tools and the tests.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::foundation::collections::{Handle, HandleMap};

/// Asset lookup errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// No asset registered under the name
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Asset exists but is of a different kind
    #[error("Asset '{name}' is a {actual}, expected a {expected}")]
    WrongKind {
        /// Requested asset name
        name: String,
        /// Kind the caller needed
        expected: AssetKind,
        /// Kind actually registered
        actual: AssetKind,
    },

    /// A second asset was registered under an existing name
    #[error("Asset already registered: {0}")]
    Duplicate(String),

    /// IO error while scanning asset directories
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad asset categories the interpreter distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Image data bound as a texture
    Texture,
    /// Mesh geometry
    Mesh,
    /// Shader program source or binary
    Shader,
}

impl AssetKind {
    /// Guess the kind from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "bmp" | "tga" => Some(Self::Texture),
            "obj" | "gltf" | "glb" => Some(Self::Mesh),
            "spv" | "vert" | "frag" | "glsl" => Some(Self::Shader),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Texture => "texture",
            Self::Mesh => "mesh",
            Self::Shader => "shader",
        };
        f.write_str(name)
    }
}

/// Handle to a resolved asset, tagged with its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    key: Handle,
    kind: AssetKind,
}

impl AssetHandle {
    /// Get the underlying key
    pub fn key(&self) -> Handle {
        self.key
    }

    /// Kind of asset this handle refers to
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Check the handle kind, turning a mismatch into an error
    pub fn expect_kind(self, name: &str, expected: AssetKind) -> Result<Self, AssetError> {
        if self.kind == expected {
            Ok(self)
        } else {
            Err(AssetError::WrongKind {
                name: name.to_string(),
                expected,
                actual: self.kind,
            })
        }
    }
}

/// Resolves asset names to handles
pub trait AssetLookup {
    /// Resolve a named asset
    fn resolve(&self, name: &str) -> Result<AssetHandle, AssetError>;
}

/// Registered asset metadata
#[derive(Debug, Clone)]
pub struct AssetEntry {
    /// Lookup name
    pub name: String,
    /// Asset category
    pub kind: AssetKind,
    /// Source file, if the asset came from disk
    pub source: Option<std::path::PathBuf>,
}

/// In-memory asset catalog keyed by name
#[derive(Debug, Default)]
pub struct AssetCatalog {
    entries: HandleMap<AssetEntry>,
    by_name: HashMap<String, Handle>,
}

impl AssetCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset under `name`
    pub fn insert(&mut self, name: impl Into<String>, kind: AssetKind) -> Result<AssetHandle, AssetError> {
        self.insert_entry(AssetEntry {
            name: name.into(),
            kind,
            source: None,
        })
    }

    fn insert_entry(&mut self, entry: AssetEntry) -> Result<AssetHandle, AssetError> {
        if self.by_name.contains_key(&entry.name) {
            return Err(AssetError::Duplicate(entry.name));
        }
        let kind = entry.kind;
        let name = entry.name.clone();
        let key = self.entries.insert(entry);
        self.by_name.insert(name, key);
        Ok(AssetHandle { key, kind })
    }

    /// Register every recognised file in `dir` (non-recursive) by file stem
    ///
    /// Returns the number of assets added. Files with unknown extensions are
    /// skipped.
    pub fn scan_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, AssetError> {
        let dir = dir.as_ref();
        let mut added = 0;

        let mut paths = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.sort();

        for path in paths {
            if !path.is_file() {
                continue;
            }
            let kind = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(AssetKind::from_extension);
            let stem = path.file_stem().and_then(|s| s.to_str()).map(str::to_string);

            let (Some(kind), Some(name)) = (kind, stem) else {
                log::trace!("Skipping unrecognised asset file {:?}", path);
                continue;
            };

            self.insert_entry(AssetEntry {
                name,
                kind,
                source: Some(path),
            })?;
            added += 1;
        }

        log::debug!("Registered {} asset(s) from {:?}", added, dir);
        Ok(added)
    }

    /// Look up the metadata behind a handle
    pub fn get(&self, handle: AssetHandle) -> Option<&AssetEntry> {
        self.entries.get(handle.key)
    }

    /// Number of registered assets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetLookup for AssetCatalog {
    fn resolve(&self, name: &str) -> Result<AssetHandle, AssetError> {
        let key = *self
            .by_name
            .get(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?;
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?;
        Ok(AssetHandle { key, kind: entry.kind })
    }
}
