//! # Level Engine
//!
//! Interpreter for line-oriented level description files.
//!
//! ## Features
//!
//! - **Directives**: `Set` variables with `${name}` substitution, `InitialCamera`, `Object`
//! - **Controllers**: registry-resolved behavior components populated by attribute name
//! - **Typed Coercion**: numbers, booleans, quoted strings, vectors and enums
//! - **Nested Blocks**: sequence and map attributes inside controller bodies
//! - **Asset Lookup**: `Texture` lines resolved through a pluggable [`assets::AssetLookup`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use level_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ControllerRegistry::with_builtins()?;
//!     let mut assets = AssetCatalog::new();
//!     assets.scan_dir("assets")?;
//!
//!     let mut level = LevelLoader::new(&registry, &assets).load_file("levels/intro.lvl")?;
//!     level.init();
//!     level.update();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod assets;
pub mod config;
pub mod controllers;
pub mod foundation;
pub mod level;

/// Common imports for users of the interpreter
pub mod prelude {
    pub use crate::{
        assets::{AssetCatalog, AssetError, AssetHandle, AssetKind, AssetLookup},
        config::{Config, ConfigError, LoaderConfig},
        controllers::{AttributeBuilder, Controller, ControllerInitError, ControllerRegistry, Describe, RegistryError},
        foundation::math::{Vec2, Vec3, Vec4},
        level::{Level, LevelError, LevelLoader, LevelObject, ObjectRef, ObjectTransform},
    };
}
