//! Controller type registry
//!
//! Maps the short names written after `Controller` in level files to
//! registered controller types. A short name resolves by trying, in order:
//!
//! 1. the name itself as a fully-qualified type name
//! 2. an explicit short name declared through [`Describe::SHORT_NAME`]
//! 3. `<namespace>::<name>Controller` for each entry of [`NAMESPACES`]

use std::collections::HashMap;

use thiserror::Error;

use super::attributes::AttributeTable;
use super::{Controller, ControllerInitError, Describe};
use crate::level::LevelError;

/// Namespaces searched, in order, when resolving a short name
pub const NAMESPACES: [&str; 6] = [
    "controllers",
    "controllers::rendering",
    "controllers::controls",
    "controllers::renderers",
    "controllers::lights",
    "controllers::storage",
];

/// Suffix shared by conventionally named controller types
pub const CONTROLLER_SUFFIX: &str = "Controller";

type Constructor = fn() -> Result<Box<dyn Controller>, ControllerInitError>;

/// Registration errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Type name or short name already claimed by another registration
    #[error("Controller name '{name}' for {type_name} is already registered by {existing}")]
    Duplicate {
        /// Name that collided
        name: String,
        /// Type being registered
        type_name: &'static str,
        /// Type already holding the name
        existing: &'static str,
    },
}

/// A registered controller type
#[derive(Debug)]
pub struct ControllerType {
    type_name: &'static str,
    aliases: Vec<String>,
    construct: Constructor,
    attributes: AttributeTable,
}

impl ControllerType {
    /// Describe `T` for registration
    pub fn of<T: Describe + 'static>() -> Self {
        let mut aliases: Vec<String> = T::SHORT_NAME
            .map(str::to_string)
            .into_iter()
            .chain(conventional_short_name(T::TYPE_NAME))
            .collect();
        aliases.dedup();

        Self {
            type_name: T::TYPE_NAME,
            aliases,
            construct: construct_boxed::<T>,
            attributes: AttributeTable::of::<T>(),
        }
    }

    /// Fully-qualified type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Name accepted after `Controller` in level files, if any
    ///
    /// Either the explicit override or the name derived from the namespace
    /// convention.
    pub fn short_name(&self) -> Option<&str> {
        self.aliases.first().map(String::as_str)
    }

    /// Every short name the type answers to, override first
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    /// Settable attributes
    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    /// Construct a fresh instance
    pub fn instantiate(&self) -> Result<Box<dyn Controller>, ControllerInitError> {
        (self.construct)()
    }
}

fn construct_boxed<T: Describe + 'static>() -> Result<Box<dyn Controller>, ControllerInitError> {
    Ok(Box::new(T::create()?))
}

/// `controllers::lights::PointLightController` -> `PointLight`
fn conventional_short_name(type_name: &str) -> Option<String> {
    NAMESPACES.iter().find_map(|namespace| {
        let short = type_name
            .strip_prefix(namespace)?
            .strip_prefix("::")?
            .strip_suffix(CONTROLLER_SUFFIX)?;
        (!short.is_empty() && !short.contains("::")).then(|| short.to_string())
    })
}

/// Registered controller types, keyed by type name and short name
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    types: Vec<ControllerType>,
    by_type_name: HashMap<&'static str, usize>,
    by_short_name: HashMap<String, usize>,
}

impl ControllerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in controller
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register_builtins()?;
        Ok(registry)
    }

    /// Register every built-in controller
    pub fn register_builtins(&mut self) -> Result<(), RegistryError> {
        use super::{
            DirectionalLightController, EmptyController, InputBindingsController, MeshLoaderController,
            OrthographicCameraController, PerspectiveCameraController, PlaneMeshController, PointLightController,
            ShaderController, StoreController, TextureController, WaypointController,
        };

        self.register::<EmptyController>()?;
        self.register::<OrthographicCameraController>()?;
        self.register::<PerspectiveCameraController>()?;
        self.register::<MeshLoaderController>()?;
        self.register::<TextureController>()?;
        self.register::<ShaderController>()?;
        self.register::<PlaneMeshController>()?;
        self.register::<PointLightController>()?;
        self.register::<DirectionalLightController>()?;
        self.register::<InputBindingsController>()?;
        self.register::<WaypointController>()?;
        self.register::<StoreController>()?;
        Ok(())
    }

    /// Register a controller type
    ///
    /// Fails if its type name or any of its short names already resolves to a
    /// registered type; the registry is left unchanged in that case.
    pub fn register<T: Describe + 'static>(&mut self) -> Result<(), RegistryError> {
        self.insert(ControllerType::of::<T>())
    }

    fn insert(&mut self, entry: ControllerType) -> Result<(), RegistryError> {
        let taken = std::iter::once(entry.type_name)
            .chain(entry.aliases())
            .find_map(|name| self.lookup(name).map(|existing| (name, existing.type_name)));
        if let Some((name, existing)) = taken {
            log::warn!("Controller {} would shadow {existing} as {name}", entry.type_name);
            return Err(RegistryError::Duplicate {
                name: name.to_string(),
                type_name: entry.type_name,
                existing,
            });
        }

        let index = self.types.len();
        log::debug!(
            "Registered controller {} as {}",
            entry.type_name,
            entry.short_name().unwrap_or("<no short name>")
        );
        self.by_type_name.insert(entry.type_name, index);
        for alias in &entry.aliases {
            self.by_short_name.insert(alias.clone(), index);
        }
        self.types.push(entry);
        Ok(())
    }

    /// Resolve a name written in a level file
    pub fn resolve(&self, name: &str) -> Result<&ControllerType, LevelError> {
        self.lookup(name).ok_or_else(|| LevelError::ControllerNotFound {
            name: name.to_string(),
        })
    }

    fn lookup(&self, name: &str) -> Option<&ControllerType> {
        if let Some(&index) = self.by_type_name.get(name) {
            return Some(&self.types[index]);
        }
        if let Some(&index) = self.by_short_name.get(name) {
            return Some(&self.types[index]);
        }
        NAMESPACES.iter().find_map(|namespace| {
            let candidate = format!("{namespace}::{name}{CONTROLLER_SUFFIX}");
            self.by_type_name.get(candidate.as_str()).map(|&index| &self.types[index])
        })
    }

    /// Resolve a name and construct a fresh instance
    pub fn instantiate(&self, name: &str) -> Result<(Box<dyn Controller>, &AttributeTable), LevelError> {
        let entry = self.resolve(name)?;
        let controller = entry
            .instantiate()
            .map_err(|source| LevelError::ControllerConstruction {
                name: name.to_string(),
                source,
            })?;
        Ok((controller, entry.attributes()))
    }

    /// Whether any registered type answers to `name`
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Iterate registered types in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ControllerType> {
        self.types.iter()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::{
        AttributeBuilder, EmptyController, OrthographicCameraController, PerspectiveCameraController,
        PointLightController,
    };

    #[derive(Debug, Default)]
    struct Failing;

    impl Controller for Failing {
        fn type_name(&self) -> &'static str {
            Self::TYPE_NAME
        }
    }

    impl Describe for Failing {
        const TYPE_NAME: &'static str = "controllers::FailingController";

        fn create() -> Result<Self, ControllerInitError> {
            Err(ControllerInitError::new("no device"))
        }

        fn describe(_: &mut AttributeBuilder<Self>) {}
    }

    #[derive(Debug, Default)]
    struct OtherEmpty;

    impl Controller for OtherEmpty {
        fn type_name(&self) -> &'static str {
            Self::TYPE_NAME
        }
    }

    impl Describe for OtherEmpty {
        const TYPE_NAME: &'static str = "controllers::storage::EmptyController";

        fn describe(_: &mut AttributeBuilder<Self>) {}
    }

    #[test]
    fn test_conventional_short_names() {
        assert_eq!(
            conventional_short_name("controllers::lights::PointLightController").as_deref(),
            Some("PointLight")
        );
        assert_eq!(conventional_short_name("controllers::EmptyController").as_deref(), Some("Empty"));
        assert_eq!(conventional_short_name("game::EmptyController"), None);
        assert_eq!(conventional_short_name("controllers::rendering::Camera"), None);
        assert_eq!(conventional_short_name("controllers::deep::nested::FooController"), None);
    }

    #[test]
    fn test_resolve_by_convention_across_namespaces() {
        let registry = ControllerRegistry::with_builtins().unwrap();
        assert_eq!(registry.resolve("Empty").unwrap().type_name(), "controllers::EmptyController");
        assert_eq!(
            registry.resolve("OrthographicCamera").unwrap().type_name(),
            OrthographicCameraController::TYPE_NAME
        );
        assert_eq!(registry.resolve("PointLight").unwrap().type_name(), PointLightController::TYPE_NAME);
    }

    #[test]
    fn test_resolve_short_name_override() {
        let registry = ControllerRegistry::with_builtins().unwrap();
        assert_eq!(
            registry.resolve("PerspectiveCamera").unwrap().type_name(),
            PerspectiveCameraController::TYPE_NAME
        );
        assert_eq!(
            registry.resolve("PerspCamera").unwrap().type_name(),
            PerspectiveCameraController::TYPE_NAME
        );
        assert_eq!(registry.resolve("PerspCamera").unwrap().short_name(), Some("PerspCamera"));
    }

    #[test]
    fn test_resolve_fully_qualified_name() {
        let registry = ControllerRegistry::with_builtins().unwrap();
        assert!(registry.resolve("controllers::rendering::TextureController").is_ok());
    }

    #[test]
    fn test_unknown_name() {
        let registry = ControllerRegistry::with_builtins().unwrap();
        let err = registry.resolve("Nonexistent").unwrap_err();
        assert_eq!(err.to_string(), "Controller was not found: Nonexistent");
        assert!(!registry.contains("empty"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ControllerRegistry::new();
        registry.register::<EmptyController>().unwrap();
        assert!(matches!(
            registry.register::<EmptyController>(),
            Err(RegistryError::Duplicate { .. })
        ));

        let err = registry.register::<OtherEmpty>().unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { ref name, existing: "controllers::EmptyController", .. } if name == "Empty"));
        assert_eq!(registry.len(), 1);
    }

    #[derive(Debug, Default)]
    struct Impostor;

    impl Controller for Impostor {
        fn type_name(&self) -> &'static str {
            Self::TYPE_NAME
        }
    }

    impl Describe for Impostor {
        const TYPE_NAME: &'static str = "game::Impostor";
        const SHORT_NAME: Option<&'static str> = Some("PerspectiveCamera");

        fn describe(_: &mut AttributeBuilder<Self>) {}
    }

    #[derive(Debug, Default)]
    struct Torch;

    impl Controller for Torch {
        fn type_name(&self) -> &'static str {
            Self::TYPE_NAME
        }
    }

    impl Describe for Torch {
        const TYPE_NAME: &'static str = "game::Torch";
        const SHORT_NAME: Option<&'static str> = Some("PointLight");

        fn describe(_: &mut AttributeBuilder<Self>) {}
    }

    #[test]
    fn test_override_keeps_conventional_name_reserved() {
        let mut registry = ControllerRegistry::with_builtins().unwrap();
        let count = registry.len();

        let err = registry.register::<Impostor>().unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Duplicate { ref name, existing, .. }
                if name == "PerspectiveCamera" && existing == PerspectiveCameraController::TYPE_NAME
        ));
        assert_eq!(
            registry.resolve("PerspectiveCamera").unwrap().type_name(),
            PerspectiveCameraController::TYPE_NAME
        );
        assert_eq!(registry.len(), count);
    }

    #[test]
    fn test_override_cannot_claim_conventional_name_of_other_type() {
        let mut registry = ControllerRegistry::with_builtins().unwrap();
        let err = registry.register::<Torch>().unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { ref name, .. } if name == "PointLight"));
        assert_eq!(registry.resolve("PointLight").unwrap().type_name(), PointLightController::TYPE_NAME);
    }

    #[test]
    fn test_aliases_list_override_then_convention() {
        let registry = ControllerRegistry::with_builtins().unwrap();
        let camera = registry.resolve("PerspCamera").unwrap();
        assert_eq!(camera.aliases().collect::<Vec<_>>(), vec!["PerspCamera", "PerspectiveCamera"]);
        let empty = registry.resolve("Empty").unwrap();
        assert_eq!(empty.aliases().collect::<Vec<_>>(), vec!["Empty"]);
    }

    #[test]
    fn test_constructor_failure_is_reported() {
        let mut registry = ControllerRegistry::new();
        registry.register::<Failing>().unwrap();
        let err = registry.instantiate("Failing").unwrap_err();
        assert!(matches!(err, LevelError::ControllerConstruction { ref name, .. } if name == "Failing"));
    }

    #[test]
    fn test_instantiate_returns_matching_table() {
        let registry = ControllerRegistry::with_builtins().unwrap();
        let (controller, table) = registry.instantiate("OrthographicCamera").unwrap();
        assert!(controller.is::<OrthographicCameraController>());
        assert_eq!(table.type_name(), OrthographicCameraController::TYPE_NAME);
        assert!(table.get("FarClip").is_some());
    }
}
