//! Controllers - behavior components attached to level objects
//!
//! A controller is any type implementing [`Controller`]. To be reachable from
//! a level file it also implements [`Describe`], which names the type and
//! lists its settable attributes, and is registered with a
//! [`ControllerRegistry`].
//!
//! Built-in controllers live in namespace modules mirroring the lookup
//! prefixes used by the registry:
//!
//! - [`empty`] (`controllers::`)
//! - [`rendering`] (`controllers::rendering::`)
//! - [`controls`] (`controllers::controls::`)
//! - [`renderers`] (`controllers::renderers::`)
//! - [`lights`] (`controllers::lights::`)
//! - [`storage`] (`controllers::storage::`)

pub mod attributes;
pub mod registry;

pub mod controls;
pub mod empty;
pub mod lights;
pub mod renderers;
pub mod rendering;
pub mod storage;

use std::any::Any;
use std::fmt;

use thiserror::Error;

use crate::level::ObjectTransform;

pub use attributes::{Attribute, AttributeBuilder, AttributeSlot, AttributeTable};
pub use registry::{ControllerRegistry, ControllerType, RegistryError, CONTROLLER_SUFFIX, NAMESPACES};

pub use controls::{InputAction, InputBindingsController, WaypointController};
pub use empty::EmptyController;
pub use lights::{DirectionalLightController, PointLightController};
pub use renderers::PlaneMeshController;
pub use rendering::{
    MeshLoaderController, OrthographicCameraController, PerspectiveCameraController, ShaderController,
    TextureController, TextureFilter, TextureWrap,
};
pub use storage::StoreController;

/// Failure raised by a controller constructor
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ControllerInitError {
    message: String,
}

impl ControllerInitError {
    /// Create a new constructor error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Upcast helper so trait objects can be downcast to their concrete type
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior component attached to a level object
///
/// All lifecycle hooks default to no-ops. `parent` is the transform of the
/// object owning the controller; render hooks also receive the active
/// camera's transform.
pub trait Controller: AsAny + fmt::Debug {
    /// Fully-qualified type name
    fn type_name(&self) -> &'static str;

    /// Called once after the level is loaded
    fn on_init(&mut self, _parent: &ObjectTransform) {}

    /// Called before every update pass
    fn pre_update(&mut self, _parent: &ObjectTransform) {}

    /// Called every update pass
    fn on_update(&mut self, _parent: &ObjectTransform) {}

    /// Called after every update pass
    fn post_update(&mut self, _parent: &ObjectTransform) {}

    /// Called before every render pass
    fn pre_render(&mut self, _camera: &ObjectTransform, _parent: &ObjectTransform) {}

    /// Called every render pass
    fn on_render(&mut self, _camera: &ObjectTransform, _parent: &ObjectTransform) {}

    /// Called after every render pass
    fn post_render(&mut self, _camera: &ObjectTransform, _parent: &ObjectTransform) {}

    /// Called once when the level is torn down
    fn on_destroy(&mut self, _parent: &ObjectTransform) {}
}

impl dyn Controller {
    /// Downcast to a concrete controller type
    pub fn downcast_ref<T: Controller>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably downcast to a concrete controller type
    pub fn downcast_mut<T: Controller>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Whether the controller is of type `T`
    pub fn is<T: Controller>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Registration metadata for a controller type
///
/// `describe` is called once when the type is registered; the resulting
/// [`AttributeTable`] is what the level interpreter consults when it
/// populates an instance.
pub trait Describe: Controller + Default {
    /// Fully-qualified name, e.g. `controllers::rendering::TextureController`
    const TYPE_NAME: &'static str;

    /// Explicit short name accepted in addition to the namespace convention
    const SHORT_NAME: Option<&'static str> = None;

    /// Construct a fresh, unconfigured instance
    fn create() -> Result<Self, ControllerInitError> {
        Ok(Self::default())
    }

    /// Declare settable attributes
    fn describe(attributes: &mut AttributeBuilder<Self>);
}
