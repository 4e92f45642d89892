//! Loaded level object model

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::error::LevelError;
use crate::controllers::Controller;
use crate::foundation::math::{trs_matrix, Mat4, Vec3};

/// Reference index of an object within its level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectRef(pub u32);

impl ObjectRef {
    /// First index handed out by a load
    pub const FIRST: Self = Self(0);

    /// Raw index
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position, Euler rotation in degrees, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    /// World position
    pub position: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl ObjectTransform {
    /// Model matrix (translation * rotation * scale)
    pub fn matrix(&self) -> Mat4 {
        trs_matrix(self.position, self.rotation, self.scale)
    }
}

/// A positioned object and its controllers
#[derive(Debug, Default)]
pub struct LevelObject {
    /// Optional user-chosen name
    pub name: Option<String>,
    /// Placement
    pub transform: ObjectTransform,
    /// Attached controllers, in declaration order
    pub controllers: Vec<Box<dyn Controller>>,
}

impl LevelObject {
    /// Create an unnamed object at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// First controller of type `T`
    pub fn controller<T: Controller>(&self) -> Option<&T> {
        self.controllers.iter().find_map(|c| c.downcast_ref::<T>())
    }

    /// Mutable access to the first controller of type `T`
    pub fn controller_mut<T: Controller>(&mut self) -> Option<&mut T> {
        self.controllers.iter_mut().find_map(|c| c.downcast_mut::<T>())
    }

    /// Every controller of type `T`
    pub fn controllers_of<T: Controller>(&self) -> impl Iterator<Item = &T> {
        self.controllers.iter().filter_map(|c| c.downcast_ref::<T>())
    }

    /// Type names of the attached controllers
    pub fn controller_names(&self) -> Vec<&'static str> {
        self.controllers.iter().map(|c| c.type_name()).collect()
    }
}

/// A fully loaded level
#[derive(Debug, Default)]
pub struct Level {
    /// Camera id selected by `InitialCamera`
    pub initial_camera: u32,
    objects: BTreeMap<ObjectRef, LevelObject>,
    names: HashMap<String, ObjectRef>,
}

impl Level {
    /// Create an empty level
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object under a fresh reference index
    ///
    /// Indices are assigned in insertion order starting at
    /// [`ObjectRef::FIRST`]. Fails with
    /// [`LevelError::DuplicateObjectName`] if the object's name is taken; the
    /// object is dropped in that case.
    pub(crate) fn insert(&mut self, object: LevelObject) -> Result<ObjectRef, LevelError> {
        if let Some(name) = &object.name {
            if self.names.contains_key(name) {
                return Err(LevelError::DuplicateObjectName(name.clone()));
            }
        }
        let reference = self.next_ref();
        if let Some(name) = &object.name {
            self.names.insert(name.clone(), reference);
        }
        self.objects.insert(reference, object);
        Ok(reference)
    }

    /// Index the next inserted object receives
    pub fn next_ref(&self) -> ObjectRef {
        self.objects
            .keys()
            .next_back()
            .map_or(ObjectRef::FIRST, |last| ObjectRef(last.0 + 1))
    }

    /// Whether `name` is already used by an object
    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Object by reference index
    pub fn object(&self, reference: ObjectRef) -> Option<&LevelObject> {
        self.objects.get(&reference)
    }

    /// Mutable object by reference index
    pub fn object_mut(&mut self, reference: ObjectRef) -> Option<&mut LevelObject> {
        self.objects.get_mut(&reference)
    }

    /// Reference index of a named object
    pub fn find(&self, name: &str) -> Option<ObjectRef> {
        self.names.get(name).copied()
    }

    /// Object by name
    pub fn object_by_name(&self, name: &str) -> Option<&LevelObject> {
        self.find(name).and_then(|reference| self.object(reference))
    }

    /// Objects in index order
    pub fn objects(&self) -> impl Iterator<Item = (ObjectRef, &LevelObject)> {
        self.objects.iter().map(|(reference, object)| (*reference, object))
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the level has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Run `on_init` on every controller
    pub fn init(&mut self) {
        self.for_each_controller(|controller, transform| controller.on_init(transform));
    }

    /// Run one update pass: every `pre_update`, then every `on_update`, then
    /// every `post_update`
    pub fn update(&mut self) {
        self.for_each_controller(|controller, transform| controller.pre_update(transform));
        self.for_each_controller(|controller, transform| controller.on_update(transform));
        self.for_each_controller(|controller, transform| controller.post_update(transform));
    }

    /// Run one render pass as seen from the `camera` object
    ///
    /// Does nothing if `camera` is not an object of this level.
    pub fn render(&mut self, camera: ObjectRef) {
        let Some(camera) = self.object(camera).map(|object| object.transform) else {
            log::warn!("Render requested from unknown camera object {camera}");
            return;
        };
        self.for_each_controller(|controller, transform| controller.pre_render(&camera, transform));
        self.for_each_controller(|controller, transform| controller.on_render(&camera, transform));
        self.for_each_controller(|controller, transform| controller.post_render(&camera, transform));
    }

    /// Run `on_destroy` on every controller
    pub fn destroy(&mut self) {
        self.for_each_controller(|controller, transform| controller.on_destroy(transform));
    }

    fn for_each_controller(&mut self, mut hook: impl FnMut(&mut dyn Controller, &ObjectTransform)) {
        for object in self.objects.values_mut() {
            let LevelObject {
                transform, controllers, ..
            } = object;
            for controller in controllers.iter_mut() {
                hook(controller.as_mut(), transform);
            }
        }
    }
}
