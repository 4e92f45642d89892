//! Controllers in the root `controllers` namespace

use super::{AttributeBuilder, Controller, Describe};
use crate::level::ObjectTransform;

/// Controller with no state, used to attach an object to the lifecycle
/// without any behavior
///
/// Counts the lifecycle calls it receives.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmptyController {
    /// Number of `on_init` calls
    pub inits: u32,
    /// Number of completed update passes
    pub updates: u32,
    /// Number of completed render passes
    pub renders: u32,
    /// Whether `on_destroy` ran
    pub destroyed: bool,
}

impl Controller for EmptyController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_init(&mut self, _parent: &ObjectTransform) {
        self.inits += 1;
    }

    fn post_update(&mut self, _parent: &ObjectTransform) {
        self.updates += 1;
    }

    fn post_render(&mut self, _camera: &ObjectTransform, _parent: &ObjectTransform) {
        self.renders += 1;
    }

    fn on_destroy(&mut self, _parent: &ObjectTransform) {
        self.destroyed = true;
    }
}

impl Describe for EmptyController {
    const TYPE_NAME: &'static str = "controllers::EmptyController";

    fn describe(_: &mut AttributeBuilder<Self>) {}
}
