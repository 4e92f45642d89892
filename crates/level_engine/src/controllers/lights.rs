//! Controllers in the `controllers::lights` namespace

use super::{AttributeBuilder, Controller, Describe};
use crate::foundation::math::Vec3;
use crate::level::ObjectTransform;

/// Omnidirectional light at the owning object's position
#[derive(Debug, Clone, PartialEq)]
pub struct PointLightController {
    /// Linear RGB color
    pub color: Vec3,
    /// Brightness multiplier
    pub intensity: f32,
    /// Distance at which the light has no effect
    pub range: f32,
    /// World position, captured on init
    pub position: Vec3,
}

impl Default for PointLightController {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
            range: 10.0,
            position: Vec3::zeros(),
        }
    }
}

impl PointLightController {
    /// Linear falloff factor at `distance`, clamped to `[0, 1]`
    pub fn attenuation(&self, distance: f32) -> f32 {
        if self.range <= 0.0 {
            return 0.0;
        }
        (1.0 - distance / self.range).clamp(0.0, 1.0)
    }
}

impl Controller for PointLightController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_init(&mut self, parent: &ObjectTransform) {
        self.position = parent.position;
    }

    fn on_update(&mut self, parent: &ObjectTransform) {
        self.position = parent.position;
    }
}

impl Describe for PointLightController {
    const TYPE_NAME: &'static str = "controllers::lights::PointLightController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .scalar("Color", |c, v| c.color = v)
            .scalar("Intensity", |c, v| c.intensity = v)
            .scalar("Range", |c, v| c.range = v);
    }
}

/// Infinitely distant light shining along a fixed direction
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLightController {
    /// Direction the light travels in
    pub direction: Vec3,
    /// Linear RGB color
    pub color: Vec3,
    /// Brightness multiplier
    pub intensity: f32,
}

impl Default for DirectionalLightController {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, -1.0, 0.0),
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
        }
    }
}

impl Controller for DirectionalLightController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_init(&mut self, _parent: &ObjectTransform) {
        if let Some(direction) = self.direction.try_normalize(f32::EPSILON) {
            self.direction = direction;
        } else {
            log::warn!("DirectionalLightController has a zero direction");
        }
    }
}

impl Describe for DirectionalLightController {
    const TYPE_NAME: &'static str = "controllers::lights::DirectionalLightController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .scalar("Direction", |c, v| c.direction = v)
            .scalar("Color", |c, v| c.color = v)
            .scalar("Intensity", |c, v| c.intensity = v);
    }
}
