//! Controllers in the `controllers::renderers` namespace

use super::{AttributeBuilder, Controller, Describe};
use crate::foundation::math::{Vec2, Vec4};

/// Flat, colored quad in the object's XY plane
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneMeshController {
    /// Width and height
    pub size: Vec2,
    /// RGBA tint
    pub color: Vec4,
}

impl Default for PlaneMeshController {
    fn default() -> Self {
        Self {
            size: Vec2::new(1.0, 1.0),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl PlaneMeshController {
    /// Corner positions, counter-clockwise from bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.size * 0.5;
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
    }
}

impl Controller for PlaneMeshController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl Describe for PlaneMeshController {
    const TYPE_NAME: &'static str = "controllers::renderers::PlaneMeshController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .scalar("Size", |c, v| c.size = v)
            .scalar("Color", |c, v| c.color = v);
    }
}
