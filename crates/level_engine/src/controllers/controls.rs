//! Controllers in the `controllers::controls` namespace

use std::collections::HashMap;

use super::{AttributeBuilder, Controller, Describe};
use crate::coercible_enum;
use crate::foundation::math::Vec3;
use crate::level::ObjectTransform;

/// Game action a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move along the facing direction
    MoveForward,
    /// Move against the facing direction
    MoveBackward,
    /// Move left
    StrafeLeft,
    /// Move right
    StrafeRight,
    /// Jump
    Jump,
    /// Primary action
    Fire,
    /// Toggle pause
    Pause,
}

coercible_enum!(InputAction {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Jump,
    Fire,
    Pause
});

/// Key-to-action bindings
///
/// `Bindings` is a map block of `<key> <action>` lines; repeated blocks add
/// to the same map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBindingsController {
    /// Action per key name
    pub bindings: HashMap<String, InputAction>,
}

impl InputBindingsController {
    /// Action bound to `key`
    pub fn action(&self, key: &str) -> Option<InputAction> {
        self.bindings.get(key).copied()
    }

    /// Keys bound to `action`, sorted
    pub fn keys_for(&self, action: InputAction) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}

impl Controller for InputBindingsController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl Describe for InputBindingsController {
    const TYPE_NAME: &'static str = "controllers::controls::InputBindingsController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes.map("Bindings", |c| Some(&mut c.bindings));
    }
}

/// Moves its object along a list of waypoints
///
/// Each update advances `speed` world units toward the current target.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointController {
    /// Points to visit, in order
    pub waypoints: Vec<Vec3>,
    /// Distance covered per update
    pub speed: f32,
    /// Restart from the first waypoint after the last
    pub looping: bool,
    /// Index of the waypoint being approached
    pub target: usize,
    /// Current position
    pub position: Vec3,
}

impl Default for WaypointController {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            speed: 1.0,
            looping: false,
            target: 0,
            position: Vec3::zeros(),
        }
    }
}

impl WaypointController {
    /// Whether every waypoint has been reached
    pub fn finished(&self) -> bool {
        self.target >= self.waypoints.len()
    }

    /// Advance toward the current target by up to `speed`
    pub fn step(&mut self) {
        let mut budget = self.speed;
        while budget > 0.0 {
            let Some(&target) = self.waypoints.get(self.target) else {
                return;
            };
            let offset = target - self.position;
            let distance = offset.norm();
            if distance > budget {
                self.position += offset * (budget / distance);
                return;
            }
            self.position = target;
            budget -= distance;
            self.target += 1;
            if self.looping && self.finished() {
                self.target = 0;
                if distance <= f32::EPSILON {
                    return;
                }
            }
        }
    }
}

impl Controller for WaypointController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn on_init(&mut self, parent: &ObjectTransform) {
        self.position = parent.position;
        self.target = 0;
    }

    fn on_update(&mut self, _parent: &ObjectTransform) {
        self.step();
    }
}

impl Describe for WaypointController {
    const TYPE_NAME: &'static str = "controllers::controls::WaypointController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .sequence("Waypoints", |c, v| c.waypoints = v)
            .scalar("Speed", |c, v| c.speed = v)
            .scalar("Loop", |c, v| c.looping = v);
    }
}
