//! Controllers in the `controllers::storage` namespace

use std::collections::HashMap;

use super::{AttributeBuilder, Controller, Describe};

/// Free-form key/value storage attached to an object
///
/// Lets level files carry game data the engine does not interpret:
///
/// ```text
/// Controller Store
///   Strings
///     greeting "hello there"
///   End
///   Numbers
///     health 100
///   End
///   Tags
///     enemy
///     boss
///   End
/// End
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreController {
    /// String values
    pub strings: HashMap<String, String>,
    /// Numeric values
    pub numbers: HashMap<String, f64>,
    /// Boolean flags
    pub flags: HashMap<String, bool>,
    /// Ordered tags; each `Tags` block replaces the list
    pub tags: Vec<String>,
}

impl StoreController {
    /// String value for `key`
    pub fn string(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Numeric value for `key`
    pub fn number(&self, key: &str) -> Option<f64> {
        self.numbers.get(key).copied()
    }

    /// Flag value for `key`, `false` when unset
    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Whether `tag` is present
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Controller for StoreController {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl Describe for StoreController {
    const TYPE_NAME: &'static str = "controllers::storage::StoreController";

    fn describe(attributes: &mut AttributeBuilder<Self>) {
        attributes
            .map("Strings", |c| Some(&mut c.strings))
            .map("Numbers", |c| Some(&mut c.numbers))
            .map("Flags", |c| Some(&mut c.flags))
            .sequence("Tags", |c, v| c.tags = v);
    }
}
