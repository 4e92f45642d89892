//! Level loading errors

use thiserror::Error;

use super::coerce::ValueType;
use crate::assets::AssetError;
use crate::controllers::ControllerInitError;

/// Errors raised while interpreting a level file
///
/// Every variant aborts the load; there is no partial level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// Line shape not recognised by the enclosing block
    #[error("Invalid line in level file at line {line_number}: `{line}`{}", object_suffix(.object))]
    Syntax {
        /// Raw (substituted) line text
        line: String,
        /// 1-based line number
        line_number: usize,
        /// Reference index of the enclosing object, if any
        object: Option<u32>,
    },

    /// Token could not be parsed as the target type
    #[error("Cannot parse '{token}' as {target}")]
    Format {
        /// Offending token
        token: String,
        /// Requested type
        target: ValueType,
    },

    /// Token is not one of the enum's constants
    #[error("'{token}' is not a value of {target}")]
    UnknownEnumValue {
        /// Offending token
        token: String,
        /// Requested enum type
        target: ValueType,
    },

    /// Declared type has no coercion rule
    #[error("Non-serializable type {target}")]
    UnsupportedType {
        /// Requested type
        target: ValueType,
    },

    /// Controller has no attribute with this name
    #[error("Cannot set setting {name} on {controller}")]
    UnknownAttribute {
        /// Attribute name as written
        name: String,
        /// Controller type name
        controller: &'static str,
    },

    /// Map attribute reached while the controller owns no map instance
    #[error("Map attribute {name} on {controller} has no instance to fill")]
    MissingMapInstance {
        /// Attribute name
        name: String,
        /// Controller type name
        controller: &'static str,
    },

    /// No registered controller matches the name
    #[error("Controller was not found: {name}")]
    ControllerNotFound {
        /// Name as written in the level file
        name: String,
    },

    /// Controller type matched but could not be constructed
    #[error("Controller was not found: {name}")]
    ControllerConstruction {
        /// Name as written in the level file
        name: String,
        /// Constructor failure
        #[source]
        source: ControllerInitError,
    },

    /// An attribute table was applied to a controller of another type
    #[error("Attribute table for {expected} applied to a different controller type")]
    ControllerMismatch {
        /// Type the table was built for
        expected: &'static str,
    },

    /// Input ended inside an open block
    #[error("Level file ended inside an open {block} block")]
    UnexpectedEndOfInput {
        /// Kind of block left open
        block: &'static str,
    },

    /// Two objects declared with the same name
    #[error("Object name '{0}' is already in use")]
    DuplicateObjectName(String),

    /// Asset lookup failure
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// IO error reading the level file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn object_suffix(object: &Option<u32>) -> String {
    object.map(|index| format!(" (Object {index})")).unwrap_or_default()
}
