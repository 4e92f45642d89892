//! Level file interpreter
//!
//! A level file is line oriented. Top-level lines are directives (`Set`,
//! `InitialCamera`, `Object`); an `Object` opens a block of transform and
//! controller lines, a `Controller` opens a block of attribute lines, and
//! sequence or map attributes open one more block each. Every block is closed
//! by `End`, and all levels share one [`LineCursor`] so an `End` only closes
//! the innermost block.
//!
//! ```text
//! Set size 2
//! InitialCamera 0
//! Object camera
//!   Position 0 0 10
//!   Controller OrthographicCamera
//!     Size ${size}
//!   End
//! End
//! ```

pub mod coerce;
pub mod cursor;
pub mod error;
pub mod loader;
pub mod model;
pub mod object;
pub mod populate;
pub mod variables;

pub use coerce::{coerce, coerce_as, Coercible, EnumInfo, Value, ValueType};
pub use cursor::{LineCursor, SourceLine, TERMINATOR};
pub use error::LevelError;
pub use loader::LevelLoader;
pub use model::{Level, LevelObject, ObjectRef, ObjectTransform};
pub use object::{read_object, ObjectContext, EMPTY_MARKER, Z_UP_MARKER};
pub use populate::populate;
pub use variables::VariableTable;
