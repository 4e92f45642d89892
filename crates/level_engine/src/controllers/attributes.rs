//! Per-type attribute tables
//!
//! Each registered controller type carries an [`AttributeTable`] built once
//! by its [`Describe::describe`] implementation. An attribute pairs a name
//! with its declared shape and a setter that downcasts the type-erased
//! controller back to the concrete type.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use indexmap::IndexMap;

use super::{Controller, Describe};
use crate::level::{Coercible, LevelError, Value, ValueType};

type ScalarSetter = Box<dyn Fn(&mut dyn Controller, Value) -> Result<(), LevelError> + Send + Sync>;
type SequenceSetter = Box<dyn Fn(&mut dyn Controller, Vec<Value>) -> Result<(), LevelError> + Send + Sync>;
type MapInserter = Box<dyn Fn(&mut dyn Controller, Value, Value) -> Result<(), LevelError> + Send + Sync>;

/// Shape of an attribute together with its setter
pub enum AttributeSlot {
    /// Single value on the attribute line
    Scalar {
        /// Declared type
        value: ValueType,
        /// Assigns the coerced value
        set: ScalarSetter,
    },
    /// Block of one element per line, replacing the field as a whole
    Sequence {
        /// Element type
        element: ValueType,
        /// Assigns the collected elements
        set: SequenceSetter,
    },
    /// Block of `key value` lines, inserted into an existing map
    Map {
        /// Key type
        key: ValueType,
        /// Value type
        value: ValueType,
        /// Inserts one entry
        insert: MapInserter,
    },
}

impl std::fmt::Debug for AttributeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar { value, .. } => write!(f, "Scalar({value})"),
            Self::Sequence { element, .. } => write!(f, "Sequence({element})"),
            Self::Map { key, value, .. } => write!(f, "Map({key}, {value})"),
        }
    }
}

/// A named, settable attribute
#[derive(Debug)]
pub struct Attribute {
    name: &'static str,
    slot: AttributeSlot,
}

impl Attribute {
    /// Attribute name as written in level files
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared shape and setter
    pub fn slot(&self) -> &AttributeSlot {
        &self.slot
    }
}

/// Attribute lookup for one controller type
#[derive(Debug)]
pub struct AttributeTable {
    type_name: &'static str,
    attributes: IndexMap<&'static str, Attribute>,
}

impl AttributeTable {
    /// Build the table for `T`
    pub fn of<T: Describe>() -> Self {
        let mut builder = AttributeBuilder::<T>::new();
        T::describe(&mut builder);
        builder.table
    }

    /// Controller type this table describes
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Look up an attribute by exact name
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Iterate attributes in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the type declares no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Typed builder handed to [`Describe::describe`]
pub struct AttributeBuilder<T> {
    table: AttributeTable,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Describe> AttributeBuilder<T> {
    fn new() -> Self {
        Self {
            table: AttributeTable {
                type_name: T::TYPE_NAME,
                attributes: IndexMap::new(),
            },
            _marker: PhantomData,
        }
    }

    /// Declare a single-value attribute
    pub fn scalar<V: Coercible + 'static>(&mut self, name: &'static str, set: fn(&mut T, V)) -> &mut Self {
        let setter = move |controller: &mut dyn Controller, value: Value| -> Result<(), LevelError> {
            let target = downcast::<T>(controller)?;
            set(target, convert::<V>(value)?);
            Ok(())
        };
        self.insert(
            name,
            AttributeSlot::Scalar {
                value: V::value_type(),
                set: Box::new(setter),
            },
        )
    }

    /// Declare a sequence attribute; the field is replaced by the collected
    /// elements
    pub fn sequence<V: Coercible + 'static>(&mut self, name: &'static str, set: fn(&mut T, Vec<V>)) -> &mut Self {
        let setter = move |controller: &mut dyn Controller, values: Vec<Value>| -> Result<(), LevelError> {
            let values = values.into_iter().map(convert::<V>).collect::<Result<Vec<_>, _>>()?;
            let target = downcast::<T>(controller)?;
            set(target, values);
            Ok(())
        };
        self.insert(
            name,
            AttributeSlot::Sequence {
                element: V::value_type(),
                set: Box::new(setter),
            },
        )
    }

    /// Declare a map attribute
    ///
    /// `access` returns the map to insert into; `None` means the controller
    /// holds no instance, which fails the load.
    pub fn map<K, V>(&mut self, name: &'static str, access: fn(&mut T) -> Option<&mut HashMap<K, V>>) -> &mut Self
    where
        K: Coercible + Eq + Hash + 'static,
        V: Coercible + 'static,
    {
        let inserter = move |controller: &mut dyn Controller, key: Value, value: Value| -> Result<(), LevelError> {
            let key = convert::<K>(key)?;
            let value = convert::<V>(value)?;
            let target = downcast::<T>(controller)?;
            let map = access(target).ok_or_else(|| LevelError::MissingMapInstance {
                name: name.to_string(),
                controller: T::TYPE_NAME,
            })?;
            map.insert(key, value);
            Ok(())
        };
        self.insert(
            name,
            AttributeSlot::Map {
                key: K::value_type(),
                value: V::value_type(),
                insert: Box::new(inserter),
            },
        )
    }

    /// Declare an attribute whose type has no textual form
    ///
    /// It is visible to lookups but any attempt to set it from a level file
    /// fails with [`LevelError::UnsupportedType`].
    pub fn opaque(&mut self, name: &'static str, type_name: &'static str) -> &mut Self {
        let target = ValueType::Opaque(type_name);
        let setter = move |_: &mut dyn Controller, _: Value| -> Result<(), LevelError> {
            Err(LevelError::UnsupportedType { target })
        };
        self.insert(
            name,
            AttributeSlot::Scalar {
                value: target,
                set: Box::new(setter),
            },
        )
    }

    fn insert(&mut self, name: &'static str, slot: AttributeSlot) -> &mut Self {
        if self.table.attributes.contains_key(name) {
            log::warn!("{} declares attribute {name} twice; keeping the last", T::TYPE_NAME);
        }
        self.table.attributes.insert(name, Attribute { name, slot });
        self
    }
}

fn downcast<T: Describe>(controller: &mut dyn Controller) -> Result<&mut T, LevelError> {
    controller
        .as_any_mut()
        .downcast_mut::<T>()
        .ok_or(LevelError::ControllerMismatch {
            expected: T::TYPE_NAME,
        })
}

fn convert<V: Coercible>(value: Value) -> Result<V, LevelError> {
    V::from_value(value).ok_or(LevelError::UnsupportedType {
        target: V::value_type(),
    })
}
