//! Type-directed value coercion
//!
//! Every attribute and directive argument goes through [`coerce`]: given the
//! declared [`ValueType`] of a target and the tokens of a line, produce a
//! [`Value`] or fail with a typed error. Rust types opt in through
//! [`Coercible`], which the attribute tables use to convert the untyped
//! [`Value`] back into the field's own type.

use std::fmt;
use std::str::FromStr;

use super::error::LevelError;
use crate::foundation::math::{Vec2, Vec3, Vec4};

/// Named constants of an enumerated attribute type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumInfo {
    /// Type name used in diagnostics
    pub name: &'static str,
    /// Accepted constant names, matched exactly
    pub constants: &'static [&'static str],
}

/// Semantic type of an attribute or argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Signed 8-bit integer
    I8,
    /// Signed 16-bit integer
    I16,
    /// Signed 32-bit integer
    I32,
    /// Signed 64-bit integer
    I64,
    /// Unsigned 8-bit integer
    U8,
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// Unsigned 64-bit integer
    U64,
    /// Single precision float
    F32,
    /// Double precision float
    F64,
    /// Boolean
    Bool,
    /// String
    Str,
    /// 2-component float vector
    Vec2,
    /// 3-component float vector
    Vec3,
    /// 4-component float vector
    Vec4,
    /// Enumerated named constant
    Enum(EnumInfo),
    /// A declared type with no textual form
    Opaque(&'static str),
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Str => "string",
            Self::Vec2 => "Vec2",
            Self::Vec3 => "Vec3",
            Self::Vec4 => "Vec4",
            Self::Enum(info) => info.name,
            Self::Opaque(name) => name,
        };
        f.write_str(name)
    }
}

/// A coerced value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed 8-bit integer
    I8(i8),
    /// Signed 16-bit integer
    I16(i16),
    /// Signed 32-bit integer
    I32(i32),
    /// Signed 64-bit integer
    I64(i64),
    /// Unsigned 8-bit integer
    U8(u8),
    /// Unsigned 16-bit integer
    U16(u16),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Unsigned 64-bit integer
    U64(u64),
    /// Single precision float
    F32(f32),
    /// Double precision float
    F64(f64),
    /// Boolean
    Bool(bool),
    /// String
    Str(String),
    /// 2-component float vector
    Vec2(Vec2),
    /// 3-component float vector
    Vec3(Vec3),
    /// 4-component float vector
    Vec4(Vec4),
    /// Enumerated constant, by name
    Enum(&'static str),
}

/// Rust types that can be produced by [`coerce`]
pub trait Coercible: Sized {
    /// Declared semantic type
    fn value_type() -> ValueType;

    /// Extract `Self` from a value coerced against [`Coercible::value_type`]
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_coercible {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Coercible for $ty {
                fn value_type() -> ValueType {
                    ValueType::$variant
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_coercible!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => Str,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
);

/// Implement [`Coercible`] for a fieldless enum, matching constants by
/// variant name
///
/// ```ignore
/// #[derive(Debug, Clone, Copy)]
/// pub enum Filter { Nearest, Linear }
/// coercible_enum!(Filter { Nearest, Linear });
/// ```
#[macro_export]
macro_rules! coercible_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::level::Coercible for $ty {
            fn value_type() -> $crate::level::ValueType {
                $crate::level::ValueType::Enum($crate::level::EnumInfo {
                    name: stringify!($ty),
                    constants: &[$(stringify!($variant)),+],
                })
            }

            fn from_value(value: $crate::level::Value) -> Option<Self> {
                match value {
                    $crate::level::Value::Enum(name) => match name {
                        $(stringify!($variant) => Some(Self::$variant),)+
                        _ => None,
                    },
                    _ => None,
                }
            }
        }
    };
}

/// Coerce `tokens[offset..]` into `target`
///
/// `multi_value` allows the value to span the rest of the line (strings and
/// vectors); map keys pass `false` and read exactly one token.
pub fn coerce(target: ValueType, tokens: &[&str], offset: usize, multi_value: bool) -> Result<Value, LevelError> {
    match target {
        ValueType::I8 => parse_token(tokens, offset, target).map(Value::I8),
        ValueType::I16 => parse_token(tokens, offset, target).map(Value::I16),
        ValueType::I32 => parse_token(tokens, offset, target).map(Value::I32),
        ValueType::I64 => parse_token(tokens, offset, target).map(Value::I64),
        ValueType::U8 => parse_token(tokens, offset, target).map(Value::U8),
        ValueType::U16 => parse_token(tokens, offset, target).map(Value::U16),
        ValueType::U32 => parse_token(tokens, offset, target).map(Value::U32),
        ValueType::U64 => parse_token(tokens, offset, target).map(Value::U64),
        ValueType::F32 => parse_token(tokens, offset, target).map(Value::F32),
        ValueType::F64 => parse_token(tokens, offset, target).map(Value::F64),
        ValueType::Bool => parse_bool(token_at(tokens, offset)).map(Value::Bool),
        ValueType::Str => coerce_string(tokens, offset, multi_value).map(Value::Str),
        ValueType::Vec2 if multi_value => {
            let [x, y] = parse_floats(tokens, offset, target)?;
            Ok(Value::Vec2(Vec2::new(x, y)))
        }
        ValueType::Vec3 if multi_value => {
            let [x, y, z] = parse_floats(tokens, offset, target)?;
            Ok(Value::Vec3(Vec3::new(x, y, z)))
        }
        ValueType::Vec4 if multi_value => {
            let [x, y, z, w] = parse_floats(tokens, offset, target)?;
            Ok(Value::Vec4(Vec4::new(x, y, z, w)))
        }
        ValueType::Enum(info) => {
            let token = token_at(tokens, offset);
            info.constants
                .iter()
                .copied()
                .find(|constant| *constant == token)
                .map(Value::Enum)
                .ok_or_else(|| LevelError::UnknownEnumValue {
                    token: token.to_string(),
                    target,
                })
        }
        ValueType::Vec2 | ValueType::Vec3 | ValueType::Vec4 | ValueType::Opaque(_) => {
            Err(LevelError::UnsupportedType { target })
        }
    }
}

/// Coerce straight into a Rust type
pub fn coerce_as<T: Coercible>(tokens: &[&str], offset: usize, multi_value: bool) -> Result<T, LevelError> {
    let target = T::value_type();
    let value = coerce(target, tokens, offset, multi_value)?;
    T::from_value(value).ok_or(LevelError::UnsupportedType { target })
}

fn token_at<'a>(tokens: &[&'a str], offset: usize) -> &'a str {
    tokens.get(offset).copied().unwrap_or("")
}

fn parse_token<T: FromStr>(tokens: &[&str], offset: usize, target: ValueType) -> Result<T, LevelError> {
    let token = token_at(tokens, offset);
    token.parse::<T>().map_err(|_| LevelError::Format {
        token: token.to_string(),
        target,
    })
}

fn parse_floats<const N: usize>(tokens: &[&str], offset: usize, target: ValueType) -> Result<[f32; N], LevelError> {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = parse_token(tokens, offset + i, target)?;
    }
    Ok(out)
}

fn parse_bool(token: &str) -> Result<bool, LevelError> {
    if token.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(LevelError::Format {
            token: token.to_string(),
            target: ValueType::Bool,
        })
    }
}

fn coerce_string(tokens: &[&str], offset: usize, multi_value: bool) -> Result<String, LevelError> {
    let raw = if multi_value {
        tokens.get(offset..).unwrap_or_default().join(" ")
    } else {
        token_at(tokens, offset).to_string()
    };

    if !raw.starts_with('"') {
        return Ok(raw);
    }

    let malformed = || LevelError::Format {
        token: raw.clone(),
        target: ValueType::Str,
    };
    if raw.len() < 2 || !raw.ends_with('"') {
        return Err(malformed());
    }
    unescape(&raw[1..raw.len() - 1]).ok_or_else(malformed)
}

/// Resolve backslash escapes; `None` on an unknown or truncated escape
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            'e' => '\u{1B}',
            'x' => hex_char(&mut chars, 2)?,
            'u' => hex_char(&mut chars, 4)?,
            _ => return None,
        };
        out.push(escaped);
    }

    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}
