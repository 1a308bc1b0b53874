//! Scalar configuration values.
//!
//! Constructor parameters and properties that are not services are fed from
//! string maps (`name -> raw text`). Each such slot declares a [`ScalarKind`]
//! up front, and the raw text is parsed into a [`ScalarValue`] of that kind
//! when the instance is built.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::{IocError, IocResult};

/// The closed set of scalar kinds a parameter or property can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    U8,
    I16,
    I32,
    I64,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Char,
    DateTime,
    String,
}

impl ScalarKind {
    /// Parses `raw` as this kind using invariant formatting rules.
    ///
    /// Returns `None` when the text is not a valid value of the kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_ioc::{ScalarKind, ScalarValue};
    ///
    /// assert_eq!(ScalarKind::I32.parse(" 100 "), Some(ScalarValue::I32(100)));
    /// assert_eq!(ScalarKind::Bool.parse("True"), Some(ScalarValue::Bool(true)));
    /// assert_eq!(ScalarKind::Char.parse(""), Some(ScalarValue::Char('\0')));
    /// assert_eq!(ScalarKind::U8.parse("300"), None);
    /// ```
    pub fn parse(self, raw: &str) -> Option<ScalarValue> {
        let trimmed = raw.trim();
        let value = match self {
            ScalarKind::Bool => ScalarValue::Bool(parse_bool(trimmed)?),
            ScalarKind::U8 => ScalarValue::U8(trimmed.parse().ok()?),
            ScalarKind::I16 => ScalarValue::I16(trimmed.parse().ok()?),
            ScalarKind::I32 => ScalarValue::I32(trimmed.parse().ok()?),
            ScalarKind::I64 => ScalarValue::I64(trimmed.parse().ok()?),
            ScalarKind::U16 => ScalarValue::U16(trimmed.parse().ok()?),
            ScalarKind::U32 => ScalarValue::U32(trimmed.parse().ok()?),
            ScalarKind::U64 => ScalarValue::U64(trimmed.parse().ok()?),
            ScalarKind::F32 => ScalarValue::F32(trimmed.parse().ok()?),
            ScalarKind::F64 => ScalarValue::F64(trimmed.parse().ok()?),
            ScalarKind::Decimal => ScalarValue::Decimal(Decimal::from_str(trimmed).ok()?),
            ScalarKind::Char => ScalarValue::Char(raw.chars().next().unwrap_or('\0')),
            ScalarKind::DateTime => ScalarValue::DateTime(parse_date_time(trimmed)?),
            ScalarKind::String => ScalarValue::String(raw.to_string()),
        };
        Some(value)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::U8 => "u8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Char => "char",
            ScalarKind::DateTime => "date/time",
            ScalarKind::String => "string",
        };
        f.write_str(name)
    }
}

/// A parsed scalar, one variant per [`ScalarKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    U8(u8),
    I16(i16),
    I32(i32),
    I64(i64),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Char(char),
    DateTime(NaiveDateTime),
    String(String),
}

impl ScalarValue {
    /// The kind of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Bool(_) => ScalarKind::Bool,
            ScalarValue::U8(_) => ScalarKind::U8,
            ScalarValue::I16(_) => ScalarKind::I16,
            ScalarValue::I32(_) => ScalarKind::I32,
            ScalarValue::I64(_) => ScalarKind::I64,
            ScalarValue::U16(_) => ScalarKind::U16,
            ScalarValue::U32(_) => ScalarKind::U32,
            ScalarValue::U64(_) => ScalarKind::U64,
            ScalarValue::F32(_) => ScalarKind::F32,
            ScalarValue::F64(_) => ScalarKind::F64,
            ScalarValue::Decimal(_) => ScalarKind::Decimal,
            ScalarValue::Char(_) => ScalarKind::Char,
            ScalarValue::DateTime(_) => ScalarKind::DateTime,
            ScalarValue::String(_) => ScalarKind::String,
        }
    }
}

/// Rust types that can be fed from scalar configuration.
///
/// Ties a type to its [`ScalarKind`] so descriptors can declare parameters
/// and properties with `Parameter::scalar::<i32>("x")` instead of spelling
/// the kind out.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Scalar, ScalarKind, ScalarValue};
///
/// assert_eq!(<u16 as Scalar>::KIND, ScalarKind::U16);
/// assert_eq!(u16::from_scalar(ScalarValue::U16(8080)), Some(8080));
/// assert_eq!(u16::from_scalar(ScalarValue::I32(8080)), None);
/// ```
pub trait Scalar: Sized + Send + Sync + 'static {
    /// Kind parsed for slots of this type.
    const KIND: ScalarKind;

    /// Extracts the value when `value` has this type's kind.
    fn from_scalar(value: ScalarValue) -> Option<Self>;

    /// Wraps the value.
    fn into_scalar(self) -> ScalarValue;
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn from_scalar(value: ScalarValue) -> Option<Self> {
                    match value {
                        ScalarValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn into_scalar(self) -> ScalarValue {
                    ScalarValue::$variant(self)
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool,
    u8 => U8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    char => Char,
    NaiveDateTime => DateTime,
    String => String,
}

/// Parses a configured value, naming the slot in the error.
pub(crate) fn parse_named(kind: ScalarKind, name: &str, raw: &str) -> IocResult<ScalarValue> {
    kind.parse(raw).ok_or_else(|| IocError::InvalidScalar {
        name: name.to_string(),
        kind,
        value: raw.to_string(),
    })
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
