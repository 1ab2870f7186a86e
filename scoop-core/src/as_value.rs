use crate::{Error, Result, Value, truncate_long};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{any, borrow::Cow};
use time::{Date, PrimitiveDateTime, Time, macros::format_description};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`] used for
/// query parameters and fetched cells.
///
/// # Conversion contract
/// - `as_value` never fails and never loses information, apart from widening narrow
///   integers and `f32`.
/// - `try_from_value` accepts the canonical variant for the type and the variants a
///   driver may reasonably return for it (an integer column comes back as `UInt64`
///   from MySQL, a date column comes back as `Varchar` from SQLite). Range checks
///   always happen, the error message names the offending value and the target type.
///
/// # Examples
/// ```rust
/// use scoop_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Int64(42));
/// let n: i32 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Convert this value into its owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

fn mismatch<T>(value: &Value) -> Error {
    let text = value.to_string();
    Error::msg(format!(
        "Cannot convert {} value `{}` into {}",
        value.type_name(),
        truncate_long!(text),
        any::type_name::<T>()
    ))
}

impl AsValue for bool {
    fn as_value(self) -> Value {
        Value::Boolean(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(v) => Ok(v),
            Value::Int64(v) => Ok(v != 0),
            Value::UInt64(v) => Ok(v != 0),
            Value::Varchar(ref v) => match v.as_str() {
                "1" | "true" | "TRUE" => Ok(true),
                "0" | "false" | "FALSE" => Ok(false),
                _ => Err(mismatch::<Self>(&value)),
            },
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

macro_rules! impl_as_value_integer {
    ($variant:ident => $($ty:ty),+) => {
        $(
            impl AsValue for $ty {
                fn as_value(self) -> Value {
                    Value::$variant(self as _)
                }
                fn try_from_value(value: Value) -> Result<Self> {
                    let result = match &value {
                        Value::Int64(v) => <$ty>::try_from(*v).ok(),
                        Value::UInt64(v) => <$ty>::try_from(*v).ok(),
                        Value::Boolean(v) => Some(*v as _),
                        Value::Decimal(v) if v.fract().is_zero() => v.to_i128().and_then(|v| <$ty>::try_from(v).ok()),
                        Value::Float64(v) if v.fract() == 0.0 => <$ty>::from_f64(*v),
                        Value::Varchar(v) => v.trim().parse::<$ty>().ok(),
                        _ => None,
                    };
                    result.ok_or_else(|| mismatch::<Self>(&value))
                }
            }
        )+
    };
}

impl_as_value_integer!(Int64 => i8, i16, i32, i64, isize, u8, u16, u32);
impl_as_value_integer!(UInt64 => u64, usize);

impl AsValue for f64 {
    fn as_value(self) -> Value {
        Value::Float64(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let result = match &value {
            Value::Float64(v) => Some(*v),
            Value::Int64(v) => Some(*v as f64),
            Value::UInt64(v) => Some(*v as f64),
            Value::Decimal(v) => v.to_f64(),
            Value::Varchar(v) => v.trim().parse().ok(),
            _ => None,
        };
        result.ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl AsValue for f32 {
    fn as_value(self) -> Value {
        Value::Float64(self as f64)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        f64::try_from_value(value).map(|v| v as f32)
    }
}

impl AsValue for Decimal {
    fn as_value(self) -> Value {
        Value::Decimal(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let result = match &value {
            Value::Decimal(v) => Some(*v),
            Value::Int64(v) => Some(Decimal::from(*v)),
            Value::UInt64(v) => Some(Decimal::from(*v)),
            Value::Float64(v) => Decimal::from_f64(*v),
            Value::Varchar(v) => v.trim().parse().ok(),
            _ => None,
        };
        result.ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl AsValue for String {
    fn as_value(self) -> Value {
        Value::Varchar(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(v) => Ok(v),
            Value::Blob(v) => String::from_utf8(v.into_vec()).map_err(|e| {
                Error::new(e).context("Cannot convert a Blob value into String")
            }),
            _ => match value.as_text() {
                Some(v) => Ok(v.into_owned()),
                None => Err(mismatch::<Self>(&value)),
            },
        }
    }
}

impl AsValue for &str {
    fn as_value(self) -> Value {
        Value::Varchar(self.into())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(mismatch::<Self>(&value).context("Use String to read text values"))
    }
}

impl AsValue for Cow<'_, str> {
    fn as_value(self) -> Value {
        Value::Varchar(self.into_owned())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Vec<u8> {
    fn as_value(self) -> Value {
        Value::Blob(self.into())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v.into_vec()),
            Value::Varchar(v) => Ok(v.into_bytes()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for &[u8] {
    fn as_value(self) -> Value {
        Value::Blob(self.into())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(mismatch::<Self>(&value).context("Use Vec<u8> to read binary values"))
    }
}

impl AsValue for Uuid {
    fn as_value(self) -> Value {
        Value::Uuid(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let result = match &value {
            Value::Uuid(v) => Some(*v),
            Value::Varchar(v) => Uuid::parse_str(v).ok(),
            Value::Blob(v) => Uuid::from_slice(v).ok(),
            _ => None,
        };
        result.ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl AsValue for Date {
    fn as_value(self) -> Value {
        Value::Date(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let format = format_description!("[year]-[month]-[day]");
        let result = match &value {
            Value::Date(v) => Some(*v),
            Value::Timestamp(v) => Some(v.date()),
            Value::Varchar(v) => Date::parse(v, &format).ok(),
            _ => None,
        };
        result.ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl AsValue for Time {
    fn as_value(self) -> Value {
        Value::Time(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let format = format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]");
        let result = match &value {
            Value::Time(v) => Some(*v),
            Value::Timestamp(v) => Some(v.time()),
            Value::Varchar(v) => Time::parse(v, &format).ok(),
            _ => None,
        };
        result.ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_value(self) -> Value {
        Value::Timestamp(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let format = format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
        );
        let result = match &value {
            Value::Timestamp(v) => Some(*v),
            Value::Date(v) => Some(v.midnight()),
            Value::Varchar(v) => PrimitiveDateTime::parse(v, &format).ok(),
            _ => None,
        };
        result.ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

impl Value {
    /// Plain text rendering used by drivers that store non native types as text.
    ///
    /// Returns `None` for `Null`, `Blob` and the numeric variants.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Varchar(v) => Some(Cow::Borrowed(v)),
            Value::Decimal(v) => Some(Cow::Owned(v.to_string())),
            Value::Uuid(v) => Some(Cow::Owned(v.to_string())),
            Value::Date(v) => v
                .format(&format_description!("[year]-[month]-[day]"))
                .ok()
                .map(Cow::Owned),
            Value::Time(v) => v
                .format(&format_description!("[hour]:[minute]:[second].[subsecond]"))
                .ok()
                .map(Cow::Owned),
            Value::Timestamp(v) => v
                .format(&format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"
                ))
                .ok()
                .map(Cow::Owned),
            _ => None,
        }
    }
}
