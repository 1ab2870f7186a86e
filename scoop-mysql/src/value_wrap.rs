use mysql_async::{
    Column,
    consts::{ColumnFlags, ColumnType},
};
use scoop_core::{Error, Value};
use time::{Date, Month, PrimitiveDateTime, Time};

type MySQLValue = mysql_async::Value;

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl mysql_async::prelude::FromValue for ValueWrap {
    type Intermediate = ValueWrap;
}

impl TryFrom<MySQLValue> for ValueWrap {
    type Error = mysql_async::FromValueError;

    fn try_from(value: MySQLValue) -> Result<Self, Self::Error> {
        Ok(match value {
            MySQLValue::NULL => Value::Null,
            MySQLValue::Bytes(v) => match String::from_utf8(v) {
                Ok(v) => Value::Varchar(v),
                Err(e) => Value::Blob(e.into_bytes().into()),
            },
            MySQLValue::Int(v) => Value::Int64(v),
            MySQLValue::UInt(v) => Value::UInt64(v),
            MySQLValue::Float(v) => Value::Float64(v as f64),
            MySQLValue::Double(v) => Value::Float64(v),
            MySQLValue::Date(year, month, day, hour, minute, second, micro) => {
                let date = Month::try_from(month)
                    .ok()
                    .and_then(|month| Date::from_calendar_date(year as i32, month, day).ok());
                let time = Time::from_hms_micro(hour, minute, second, micro).ok();
                let (Some(date), Some(time)) = (date, time) else {
                    return Err(mysql_async::FromValueError(value));
                };
                Value::Timestamp(PrimitiveDateTime::new(date, time))
            }
            MySQLValue::Time(negative, days, hours, minutes, seconds, micro) => {
                if !negative && days == 0 {
                    match Time::from_hms_micro(hours, minutes, seconds, micro) {
                        Ok(v) => Value::Time(v),
                        Err(..) => return Err(mysql_async::FromValueError(value)),
                    }
                } else {
                    // Outside the time of day, kept as the text MySQL would print
                    Value::Varchar(format!(
                        "{}{}:{:02}:{:02}.{:06}",
                        if negative { "-" } else { "" },
                        days * 24 + hours as u32,
                        minutes,
                        seconds,
                        micro
                    ))
                }
            }
        }
        .into())
    }
}

impl TryFrom<ValueWrap> for MySQLValue {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        Ok(match value.0 {
            Value::Null => MySQLValue::NULL,
            Value::Boolean(v) => MySQLValue::Int(v as i64),
            Value::Int64(v) => MySQLValue::Int(v),
            Value::UInt64(v) => MySQLValue::UInt(v),
            Value::Float64(v) => MySQLValue::Double(v),
            Value::Decimal(v) => MySQLValue::from(v),
            Value::Varchar(v) => MySQLValue::Bytes(v.into_bytes()),
            Value::Blob(v) => MySQLValue::Bytes(v.into_vec()),
            Value::Date(v) => MySQLValue::Date(
                u16::try_from(v.year()).map_err(|_| {
                    Error::msg(format!("Date `{}` is outside the range supported by MySQL", v))
                })?,
                v.month() as u8,
                v.day(),
                0,
                0,
                0,
                0,
            ),
            Value::Time(v) => MySQLValue::Time(
                false,
                0,
                v.hour(),
                v.minute(),
                v.second(),
                v.microsecond(),
            ),
            Value::Timestamp(v) => MySQLValue::Date(
                u16::try_from(v.year()).map_err(|_| {
                    Error::msg(format!(
                        "Timestamp `{}` is outside the range supported by MySQL",
                        v
                    ))
                })?,
                v.month() as u8,
                v.day(),
                v.hour(),
                v.minute(),
                v.second(),
                v.microsecond(),
            ),
            Value::Uuid(v) => MySQLValue::Bytes(v.to_string().into_bytes()),
        })
    }
}

fn is_integer(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::MYSQL_TYPE_TINY
            | ColumnType::MYSQL_TYPE_SHORT
            | ColumnType::MYSQL_TYPE_INT24
            | ColumnType::MYSQL_TYPE_LONG
            | ColumnType::MYSQL_TYPE_LONGLONG
            | ColumnType::MYSQL_TYPE_YEAR
    )
}

/// Refine a decoded value with the column metadata.
///
/// The text protocol sends every value as bytes, numbers are parsed back here.
/// DATE columns come back as midnight timestamps and become dates.
pub(crate) fn column_value(value: Value, column: &Column) -> Value {
    let column_type = column.column_type();
    match value {
        Value::Timestamp(v)
            if matches!(
                column_type,
                ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE
            ) =>
        {
            Value::Date(v.date())
        }
        Value::Varchar(v) if is_integer(column_type) => {
            let parsed = if column.flags().contains(ColumnFlags::UNSIGNED_FLAG) {
                v.parse::<u64>().ok().map(Value::UInt64)
            } else {
                v.parse::<i64>().ok().map(Value::Int64)
            };
            parsed.unwrap_or(Value::Varchar(v))
        }
        Value::Varchar(v)
            if matches!(
                column_type,
                ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE
            ) =>
        {
            v.parse::<f64>()
                .map(Value::Float64)
                .unwrap_or(Value::Varchar(v))
        }
        value => value,
    }
}
