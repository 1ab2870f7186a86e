use crate::{CBox, error_message_from_ptr};
use libsqlite3_sys::*;
use rust_decimal::prelude::ToPrimitive;
use scoop_core::{Error, Prepared, Result, Value, truncate_long};
use std::{
    ffi::{CStr, c_int},
    fmt::{self, Display},
    os::raw::{c_char, c_void},
};

pub struct SqlitePrepared {
    pub(crate) statement: CBox<*mut sqlite3_stmt>,
    /// Next parameter to bind by `bind`, from 0.
    pub(crate) index: u64,
}

impl SqlitePrepared {
    pub(crate) fn new(prepared: CBox<*mut sqlite3_stmt>) -> Self {
        unsafe {
            sqlite3_clear_bindings(*prepared);
        }
        Self {
            statement: prepared,
            index: 0,
        }
    }

    /// Number of `?` parameters declared by the statement.
    pub fn parameter_count(&self) -> u64 {
        unsafe { sqlite3_bind_parameter_count(*self.statement) as u64 }
    }

    fn sql(&self) -> String {
        unsafe {
            let sql = sqlite3_sql(*self.statement);
            if sql.is_null() {
                return String::new();
            }
            CStr::from_ptr(sql).to_string_lossy().into_owned()
        }
    }

    fn bind_text(&self, index: c_int, text: &str) -> c_int {
        unsafe {
            sqlite3_bind_text(
                *self.statement,
                index,
                text.as_ptr() as *const c_char,
                text.len() as c_int,
                SQLITE_TRANSIENT(),
            )
        }
    }
}

impl Prepared for SqlitePrepared {
    fn bind(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        self.bind_index(value, self.index)
    }

    fn bind_index(&mut self, value: impl Into<Value>, index: u64) -> Result<&mut Self> {
        let count = self.parameter_count();
        if index >= count {
            let sql = self.sql();
            let error = Error::msg(format!(
                "Cannot bind parameter {}, the query declares {} parameters:\n{}",
                index,
                count,
                truncate_long!(sql)
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        let value = value.into();
        let position = index as c_int + 1;
        let rc = unsafe {
            match &value {
                Value::Null => sqlite3_bind_null(*self.statement, position),
                Value::Boolean(v) => sqlite3_bind_int(*self.statement, position, *v as c_int),
                Value::Int64(v) => sqlite3_bind_int64(*self.statement, position, *v),
                Value::UInt64(v) => {
                    let Ok(v) = sqlite3_int64::try_from(*v) else {
                        let error = Error::msg(format!(
                            "Cannot bind u64 value `{}` into a sqlite integer because it's out of bounds",
                            v
                        ));
                        log::error!("{:#}", error);
                        return Err(error);
                    };
                    sqlite3_bind_int64(*self.statement, position, v)
                }
                Value::Float64(v) => sqlite3_bind_double(*self.statement, position, *v),
                Value::Decimal(v) => sqlite3_bind_double(
                    *self.statement,
                    position,
                    v.to_f64().ok_or_else(|| {
                        Error::msg(format!("Cannot convert the Decimal value `{}` to f64", v))
                    })?,
                ),
                Value::Varchar(v) => self.bind_text(position, v),
                Value::Blob(v) => sqlite3_bind_blob(
                    *self.statement,
                    position,
                    v.as_ptr() as *const c_void,
                    v.len() as c_int,
                    SQLITE_TRANSIENT(),
                ),
                Value::Date(..) | Value::Time(..) | Value::Timestamp(..) | Value::Uuid(..) => {
                    let Some(text) = value.as_text() else {
                        let error = Error::msg(format!(
                            "Cannot render the {} value `{}` as text",
                            value.type_name(),
                            value
                        ));
                        log::error!("{:#}", error);
                        return Err(error);
                    };
                    self.bind_text(position, &text)
                }
            }
        };
        if rc != SQLITE_OK {
            let message = unsafe {
                error_message_from_ptr(&sqlite3_errmsg(sqlite3_db_handle(*self.statement)))
                    .to_string()
            };
            let sql = self.sql();
            let error = Error::msg(message).context(format!(
                "Cannot bind parameter {} to query:\n{}",
                index,
                truncate_long!(sql)
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        self.index = index + 1;
        Ok(self)
    }
}

impl Display for SqlitePrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sql = self.sql();
        write!(f, "{}", truncate_long!(sql))
    }
}
