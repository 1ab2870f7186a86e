use crate::ValueWrap;
use mysql_async::{Params, Statement};
use scoop_core::{Error, Prepared, Result, Value, truncate_long};
use std::{
    fmt::{self, Display},
    mem,
};

#[derive(Debug)]
pub struct MySQLPrepared {
    pub(crate) statement: Statement,
    pub(crate) sql: String,
    pub(crate) params: Vec<Value>,
    pub(crate) index: u64,
}

impl MySQLPrepared {
    pub(crate) fn new(statement: Statement, sql: String) -> Self {
        Self {
            statement,
            sql,
            params: Vec::new(),
            index: 0,
        }
    }

    /// Number of `?` parameters declared by the statement.
    pub fn parameter_count(&self) -> u64 {
        self.statement.num_params() as u64
    }

    /// Bound values in the wire format, parameters never bound are sent as NULL.
    pub(crate) fn take_params(&mut self) -> Result<Params> {
        let mut params = mem::take(&mut self.params);
        self.index = 0;
        if params.is_empty() && self.parameter_count() == 0 {
            return Ok(Params::Empty);
        }
        params.resize_with(self.parameter_count() as usize, Default::default);
        Ok(Params::Positional(
            params
                .into_iter()
                .map(|v| ValueWrap(v).try_into())
                .collect::<Result<_>>()?,
        ))
    }
}

impl Prepared for MySQLPrepared {
    fn bind(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        self.bind_index(value, self.index)
    }

    fn bind_index(&mut self, value: impl Into<Value>, index: u64) -> Result<&mut Self> {
        let count = self.parameter_count();
        if index >= count {
            let error = Error::msg(format!(
                "Cannot bind parameter {}, the query declares {} parameters:\n{}",
                index,
                count,
                truncate_long!(self.sql)
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        if self.params.len() < count as usize {
            self.params.resize_with(count as usize, Default::default);
        }
        self.params[index as usize] = value.into();
        self.index = index + 1;
        Ok(self)
    }
}

impl Display for MySQLPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
