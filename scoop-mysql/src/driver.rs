use crate::{MySQLConnection, MySQLPrepared, MySQLSqlWriter};
use scoop_core::Driver;

#[derive(Default, Debug, Clone, Copy)]
pub struct MySQLDriver {}

impl MySQLDriver {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Driver for MySQLDriver {
    type Connection = MySQLConnection;
    type SqlWriter = MySQLSqlWriter;
    type Prepared = MySQLPrepared;

    const NAME: &'static str = "mysql";
    fn sql_writer(&self) -> MySQLSqlWriter {
        MySQLSqlWriter {}
    }
}
