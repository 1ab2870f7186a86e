use crate::{Connection, Prepared, SqlWriter};

pub trait Driver: Send + Sync + Sized {
    type Connection: Connection<Driver = Self>;
    type SqlWriter: SqlWriter;
    type Prepared: Prepared;

    /// Scheme of the connection url, matched against the descriptor driver name.
    const NAME: &'static str;
    fn sql_writer(&self) -> Self::SqlWriter;
}
