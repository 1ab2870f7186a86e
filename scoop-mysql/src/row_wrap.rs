use crate::{ValueWrap, column_value};
use mysql_async::FromRowError;
use scoop_core::{Row, RowLabeled, RowNames};

pub(crate) struct RowWrap(pub(crate) RowLabeled);

impl mysql_async::prelude::FromRow for RowWrap {
    fn from_row_opt(mut row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let columns = row.columns();
        let names: RowNames = columns.iter().map(|v| v.name_str().into_owned()).collect();
        let mut values = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value = match row.take_opt::<ValueWrap, _>(i) {
                Some(Ok(v)) => v.0,
                None => Default::default(),
                Some(Err(e)) => {
                    log::error!(
                        "Could not decode the value {:?} of column `{}`",
                        e.0,
                        column.name_str()
                    );
                    return Err(FromRowError(row));
                }
            };
            values.push(column_value(value, column));
        }
        Ok(RowWrap(RowLabeled::new(names, Row::from(values))))
    }
}
