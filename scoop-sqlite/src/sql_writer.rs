use scoop_core::{Record, SqlWriter, to_set_clause};

/// SQLite spelling of the statements, only the upsert differs from the generic writer.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter {}

impl SqlWriter for SqliteSqlWriter {
    /// SQLite has no `ON DUPLICATE KEY UPDATE`, the conflicting row is updated through
    /// `ON CONFLICT DO UPDATE SET`, binding the same values in the same order.
    fn write_insert_update_fragment(&self, out: &mut String, values: &Record) {
        if values.is_empty() {
            return;
        }
        out.push_str(" ON CONFLICT DO UPDATE ");
        out.push_str(&to_set_clause(values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoop_core::{Value, record};

    #[test]
    fn upsert_on_conflict() {
        let bound = SqliteSqlWriter {}
            .build_insert_on_duplicate_update("kv", &record! { "k" => "a", "v" => 1 });
        assert_eq!(
            bound.sql,
            "INSERT INTO kv (k,v) VALUES (?,?) ON CONFLICT DO UPDATE SET k = ?, v = ?"
        );
        assert_eq!(
            bound.params,
            [
                Value::from("a"),
                Value::Int64(1),
                Value::from("a"),
                Value::Int64(1)
            ]
        );
    }
}
