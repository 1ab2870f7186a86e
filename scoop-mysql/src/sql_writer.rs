use scoop_core::SqlWriter;

/// MySQL dialect, the upsert tail is `ON DUPLICATE KEY UPDATE`.
#[derive(Default, Debug, Clone, Copy)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {}

#[cfg(test)]
mod tests {
    use super::MySQLSqlWriter;
    use scoop_core::{SqlWriter, Value, record};

    #[test]
    fn upsert_on_duplicate_key() {
        let bound = MySQLSqlWriter {}.build_insert_on_duplicate_update(
            "settings",
            &record! { "name" => "volume", "level" => 7 },
        );
        assert_eq!(
            bound.sql,
            "INSERT INTO settings (name,level) VALUES (?,?) ON DUPLICATE KEY UPDATE name = ?, level = ?"
        );
        assert_eq!(
            bound.params,
            [
                Value::from("volume"),
                Value::Int64(7),
                Value::from("volume"),
                Value::Int64(7)
            ]
        );
    }
}
