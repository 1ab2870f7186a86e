use crate::{
    ClauseKind, Record, Select, Value, to_comma_string, values_to_question_mark,
    write_query_clause,
};
use std::fmt::{self, Display};

/// SQL text together with the values to bind to its placeholders, in order.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct BoundSql {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BoundSql {
    pub fn new(sql: impl Into<String>, params: impl IntoIterator<Item = Value>) -> Self {
        Self {
            sql: sql.into(),
            params: params.into_iter().collect(),
        }
    }
}

impl Display for BoundSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Appends ` <clause>` when the map has entries.
fn write_clause(out: &mut String, map: &Record, kind: ClauseKind) {
    if !map.is_empty() {
        out.push(' ');
        write_query_clause(out, map, kind);
    }
}

/// Dialect aware writer of the statements issued by the query helper.
///
/// The default methods produce standard SQL with `?` placeholders and the MySQL
/// `ON DUPLICATE KEY UPDATE` upsert. Drivers override the fragments their backend
/// spells differently. Table and column names are written verbatim.
pub trait SqlWriter {
    fn write_table_ref(&self, out: &mut String, table: &str) {
        out.push_str(table);
    }

    fn write_column_list<'a>(&self, out: &mut String, columns: impl Iterator<Item = &'a str>) {
        out.push_str(&to_comma_string(columns));
    }

    fn write_select(&self, out: &mut String, select: &Select) {
        out.push_str("SELECT ");
        if select.distinct {
            out.push_str("DISTINCT ");
        }
        if select.columns.is_empty() {
            out.push('*');
        } else {
            self.write_column_list(out, select.columns.iter().map(String::as_str));
        }
        out.push_str(" FROM ");
        self.write_table_ref(out, &select.table);
        write_clause(out, &select.predicates, ClauseKind::Where);
        for (keyword, part) in [
            ("GROUP BY", &select.group_by),
            ("HAVING", &select.having),
            ("ORDER BY", &select.order_by),
            ("LIMIT", &select.limit),
        ] {
            if let Some(part) = part {
                out.push(' ');
                out.push_str(keyword);
                out.push(' ');
                out.push_str(part);
            }
        }
    }

    fn write_insert(&self, out: &mut String, table: &str, values: &Record) {
        out.push_str("INSERT INTO ");
        self.write_table_ref(out, table);
        out.push_str(" (");
        self.write_column_list(out, values.keys().map(String::as_str));
        out.push_str(") VALUES (");
        out.push_str(&to_comma_string(values_to_question_mark(values)));
        out.push(')');
    }

    /// Upsert tail following an INSERT, one placeholder per column of `values`.
    fn write_insert_update_fragment(&self, out: &mut String, values: &Record) {
        write_clause(out, values, ClauseKind::OnDuplicateKeyUpdate);
    }

    fn write_update(&self, out: &mut String, table: &str, values: &Record, predicates: &Record) {
        out.push_str("UPDATE ");
        self.write_table_ref(out, table);
        write_clause(out, values, ClauseKind::Set);
        write_clause(out, predicates, ClauseKind::Where);
    }

    fn write_delete(&self, out: &mut String, table: &str, predicates: &Record) {
        out.push_str("DELETE FROM ");
        self.write_table_ref(out, table);
        write_clause(out, predicates, ClauseKind::Where);
    }

    /// Binds the predicate values.
    fn build_select(&self, select: &Select) -> BoundSql {
        let mut sql = String::with_capacity(128);
        self.write_select(&mut sql, select);
        BoundSql::new(sql, select.predicates.values().cloned())
    }

    /// Binds the column values.
    fn build_insert(&self, table: &str, values: &Record) -> BoundSql {
        let mut sql = String::with_capacity(128);
        self.write_insert(&mut sql, table, values);
        BoundSql::new(sql, values.values().cloned())
    }

    /// Binds the column values, then the predicate values.
    fn build_update(&self, table: &str, values: &Record, predicates: &Record) -> BoundSql {
        let mut sql = String::with_capacity(128);
        self.write_update(&mut sql, table, values, predicates);
        BoundSql::new(sql, values.values().chain(predicates.values()).cloned())
    }

    /// Binds the predicate values.
    fn build_delete(&self, table: &str, predicates: &Record) -> BoundSql {
        let mut sql = String::with_capacity(64);
        self.write_delete(&mut sql, table, predicates);
        BoundSql::new(sql, predicates.values().cloned())
    }

    /// Binds the column values twice: once for the insertion and once for the update.
    fn build_insert_on_duplicate_update(&self, table: &str, values: &Record) -> BoundSql {
        let mut sql = String::with_capacity(192);
        self.write_insert(&mut sql, table, values);
        self.write_insert_update_fragment(&mut sql, values);
        BoundSql::new(sql, values.values().chain(values.values()).cloned())
    }
}

#[derive(Default, Clone, Copy)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}
impl SqlWriter for GenericSqlWriter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AsValue, record};

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    #[test]
    fn insert() {
        let bound = WRITER.build_insert("t", &record! { "name" => "a", "age" => 5 });
        assert_eq!(bound.sql, "INSERT INTO t (name,age) VALUES (?,?)");
        assert_eq!(bound.params, ["a".as_value(), 5.as_value()]);
    }

    #[test]
    fn update() {
        let bound = WRITER.build_update("t", &record! { "x" => 1 }, &record! { "id" => 7 });
        assert_eq!(bound.sql, "UPDATE t SET x = ? WHERE id = ?");
        assert_eq!(bound.params, [Value::Int64(1), Value::Int64(7)]);
    }

    #[test]
    fn update_without_predicates() {
        let bound = WRITER.build_update("t", &record! { "x" => 1, "y" => 2 }, &Record::new());
        assert_eq!(bound.sql, "UPDATE t SET x = ?, y = ?");
        assert_eq!(bound.params.len(), 2);
    }

    #[test]
    fn delete() {
        let bound = WRITER.build_delete("t", &record! { "id" => 7, "kind" => "old" });
        assert_eq!(bound.sql, "DELETE FROM t WHERE id = ? AND kind = ?");
        assert_eq!(bound.params, [7.as_value(), "old".as_value()]);
        assert_eq!(WRITER.build_delete("t", &Record::new()).sql, "DELETE FROM t");
    }

    #[test]
    fn upsert_binds_twice() {
        let bound = WRITER.build_insert_on_duplicate_update("t", &record! { "x" => 1 });
        assert_eq!(
            bound.sql,
            "INSERT INTO t (x) VALUES (?) ON DUPLICATE KEY UPDATE x = ?"
        );
        assert_eq!(bound.params, [Value::Int64(1), Value::Int64(1)]);
    }

    #[test]
    fn select_parts() {
        let bound = WRITER.build_select(&Select::new("t"));
        assert_eq!(bound.sql, "SELECT * FROM t");
        assert!(bound.params.is_empty());
        let bound = WRITER.build_select(
            &Select::new("orders")
                .columns(["customer", "SUM(total) AS total"])
                .predicates(record! { "status" => "paid", "year" => 2024 })
                .group_by("customer")
                .having("SUM(total) > 100")
                .order_by("total DESC")
                .limit("5, 10")
                .distinct(true),
        );
        assert_eq!(
            bound.sql,
            "SELECT DISTINCT customer,SUM(total) AS total FROM orders WHERE status = ? AND year = ? GROUP BY customer HAVING SUM(total) > 100 ORDER BY total DESC LIMIT 5, 10"
        );
        assert_eq!(bound.params, ["paid".as_value(), 2024.as_value()]);
    }
}
