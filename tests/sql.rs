#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rust_decimal::Decimal;
    use scoop::{
        AsValue, ClauseKind, GenericSqlWriter, Record, Select, SqlWriter, Value,
        create_query_clause, record, to_on_duplicate_update_clause, to_set_clause,
        to_where_clause, values_to_question_mark,
    };
    use scoop_mysql::MySQLSqlWriter;
    use scoop_sqlite::SqliteSqlWriter;
    use time::macros::date;
    use uuid::Uuid;

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    fn one_line(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn clauses() {
        let map = record! { "a" => 1, "b" => 2 };
        assert_eq!(to_where_clause(&map), "WHERE a = ? AND b = ?");
        assert_eq!(to_set_clause(&map), "SET a = ?, b = ?");
        assert_eq!(
            to_on_duplicate_update_clause(&map),
            "ON DUPLICATE KEY UPDATE a = ?, b = ?"
        );
        assert_eq!(create_query_clause(&Record::new(), ClauseKind::Where), "");
        assert_eq!(values_to_question_mark(&map), ["?", "?"]);
        assert_eq!(
            "on duplicate  key update".parse::<ClauseKind>().unwrap(),
            ClauseKind::OnDuplicateKeyUpdate
        );
        assert!("HAVING".parse::<ClauseKind>().is_err());
    }

    #[test]
    fn select_report() {
        let bound = WRITER.build_select(
            &Select::new("orders o JOIN customers c ON c.id = o.customer_id")
                .columns(["c.name", "COUNT(*) AS orders", "SUM(o.total) AS total"])
                .predicates(record! {
                    "o.status" => "paid",
                    "o.day" => date!(2024 - 03 - 01),
                })
                .group_by("c.name")
                .having("COUNT(*) > 2")
                .order_by("total DESC")
                .limit(10),
        );
        assert_eq!(
            bound.sql,
            one_line(indoc! {"
                SELECT c.name,COUNT(*) AS orders,SUM(o.total) AS total
                FROM orders o JOIN customers c ON c.id = o.customer_id
                WHERE o.status = ? AND o.day = ?
                GROUP BY c.name
                HAVING COUNT(*) > 2
                ORDER BY total DESC
                LIMIT 10
            "})
        );
        assert_eq!(
            bound.params,
            ["paid".as_value(), Value::Date(date!(2024 - 03 - 01))]
        );
    }

    #[test]
    fn insert_keeps_column_order() {
        let token = Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap();
        let values = record! {
            "token" => token,
            "price" => Decimal::new(1999, 2),
            "note" => None::<String>,
            "active" => true,
        };
        let bound = WRITER.build_insert("items", &values);
        assert_eq!(
            bound.sql,
            "INSERT INTO items (token,price,note,active) VALUES (?,?,?,?)"
        );
        assert_eq!(
            bound.params,
            [
                Value::Uuid(token),
                Value::Decimal(Decimal::new(1999, 2)),
                Value::Null,
                Value::Boolean(true),
            ]
        );
    }

    #[test]
    fn update_and_delete() {
        let bound = WRITER.build_update(
            "users",
            &record! { "name" => "ann", "age" => 32 },
            &record! { "id" => 1, "age" => 31 },
        );
        assert_eq!(
            bound.sql,
            "UPDATE users SET name = ?, age = ? WHERE id = ? AND age = ?"
        );
        assert_eq!(
            bound.params,
            [
                "ann".as_value(),
                32.as_value(),
                1.as_value(),
                31.as_value()
            ]
        );
        let bound = WRITER.build_delete("users", &record! { "id" => 1 });
        assert_eq!(bound.sql, "DELETE FROM users WHERE id = ?");
        assert_eq!(bound.params, [1.as_value()]);
    }

    #[test]
    fn upsert_per_dialect() {
        let values = record! { "name" => "volume", "level" => 3 };
        let mysql = MySQLSqlWriter {}.build_insert_on_duplicate_update("settings", &values);
        let sqlite = SqliteSqlWriter {}.build_insert_on_duplicate_update("settings", &values);
        assert_eq!(
            mysql.sql,
            one_line(indoc! {"
                INSERT INTO settings (name,level) VALUES (?,?)
                ON DUPLICATE KEY UPDATE name = ?, level = ?
            "})
        );
        assert_eq!(
            sqlite.sql,
            one_line(indoc! {"
                INSERT INTO settings (name,level) VALUES (?,?)
                ON CONFLICT DO UPDATE SET name = ?, level = ?
            "})
        );
        assert_eq!(mysql.params, sqlite.params);
        assert_eq!(mysql.params.len(), 4);
        assert_eq!(mysql.params[..2], mysql.params[2..]);
    }
}
