#[cfg(test)]
mod tests {
    use scoop_core::{ConnectionDescriptor, QueryHelper, record};
    use scoop_sqlite::SqliteDriver;
    use scoop_tests::{execute_tests, init_logs};
    use std::{path::Path, sync::Mutex};
    use tokio::fs;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn sqlite() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/tests.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH).await.expect(
                format!("Failed to remove existing test database file {}", DB_PATH).as_str(),
            );
        }
        let mut helper = QueryHelper::<SqliteDriver>::new(ConnectionDescriptor::new(
            "sqlite", "", DB_PATH, "", "",
        ));
        execute_tests(&mut helper).await;
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
    }

    #[tokio::test]
    async fn rows_affected() {
        init_logs();
        let mut helper = QueryHelper::<SqliteDriver>::new(ConnectionDescriptor::new(
            "sqlite", "", ":memory:", "", "",
        ));
        helper
            .exec("CREATE TABLE kv (k VARCHAR(8) PRIMARY KEY, v INTEGER)")
            .await
            .expect("Failed to create the table");
        assert_eq!(helper.rows_affected(), 0);
        assert_eq!(helper.last_insert_id(), None);
        helper
            .exec("INSERT INTO kv VALUES ('a', 1); INSERT INTO kv VALUES ('b', 2), ('c', 3);")
            .await
            .expect("Failed to insert");
        assert_eq!(helper.rows_affected(), 3);
        assert_eq!(helper.last_insert_id(), Some(3));
        helper
            .insert_on_duplicate_update("kv", &record! { "k" => "a", "v" => 10 })
            .await
            .expect("Failed to upsert");
        assert_eq!(helper.rows_affected(), 1);
        let affected = helper
            .update("kv", &record! { "v" => 0 }, &record! {})
            .await
            .expect("Failed to update every row");
        assert_eq!(affected, 3);
    }

    #[tokio::test]
    async fn last_insert_id() {
        init_logs();
        let mut helper = QueryHelper::<SqliteDriver>::new(ConnectionDescriptor::new(
            "sqlite", "", ":memory:", "", "",
        ));
        helper
            .exec(
                "CREATE TABLE kv (k VARCHAR(8) PRIMARY KEY, v INTEGER);
                CREATE TABLE other (id INTEGER PRIMARY KEY, x INTEGER);",
            )
            .await
            .expect("Failed to create the tables");
        let a = helper
            .insert("kv", &record! { "k" => "a", "v" => 1 })
            .await
            .expect("Failed to insert a");
        assert_eq!(a, Some(1));
        for x in 0..5 {
            helper
                .insert("other", &record! { "x" => x })
                .await
                .expect("Failed to insert into other");
        }
        assert_eq!(helper.last_insert_id(), Some(5));

        // Conflict on `a`, nothing is inserted
        let updated = helper
            .insert_on_duplicate_update("kv", &record! { "k" => "a", "v" => 2 })
            .await
            .expect("Failed to upsert a");
        assert_eq!(updated, None);
        assert_eq!(helper.rows_affected(), 1);
        let inserted = helper
            .insert_on_duplicate_update("kv", &record! { "k" => "b", "v" => 3 })
            .await
            .expect("Failed to upsert b");
        assert_eq!(inserted, Some(2));

        helper
            .exec("-- seeded by hand\nINSERT INTO kv VALUES ('c', 4)")
            .await
            .expect("Failed to insert after a comment");
        assert_eq!(helper.last_insert_id(), Some(3));
        helper
            .exec("WITH src(k, v) AS (SELECT 'd', 5) INSERT INTO kv SELECT k, v FROM src")
            .await
            .expect("Failed to insert from a common table expression");
        assert_eq!(helper.last_insert_id(), Some(4));

        let affected = helper
            .update("kv", &record! { "v" => 0 }, &record! { "k" => "d" })
            .await
            .expect("Failed to update d");
        assert_eq!(affected, 1);
        assert_eq!(helper.last_insert_id(), None);

        let value = helper
            .query("SELECT COUNT(*) FROM kv; -- every key", [])
            .await
            .expect("A trailing comment is not a second statement")
            .fetch_value();
        assert_eq!(value.and_then(|v| v.as_i64()), Some(4));
    }
}
