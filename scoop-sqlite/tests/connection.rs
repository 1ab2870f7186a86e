#[cfg(test)]
mod tests {
    use scoop_core::{
        Connection, ConnectionDescriptor, Executor, Prepared, Query, stream::TryStreamExt,
    };
    use scoop_sqlite::SqliteConnection;
    use scoop_tests::{init_logs, silent_logs};
    use std::{path::Path, sync::Mutex};
    use tokio::fs;

    static MUTEX: Mutex<()> = Mutex::new(());

    fn descriptor(database: &str) -> ConnectionDescriptor {
        ConnectionDescriptor::new("sqlite", "", database, "", "")
    }

    #[tokio::test]
    async fn create_database() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .await
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        SqliteConnection::connect(&descriptor(DB_PATH))
            .await
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        let read_only = format!("file:{}?mode=ro", DB_PATH);
        SqliteConnection::connect(&descriptor(&read_only))
            .await
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .await
            .expect(format!("Failed to remove existing test database file {}", DB_PATH).as_str());
        silent_logs! {
            assert!(
                SqliteConnection::connect(&descriptor(&read_only))
                    .await
                    .is_err(),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[tokio::test]
    async fn wrong_driver() {
        silent_logs! {
            assert!(
                SqliteConnection::connect(&ConnectionDescriptor::new(
                    "mysql", "localhost", "db", "user", "pw"
                ))
                .await
                .is_err()
            );
        };
    }

    #[tokio::test]
    async fn prepare_single_statement() {
        init_logs();
        let mut connection = SqliteConnection::connect(&descriptor(":memory:"))
            .await
            .expect("Could not open the database");
        let Query::Prepared(mut prepared) = connection
            .prepare("SELECT ? + ?".to_string())
            .await
            .expect("Could not prepare the query")
        else {
            panic!("Expected a prepared query");
        };
        assert_eq!(prepared.parameter_count(), 2);
        silent_logs! {
            assert!(prepared.bind_index(1, 2).is_err());
        }
        prepared.bind(20).unwrap().bind(22).unwrap();
        let rows = connection
            .fetch(Query::Prepared(prepared))
            .try_collect::<Vec<_>>()
            .await
            .expect("Could not run the query");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values[0].as_i64(), Some(42));

        silent_logs! {
            assert!(connection.prepare("SELECT 1; SELECT 2".to_string()).await.is_err());
            assert!(connection.prepare("SELECT 1; ; -- note".to_string()).await.is_ok());
            assert!(connection.prepare("  ".to_string()).await.is_err());
            assert!(connection.prepare("SELEC 1".to_string()).await.is_err());
        }
    }
}
