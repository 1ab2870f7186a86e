use scoop::{AsValue, Driver, QueryHelper, Value};

pub async fn lifecycle<D: Driver>(helper: &mut QueryHelper<D>) {
    helper
        .connect()
        .await
        .expect("Failed to connect");
    assert!(helper.is_connected());

    helper
        .query("SELECT ? AS answer", [42.as_value()])
        .await
        .expect("Failed to run the query");
    helper
        .disconnect()
        .await
        .expect("Failed to disconnect");
    assert!(!helper.is_connected());

    // The executed statement does not depend on the connection
    assert_eq!(helper.query_string(), Some("SELECT ? AS answer"));
    let row = helper.fetch_assoc().expect("Missing the answer row");
    assert_eq!(i64::try_from_value(row["answer"].clone()).unwrap(), 42);

    // Any call reconnects
    let value = helper
        .exec("SELECT 1")
        .await
        .expect("Failed to reconnect")
        .fetch_value();
    assert!(helper.is_connected());
    assert_eq!(
        value.map(i64::try_from_value).transpose().unwrap(),
        Some(1)
    );

    let statement = helper.take_statement().expect("Missing the statement");
    assert_eq!(statement.query_string(), "SELECT 1");
    assert_eq!(helper.query_string(), None);
    assert_eq!(helper.fetch_value(), None::<Value>);
}
