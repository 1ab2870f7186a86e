use scoop::{AsValue, Driver, QueryHelper};

pub async fn multiple<D: Driver>(helper: &mut QueryHelper<D>) {
    helper
        .exec(
            "
            DROP TABLE IF EXISTS scoop_multiple;
            CREATE TABLE scoop_multiple (a INTEGER, b VARCHAR(16));
            INSERT INTO scoop_multiple (a, b) VALUES (1, 'one');
            INSERT INTO scoop_multiple (a, b) VALUES (2, 'two');
            INSERT INTO scoop_multiple (a, b) VALUES (3, 'three');
            ",
        )
        .await
        .expect("Failed to run multiple statements");
    let count = helper
        .query("SELECT COUNT(*) FROM scoop_multiple", [])
        .await
        .expect("Failed to count the rows")
        .fetch_value_as::<i64>()
        .expect("The count is not an integer");
    assert_eq!(count, Some(3));

    let rows = helper
        .exec(
            "UPDATE scoop_multiple SET b = 'many' WHERE a > 1; SELECT b FROM scoop_multiple ORDER BY a",
        )
        .await
        .expect("Failed to update and select in one call")
        .fetch_all_value();
    assert_eq!(
        rows.into_iter()
            .map(|v| String::try_from_value(v).unwrap())
            .collect::<Vec<_>>(),
        ["one", "many", "many"]
    );
}
