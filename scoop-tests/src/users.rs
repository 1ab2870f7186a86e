use crate::auto_id;
use scoop::{AsValue, Driver, QueryHelper, Select, Value, record};

pub async fn users<D: Driver>(helper: &mut QueryHelper<D>) {
    // Setup
    helper
        .exec("DROP TABLE IF EXISTS scoop_users")
        .await
        .expect("Failed to drop the scoop_users table");
    helper
        .exec(format!(
            "CREATE TABLE scoop_users ({}, name VARCHAR(64) NOT NULL, age INTEGER, email VARCHAR(128))",
            auto_id::<D>()
        ))
        .await
        .expect("Failed to create the scoop_users table");

    // Insert
    let ann = helper
        .insert(
            "scoop_users",
            &record! { "name" => "ann", "age" => 31, "email" => "ann@example.com" },
        )
        .await
        .expect("Failed to insert ann");
    let bob = helper
        .insert("scoop_users", &record! { "name" => "bob", "age" => 25 })
        .await
        .expect("Failed to insert bob");
    let cid = helper
        .insert(
            "scoop_users",
            &record! { "name" => "cid", "age" => None::<i32>, "email" => "cid@example.com" },
        )
        .await
        .expect("Failed to insert cid");
    assert!(ann.is_some() && bob.is_some() && cid.is_some());
    assert_ne!(ann, bob);
    assert_ne!(bob, cid);
    assert_eq!(helper.rows_affected(), 1);

    // Select all
    let rows = helper
        .select(
            &Select::new("scoop_users")
                .columns(["name", "age"])
                .order_by("name"),
        )
        .await
        .expect("Failed to select the users")
        .fetch_all();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter()
            .map(|v| String::try_from_value(v["name"].clone()).unwrap())
            .collect::<Vec<_>>(),
        ["ann", "bob", "cid"]
    );
    assert_eq!(i64::try_from_value(rows[0]["age"].clone()).unwrap(), 31);
    assert!(rows[2]["age"].is_null());
    assert_eq!(
        helper.query_string(),
        Some("SELECT name,age FROM scoop_users ORDER BY name")
    );

    // Select by predicates
    let id = helper
        .select(
            &Select::new("scoop_users")
                .columns(["id"])
                .predicates(record! { "name" => "bob", "age" => 25 }),
        )
        .await
        .expect("Failed to select bob")
        .fetch_value_as::<i64>()
        .expect("The id is not an integer");
    assert_eq!(id, bob);
    assert_eq!(helper.fetch_value(), None);

    // Update
    let affected = helper
        .update(
            "scoop_users",
            &record! { "age" => 26, "email" => "bob@example.com" },
            &record! { "name" => "bob" },
        )
        .await
        .expect("Failed to update bob");
    assert_eq!(affected, 1);
    let affected = helper
        .update(
            "scoop_users",
            &record! { "age" => 99 },
            &record! { "name" => "nobody" },
        )
        .await
        .expect("Failed to run the update without matches");
    assert_eq!(affected, 0);
    let bob_row = helper
        .select(&Select::new("scoop_users").predicates(record! { "name" => "bob" }))
        .await
        .expect("Failed to select bob after the update")
        .fetch_assoc()
        .expect("Bob disappeared");
    assert_eq!(
        bob_row.keys().map(String::as_str).collect::<Vec<_>>(),
        ["id", "name", "age", "email"]
    );
    assert_eq!(i32::try_from_value(bob_row["age"].clone()).unwrap(), 26);
    assert_eq!(
        String::try_from_value(bob_row["email"].clone()).unwrap(),
        "bob@example.com"
    );

    // Raw query with parameters
    let count = helper
        .query(
            "SELECT COUNT(*) FROM scoop_users WHERE age > ?",
            [20.as_value()],
        )
        .await
        .expect("Failed to count the users")
        .fetch_value_as::<i64>()
        .expect("The count is not an integer");
    assert_eq!(count, Some(2));

    // Result shapes
    let select = Select::new("scoop_users")
        .columns(["name", "age"])
        .order_by("id");
    let numbered = helper
        .select(&select)
        .await
        .expect("Failed to select the users")
        .fetch_all_num();
    assert_eq!(numbered.len(), 3);
    assert_eq!(numbered[0][0], Value::from("ann"));
    let names = helper
        .select(&select)
        .await
        .expect("Failed to select the users")
        .fetch_all_value();
    assert_eq!(
        names,
        [Value::from("ann"), Value::from("bob"), Value::from("cid")]
    );
    let by_name = helper
        .select(&select)
        .await
        .expect("Failed to select the users")
        .fetch_all_assoc();
    assert_eq!(by_name.len(), 3);
    assert_eq!(
        i64::try_from_value(by_name[&Value::from("bob")]["age"].clone()).unwrap(),
        26
    );
    let first = helper
        .select(&select)
        .await
        .expect("Failed to select the users")
        .fetch_num()
        .expect("Missing first row");
    assert_eq!(first.len(), 2);
    assert_eq!(helper.fetch_all_name().len(), 2);

    // Duplicated first column
    helper
        .update(
            "scoop_users",
            &record! { "age" => 31 },
            &record! { "name" => "cid" },
        )
        .await
        .expect("Failed to update cid");
    let by_age = Select::new("scoop_users")
        .columns(["age", "name"])
        .predicates(record! { "age" => 31 })
        .order_by("id");
    let grouped = helper
        .select(&by_age)
        .await
        .expect("Failed to select by age")
        .fetch_all_assoc();
    assert_eq!(grouped.len(), 1);
    let (_, row) = grouped.first().expect("Missing grouped row");
    assert_eq!(row["name"], Value::from("cid"));
    assert!(
        helper
            .select(&by_age)
            .await
            .expect("Failed to select by age")
            .fetch_all_assoc_unique()
            .is_err()
    );

    // Delete
    let affected = helper
        .delete("scoop_users", &record! { "name" => "cid" })
        .await
        .expect("Failed to delete cid");
    assert_eq!(affected, 1);
    let affected = helper
        .delete("scoop_users", &record! { "name" => "cid" })
        .await
        .expect("Failed to delete cid again");
    assert_eq!(affected, 0);
    let affected = helper
        .delete("scoop_users", &record! {})
        .await
        .expect("Failed to delete every user");
    assert_eq!(affected, 2);
    let empty = helper
        .select(&Select::new("scoop_users"))
        .await
        .expect("Failed to select from the empty table");
    assert_eq!(empty.fetch_assoc(), None);
    assert!(empty.fetch_all().is_empty());
    assert!(empty.fetch_all_assoc().is_empty());
}
