use scoop::{Driver, QueryHelper, Select, Value, record};

pub async fn upsert<D: Driver>(helper: &mut QueryHelper<D>) {
    helper
        .exec("DROP TABLE IF EXISTS scoop_settings")
        .await
        .expect("Failed to drop the scoop_settings table");
    helper
        .exec("CREATE TABLE scoop_settings (name VARCHAR(32) PRIMARY KEY, setting INTEGER NOT NULL)")
        .await
        .expect("Failed to create the scoop_settings table");

    for (name, setting) in [("volume", 3), ("volume", 7), ("speed", 1)] {
        helper
            .insert_on_duplicate_update(
                "scoop_settings",
                &record! { "name" => name, "setting" => setting },
            )
            .await
            .expect("Failed to upsert the setting");
    }

    let settings = helper
        .select(
            &Select::new("scoop_settings")
                .columns(["name", "setting"])
                .order_by("name"),
        )
        .await
        .expect("Failed to select the settings")
        .fetch_all_assoc_unique()
        .expect("The names should be unique");
    assert_eq!(settings.len(), 2);
    assert_eq!(settings[&Value::from("speed")]["setting"], Value::Int64(1));
    assert_eq!(settings[&Value::from("volume")]["setting"], Value::Int64(7));

    let query = helper.query_string().unwrap_or_default().to_string();
    assert!(query.starts_with("SELECT name,setting FROM scoop_settings"));
}
