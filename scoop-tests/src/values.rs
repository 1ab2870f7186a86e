use rust_decimal::Decimal;
use scoop::{AsValue, Driver, QueryHelper, Record, Select, record};
use time::{Date, Month, PrimitiveDateTime, Time};
use uuid::Uuid;

fn get<T: AsValue>(row: &Record, column: &str) -> T {
    T::try_from_value(row[column].clone())
        .unwrap_or_else(|e| panic!("Could not read column `{}`: {:#}", column, e))
}

pub async fn values<D: Driver>(helper: &mut QueryHelper<D>) {
    helper
        .exec("DROP TABLE IF EXISTS scoop_values")
        .await
        .expect("Failed to drop the scoop_values table");
    helper
        .exec(
            "CREATE TABLE scoop_values (
                k INTEGER PRIMARY KEY,
                flag BOOLEAN,
                big BIGINT,
                ratio DOUBLE,
                price DECIMAL(10,2),
                label VARCHAR(64),
                payload BLOB,
                day DATE,
                moment TIME,
                stamp DATETIME,
                token CHAR(36)
            )",
        )
        .await
        .expect("Failed to create the scoop_values table");

    let day = Date::from_calendar_date(2024, Month::February, 29).unwrap();
    let moment = Time::from_hms(23, 59, 58).unwrap();
    let stamp = PrimitiveDateTime::new(day, Time::from_hms(8, 30, 0).unwrap());
    let token = Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap();
    let payload: Vec<u8> = vec![0, 159, 146, 150, 255];
    helper
        .insert(
            "scoop_values",
            &record! {
                "k" => 1,
                "flag" => true,
                "big" => -9_876_543_210_i64,
                "ratio" => 0.25,
                "price" => Decimal::new(1250, 2),
                "label" => "it's quoted",
                "payload" => payload.clone(),
                "day" => day,
                "moment" => moment,
                "stamp" => stamp,
                "token" => token,
            },
        )
        .await
        .expect("Failed to insert the values");
    helper
        .insert(
            "scoop_values",
            &record! {
                "k" => 2,
                "flag" => None::<bool>,
                "label" => None::<String>,
                "day" => None::<Date>,
            },
        )
        .await
        .expect("Failed to insert the null values");

    let rows = helper
        .select(&Select::new("scoop_values").order_by("k"))
        .await
        .expect("Failed to select the values")
        .fetch_all();
    assert_eq!(rows.len(), 2);
    let row = &rows[0];
    assert!(get::<bool>(row, "flag"));
    assert_eq!(get::<i64>(row, "big"), -9_876_543_210);
    assert_eq!(get::<f64>(row, "ratio"), 0.25);
    assert_eq!(get::<Decimal>(row, "price"), Decimal::new(125, 1));
    assert_eq!(get::<String>(row, "label"), "it's quoted");
    assert_eq!(get::<Vec<u8>>(row, "payload"), payload);
    assert_eq!(get::<Date>(row, "day"), day);
    assert_eq!(get::<Time>(row, "moment"), moment);
    assert_eq!(get::<PrimitiveDateTime>(row, "stamp"), stamp);
    assert_eq!(get::<Uuid>(row, "token"), token);

    let row = &rows[1];
    assert_eq!(get::<i32>(row, "k"), 2);
    assert_eq!(get::<Option<bool>>(row, "flag"), None);
    assert_eq!(get::<Option<String>>(row, "label"), None);
    assert_eq!(get::<Option<Date>>(row, "day"), None);
    assert_eq!(get::<Option<Uuid>>(row, "token"), None);

    let token_of_first = helper
        .select(
            &Select::new("scoop_values")
                .columns(["token"])
                .predicates(record! { "day" => day, "flag" => true }),
        )
        .await
        .expect("Failed to select by date")
        .fetch_value_as::<Uuid>()
        .expect("The token is not a uuid");
    assert_eq!(token_of_first, Some(token));
}
