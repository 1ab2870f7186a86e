use crate::{
    AsValue, Error, OrderedMap, QueryResult, Record, Result, RowLabeled, RowsAffected, Value,
    stream::{Stream, TryStreamExt},
    truncate_long,
};
use std::{collections::VecDeque, pin::pin};

/// Executed statement with its result fully buffered.
///
/// Rows are consumed front to back by the `fetch_*` methods, each row is returned at
/// most once. Reading does not need the connection that produced the statement.
#[derive(Default, Debug, Clone)]
pub struct Statement {
    sql: String,
    rows: VecDeque<RowLabeled>,
    affected: RowsAffected,
}

/// Remove the entries whose key is made only of ASCII digits (positional duplicates).
pub fn strip_numeric_keys(record: &mut Record) {
    record.retain(|k, _| k.is_empty() || !k.bytes().all(|b| b.is_ascii_digit()));
}

fn to_record(row: RowLabeled) -> Record {
    let mut record = Record::with_capacity(row.values.len());
    for (name, value) in row.labels.iter().zip(row.values) {
        record.insert(name.as_str(), value);
    }
    record
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Default::default()
        }
    }

    /// Drain the result stream of an executor into a statement.
    pub async fn collect(
        sql: impl Into<String>,
        stream: impl Stream<Item = Result<QueryResult>>,
    ) -> Result<Self> {
        let mut result = Self::new(sql);
        let mut stream = pin!(stream);
        while let Some(item) = stream.try_next().await? {
            match item {
                QueryResult::Row(row) => result.rows.push_back(row),
                QueryResult::Affected(affected) => result.affected.extend([affected]),
            }
        }
        Ok(result)
    }

    pub fn query_string(&self) -> &str {
        &self.sql
    }
    pub fn rows_affected(&self) -> u64 {
        self.affected.rows_affected
    }
    pub fn last_insert_id(&self) -> Option<i64> {
        self.affected.last_affected_id
    }
    /// Rows not fetched yet.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Next row as a labeled record, numeric keys removed.
    pub fn fetch_assoc(&mut self) -> Option<Record> {
        self.rows.pop_front().map(|row| {
            let mut record = to_record(row);
            strip_numeric_keys(&mut record);
            record
        })
    }

    /// Remaining rows as labeled records, numeric keys removed.
    pub fn fetch_all(&mut self) -> Vec<Record> {
        std::iter::from_fn(|| self.fetch_assoc()).collect()
    }

    /// Remaining rows keyed by column name exactly as the driver labeled them.
    pub fn fetch_all_name(&mut self) -> Vec<Record> {
        self.rows.drain(..).map(to_record).collect()
    }

    pub fn fetch_num(&mut self) -> Option<Vec<Value>> {
        self.rows.pop_front().map(|row| row.values.into_vec())
    }

    pub fn fetch_all_num(&mut self) -> Vec<Vec<Value>> {
        self.rows
            .drain(..)
            .map(|row| row.values.into_vec())
            .collect()
    }

    /// Remaining rows keyed by the value of their first column.
    ///
    /// A later row with the same first column value replaces the earlier one, the
    /// key keeps the position of its first occurrence. Rows without columns are skipped.
    pub fn fetch_all_assoc(&mut self) -> OrderedMap<Value, Record> {
        let mut result = OrderedMap::new();
        while let Some(record) = self.fetch_assoc() {
            if let Some((_, key)) = record.first() {
                result.insert(key.clone(), record);
            }
        }
        result
    }

    /// Like [`Statement::fetch_all_assoc`] but a repeated first column value is an error.
    pub fn fetch_all_assoc_unique(&mut self) -> Result<OrderedMap<Value, Record>> {
        let mut result = OrderedMap::new();
        while let Some(record) = self.fetch_assoc() {
            let Some((_, key)) = record.first() else {
                continue;
            };
            let key = key.clone();
            if result.contains_key(&key) {
                let error = Error::msg(format!(
                    "Duplicate key {} in the first column of the result of `{}`",
                    key,
                    truncate_long!(self.sql)
                ));
                log::error!("{:#}", error);
                return Err(error);
            }
            result.insert(key, record);
        }
        Ok(result)
    }

    /// First column of every remaining row.
    pub fn fetch_all_value(&mut self) -> Vec<Value> {
        self.rows
            .drain(..)
            .filter_map(|row| row.values.into_vec().into_iter().next())
            .collect()
    }

    /// First column of the next row.
    pub fn fetch_value(&mut self) -> Option<Value> {
        self.rows
            .pop_front()
            .and_then(|row| row.values.into_vec().into_iter().next())
    }

    /// First column of the next row converted to `T`.
    pub fn fetch_value_as<T: AsValue>(&mut self) -> Result<Option<T>> {
        self.fetch_value().map(T::try_from_value).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RowNames, record, stream};

    fn statement(labels: &[&str], rows: Vec<Vec<Value>>) -> Statement {
        let labels: RowNames = labels.iter().map(|v| v.to_string()).collect();
        let mut statement = Statement::new("SELECT");
        statement.rows = rows
            .into_iter()
            .map(|v| RowLabeled::new(labels.clone(), v.into()))
            .collect();
        statement
    }

    #[test]
    fn assoc_strips_numeric() {
        let mut s = statement(
            &["0", "name"],
            vec![vec!["v".into(), "v".into()], vec!["w".into(), "w".into()]],
        );
        assert_eq!(s.fetch_assoc(), Some(record! { "name" => "v" }));
        assert_eq!(s.fetch_all(), [record! { "name" => "w" }]);
        assert_eq!(s.fetch_assoc(), None);
        assert!(s.fetch_all().is_empty());
    }

    #[test]
    fn name_keeps_everything() {
        let mut s = statement(&["0", "name"], vec![vec![1.into(), "a".into()]]);
        let rows = s.fetch_all_name();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0]["0"], Value::Int64(1));
    }

    #[test]
    fn num_fetches() {
        let mut s = statement(
            &["a", "b"],
            vec![vec![1.into(), 2.into()], vec![3.into(), 4.into()]],
        );
        assert_eq!(s.fetch_num(), Some(vec![Value::Int64(1), Value::Int64(2)]));
        assert_eq!(s.fetch_all_num(), [vec![Value::Int64(3), Value::Int64(4)]]);
        assert_eq!(s.fetch_num(), None);
    }

    #[test]
    fn assoc_last_write_wins() {
        let mut s = statement(
            &["k", "v"],
            vec![
                vec!["k".into(), 1.into()],
                vec!["j".into(), 2.into()],
                vec!["k".into(), 3.into()],
            ],
        );
        let result = s.fetch_all_assoc();
        assert_eq!(result.len(), 2);
        assert_eq!(result.first().unwrap().0, &Value::from("k"));
        assert_eq!(result[&Value::from("k")], record! { "k" => "k", "v" => 3 });
        assert_eq!(result[&Value::from("j")]["v"], Value::Int64(2));
    }

    #[test]
    fn assoc_unique_rejects_duplicates() {
        let rows = vec![vec!["k".into(), 1.into()], vec!["k".into(), 2.into()]];
        let mut s = statement(&["k", "v"], rows.clone());
        assert!(s.fetch_all_assoc_unique().is_err());
        let mut s = statement(&["k", "v"], rows[..1].to_vec());
        assert_eq!(s.fetch_all_assoc_unique().unwrap().len(), 1);
    }

    #[test]
    fn values() {
        let mut s = statement(
            &["id", "name"],
            vec![
                vec![1.into(), "a".into()],
                vec![2.into(), "b".into()],
                vec![3.into(), "c".into()],
            ],
        );
        assert_eq!(s.fetch_value(), Some(Value::Int64(1)));
        assert_eq!(s.fetch_value_as::<u8>().unwrap(), Some(2));
        assert_eq!(s.fetch_all_value(), [Value::Int64(3)]);
        assert_eq!(s.fetch_value_as::<i32>().unwrap(), None);
    }

    #[tokio::test]
    async fn collect_stream() {
        let labels: RowNames = ["x".to_string()].into();
        let items: Vec<Result<QueryResult>> = vec![
            Ok(RowLabeled::new(labels.clone(), [Value::Int64(1)].into()).into()),
            Ok(RowsAffected {
                rows_affected: 2,
                last_affected_id: Some(9),
            }
            .into()),
            Ok(RowsAffected {
                rows_affected: 1,
                last_affected_id: None,
            }
            .into()),
        ];
        let s = Statement::collect("INSERT", stream::iter(items)).await.unwrap();
        assert_eq!(s.query_string(), "INSERT");
        assert_eq!(s.remaining(), 1);
        assert_eq!(s.rows_affected(), 3);
        assert_eq!(s.last_insert_id(), Some(9));
        let failing: Vec<Result<QueryResult>> = vec![Err(Error::msg("boom"))];
        assert!(Statement::collect("X", stream::iter(failing)).await.is_err());
    }
}
