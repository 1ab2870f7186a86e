use crate::Record;

/// Structured input of a SELECT statement.
///
/// Optional parts are emitted only when set, an empty column list selects `*`.
/// ```rust
/// use scoop_core::{Select, record};
/// let select = Select::new("users")
///     .columns(["id", "name"])
///     .predicates(record! { "active" => true })
///     .order_by("name DESC")
///     .limit(10);
/// assert_eq!(select.limit.as_deref(), Some("10"));
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub columns: Vec<String>,
    pub predicates: Record,
    pub group_by: Option<String>,
    pub having: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<String>,
    pub distinct: bool,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }
    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }
    pub fn predicates(mut self, predicates: Record) -> Self {
        self.predicates = predicates;
        self
    }
    pub fn group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }
    pub fn having(mut self, having: impl Into<String>) -> Self {
        self.having = Some(having.into());
        self
    }
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }
    /// Row count, or `offset, count` text.
    pub fn limit(mut self, limit: impl ToString) -> Self {
        self.limit = Some(limit.to_string());
        self
    }
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }
}
