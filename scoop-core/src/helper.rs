use crate::{
    AsValue, BoundSql, Connection, ConnectionDescriptor, Driver, Executor, OrderedMap,
    Query, Record, Result, Select, SqlWriter, Statement, Value, truncate_long,
};

/// Builds, binds and runs statements over a lazily opened connection.
///
/// The connection is opened by the first call that needs it and reused until
/// [`QueryHelper::disconnect`]. Every query issued replaces the previously executed
/// [`Statement`], the `fetch_*` methods read from the current one.
/// ```rust,ignore
/// let mut helper = QueryHelper::<SqliteDriver>::new(descriptor);
/// let id = helper.insert("users", &record! { "name" => "ann" }).await?;
/// let rows = helper
///     .select(&Select::new("users").predicates(record! { "id" => id }))
///     .await?
///     .fetch_all();
/// ```
pub struct QueryHelper<D: Driver> {
    descriptor: ConnectionDescriptor,
    driver: D,
    connection: Option<D::Connection>,
    statement: Option<Statement>,
}

impl<D: Driver + Default> QueryHelper<D> {
    pub fn new(descriptor: ConnectionDescriptor) -> Self {
        Self::with_driver(D::default(), descriptor)
    }
}

impl<D: Driver> QueryHelper<D> {
    pub fn with_driver(driver: D, descriptor: ConnectionDescriptor) -> Self {
        Self {
            descriptor,
            driver,
            connection: None,
            statement: None,
        }
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Live connection, opened from the descriptor on first use.
    pub async fn connect(&mut self) -> Result<&mut D::Connection> {
        let connection = match self.connection.take() {
            Some(connection) => {
                log::trace!("Reusing the connection to {}", D::NAME);
                connection
            }
            None => {
                let connection = D::Connection::connect(&self.descriptor).await?;
                log::info!(
                    "Connected to {} database `{}`",
                    D::NAME,
                    self.descriptor.database()
                );
                connection
            }
        };
        Ok(self.connection.insert(connection))
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Close the live connection if any, the current statement stays readable.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            connection.disconnect().await?;
            log::info!(
                "Disconnected from {} database `{}`",
                D::NAME,
                self.descriptor.database()
            );
        }
        Ok(())
    }

    /// Run raw SQL without parameters.
    pub async fn exec(&mut self, sql: impl Into<String>) -> Result<&mut Self> {
        let sql = sql.into();
        self.statement = None;
        log::debug!("{}", truncate_long!(sql));
        let connection = self.connect().await?;
        let statement = Statement::collect(sql.clone(), connection.run(Query::Raw(sql))).await?;
        self.statement = Some(statement);
        Ok(self)
    }

    /// Run `sql` binding `params` positionally.
    pub async fn query(
        &mut self,
        sql: impl Into<String>,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<&mut Self> {
        self.run(BoundSql::new(sql, params)).await?;
        Ok(self)
    }

    pub async fn select(&mut self, select: &Select) -> Result<&mut Self> {
        let bound = self.driver.sql_writer().build_select(select);
        self.run(bound).await?;
        Ok(self)
    }

    /// Returns the identifier of the inserted row when the backend reports one.
    pub async fn insert(&mut self, table: &str, values: &Record) -> Result<Option<i64>> {
        let bound = self.driver.sql_writer().build_insert(table, values);
        Ok(self.run(bound).await?.last_insert_id())
    }

    /// Returns the number of affected rows.
    pub async fn update(
        &mut self,
        table: &str,
        values: &Record,
        predicates: &Record,
    ) -> Result<u64> {
        if predicates.is_empty() {
            log::warn!("Updating every row of `{}`, no predicates given", table);
        }
        let bound = self
            .driver
            .sql_writer()
            .build_update(table, values, predicates);
        Ok(self.run(bound).await?.rows_affected())
    }

    /// Returns the number of affected rows.
    pub async fn delete(&mut self, table: &str, predicates: &Record) -> Result<u64> {
        if predicates.is_empty() {
            log::warn!("Deleting every row of `{}`, no predicates given", table);
        }
        let bound = self.driver.sql_writer().build_delete(table, predicates);
        Ok(self.run(bound).await?.rows_affected())
    }

    /// Insert, or update the conflicting row with the same values.
    pub async fn insert_on_duplicate_update(
        &mut self,
        table: &str,
        values: &Record,
    ) -> Result<Option<i64>> {
        let bound = self
            .driver
            .sql_writer()
            .build_insert_on_duplicate_update(table, values);
        Ok(self.run(bound).await?.last_insert_id())
    }

    /// Prepare, bind and execute, storing the result as the current statement.
    pub async fn run(&mut self, bound: BoundSql) -> Result<&mut Statement> {
        let BoundSql { sql, params } = bound;
        self.statement = None;
        log::debug!("{}", truncate_long!(sql));
        let connection = self.connect().await?;
        let mut query = connection.prepare(sql.clone()).await?;
        for value in params {
            query.bind(value)?;
        }
        let statement = Statement::collect(sql, connection.run(query)).await?;
        Ok(self.statement.insert(statement))
    }

    /// SQL text of the current statement.
    pub fn query_string(&self) -> Option<&str> {
        self.statement.as_ref().map(Statement::query_string)
    }

    pub fn statement(&mut self) -> Option<&mut Statement> {
        self.statement.as_mut()
    }

    /// Hand out the current statement, leaving none.
    pub fn take_statement(&mut self) -> Option<Statement> {
        self.statement.take()
    }

    pub fn rows_affected(&self) -> u64 {
        self.statement
            .as_ref()
            .map(Statement::rows_affected)
            .unwrap_or_default()
    }

    pub fn last_insert_id(&self) -> Option<i64> {
        self.statement.as_ref().and_then(Statement::last_insert_id)
    }

    pub fn fetch_assoc(&mut self) -> Option<Record> {
        self.statement.as_mut().and_then(Statement::fetch_assoc)
    }

    pub fn fetch_all(&mut self) -> Vec<Record> {
        self.statement
            .as_mut()
            .map(Statement::fetch_all)
            .unwrap_or_default()
    }

    pub fn fetch_all_name(&mut self) -> Vec<Record> {
        self.statement
            .as_mut()
            .map(Statement::fetch_all_name)
            .unwrap_or_default()
    }

    pub fn fetch_num(&mut self) -> Option<Vec<Value>> {
        self.statement.as_mut().and_then(Statement::fetch_num)
    }

    pub fn fetch_all_num(&mut self) -> Vec<Vec<Value>> {
        self.statement
            .as_mut()
            .map(Statement::fetch_all_num)
            .unwrap_or_default()
    }

    pub fn fetch_all_assoc(&mut self) -> OrderedMap<Value, Record> {
        self.statement
            .as_mut()
            .map(Statement::fetch_all_assoc)
            .unwrap_or_default()
    }

    pub fn fetch_all_assoc_unique(&mut self) -> Result<OrderedMap<Value, Record>> {
        self.statement
            .as_mut()
            .map(Statement::fetch_all_assoc_unique)
            .unwrap_or_else(|| Ok(OrderedMap::new()))
    }

    pub fn fetch_all_value(&mut self) -> Vec<Value> {
        self.statement
            .as_mut()
            .map(Statement::fetch_all_value)
            .unwrap_or_default()
    }

    pub fn fetch_value(&mut self) -> Option<Value> {
        self.statement.as_mut().and_then(Statement::fetch_value)
    }

    pub fn fetch_value_as<T: AsValue>(&mut self) -> Result<Option<T>> {
        match self.statement.as_mut() {
            Some(statement) => statement.fetch_value_as(),
            None => Ok(None),
        }
    }
}
