use crate::{MySQLDriver, MySQLPrepared, RowWrap};
use async_stream::try_stream;
use mysql_async::{Conn, Opts, prelude::Queryable};
use scoop_core::{
    Connection, ConnectionDescriptor, Context, Driver, Error, Executor, Query, QueryResult,
    Result, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
    truncate_long,
};
use std::sync::Arc;
use tokio::time::timeout;

pub struct MySQLConnection {
    pub(crate) connection: Conn,
}

impl Executor for MySQLConnection {
    type Driver = MySQLDriver;

    fn driver(&self) -> &Self::Driver {
        &MySQLDriver {}
    }

    async fn prepare(&mut self, sql: String) -> Result<Query<Self::Driver>> {
        let statement = match self.connection.prep(sql.as_str()).await {
            Ok(v) => v,
            Err(e) => {
                let error = Error::new(e)
                    .context(format!("While preparing the query:\n{}", truncate_long!(sql)));
                log::error!("{:#}", error);
                return Err(error);
            }
        };
        Ok(Query::Prepared(MySQLPrepared::new(statement, sql)))
    }

    fn run(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        try_stream! {
            match query {
                Query::Raw(sql) => {
                    let mut result = self.connection.query_iter(sql).await?;
                    let mut rows = 0;
                    while let Some(mut stream) = result.stream::<RowWrap>().await? {
                        while let Some(row) = stream.next().await.transpose()? {
                            rows += 1;
                            yield QueryResult::Row(row.0);
                        }
                    }
                    if rows == 0 {
                        yield QueryResult::Affected(RowsAffected {
                            rows_affected: result.affected_rows(),
                            last_affected_id: result.last_insert_id().map(|v| v as i64),
                        });
                    }
                }
                Query::Prepared(mut prepared) => {
                    let params = prepared.take_params()?;
                    let mut result = self
                        .connection
                        .exec_iter(prepared.statement, params)
                        .await?;
                    let mut rows = 0;
                    while let Some(mut stream) = result.stream::<RowWrap>().await? {
                        while let Some(row) = stream.next().await.transpose()? {
                            rows += 1;
                            yield QueryResult::Row(row.0);
                        }
                    }
                    if rows == 0 {
                        yield QueryResult::Affected(RowsAffected {
                            rows_affected: result.affected_rows(),
                            last_affected_id: result.last_insert_id().map(|v| v as i64),
                        });
                    }
                }
            }
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

impl Connection for MySQLConnection {
    async fn connect(descriptor: &ConnectionDescriptor) -> Result<MySQLConnection> {
        let context = || {
            format!(
                "While trying to connect to the database `{}` on `{}`",
                descriptor.database(),
                descriptor.host()
            )
        };
        if descriptor.driver() != MySQLDriver::NAME {
            let error = Error::msg(format!(
                "Expected a `{}` connection descriptor, found `{}`",
                MySQLDriver::NAME,
                descriptor.driver()
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let config = Opts::from_url(&descriptor.url()).with_context(context)?;
        let connection = match timeout(descriptor.timeout(), Conn::new(config)).await {
            Ok(Ok(v)) => v,
            Ok(Err(e)) => {
                let error = Error::new(e).context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
            Err(..) => {
                let error = Error::msg(format!(
                    "Connection timed out after {:?}",
                    descriptor.timeout()
                ))
                .context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
        };
        Ok(MySQLConnection { connection })
    }

    async fn disconnect(self) -> Result<()> {
        self.connection
            .disconnect()
            .await
            .context("While disconnecting from MySQL")
    }
}
