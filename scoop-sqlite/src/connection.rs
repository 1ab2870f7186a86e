use crate::{
    CBox, SqliteDriver, SqlitePrepared, error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use async_stream::try_stream;
use libsqlite3_sys::{
    SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI,
    SQLITE_ROW, sqlite3, sqlite3_busy_timeout, sqlite3_close, sqlite3_column_count,
    sqlite3_db_handle, sqlite3_errmsg, sqlite3_finalize, sqlite3_last_insert_rowid,
    sqlite3_open_v2, sqlite3_prepare_v2, sqlite3_set_last_insert_rowid, sqlite3_step,
    sqlite3_stmt, sqlite3_total_changes64,
};
use scoop_core::{
    Connection, ConnectionDescriptor, Context, Driver, Error, Executor, Query, QueryResult,
    Result, Row, RowLabeled, RowNames, RowsAffected,
    future::Either,
    stream::{Stream, StreamExt, TryStreamExt},
    truncate_long,
};
use std::{
    ffi::{CStr, CString, c_char, c_int},
    pin::pin,
    ptr,
    sync::{
        Arc,
        atomic::{AtomicPtr, Ordering},
    },
};
use tokio::task::spawn_blocking;

pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
}

fn connection_error(connection: *mut sqlite3) -> Error {
    Error::msg(unsafe { error_message_from_ptr(&sqlite3_errmsg(connection)).to_string() })
}

fn statement_error(statement: *mut sqlite3_stmt) -> Error {
    connection_error(unsafe { sqlite3_db_handle(statement) })
}

fn total_changes(statement: *mut sqlite3_stmt) -> i64 {
    unsafe { sqlite3_total_changes64(sqlite3_db_handle(statement)) }
}

/// Zero the last inserted rowid, so a statement that inserts nothing reports no id.
fn clear_last_insert_rowid(statement: *mut sqlite3_stmt) {
    unsafe { sqlite3_set_last_insert_rowid(sqlite3_db_handle(statement), 0) }
}

/// Rows changed since `before` (a [`total_changes`] reading), zero for schema statements.
///
/// The id is reported only when the statement inserted a row, an upsert taking the
/// update path leaves it unset.
fn rows_affected(statement: *mut sqlite3_stmt, before: i64) -> RowsAffected {
    let rowid = unsafe { sqlite3_last_insert_rowid(sqlite3_db_handle(statement)) };
    RowsAffected {
        rows_affected: (total_changes(statement) - before).max(0) as u64,
        last_affected_id: (rowid != 0).then_some(rowid),
    }
}

/// Prepare the first statement of `sql`, returning it with the remaining text.
///
/// The statement is null when `sql` holds only whitespace or comments.
fn prepare_first(
    connection: *mut sqlite3,
    sql: &CStr,
) -> Result<(CBox<*mut sqlite3_stmt>, CString)> {
    unsafe {
        let mut statement = CBox::new(ptr::null_mut(), |p| {
            sqlite3_finalize(p);
        });
        let mut tail: *const c_char = ptr::null();
        let rc = sqlite3_prepare_v2(
            connection,
            sql.as_ptr(),
            -1,
            &mut *statement,
            &mut tail,
        );
        if rc != SQLITE_OK {
            return Err(connection_error(connection));
        }
        let rest = if tail.is_null() {
            CString::default()
        } else {
            CStr::from_ptr(tail).to_owned()
        };
        Ok((statement, rest))
    }
}

/// Whether `sql` holds a statement, rather than only whitespace, comments or `;`.
fn has_statement(connection: *mut sqlite3, mut sql: CString) -> Result<bool> {
    while !sql.as_bytes().iter().all(u8::is_ascii_whitespace) {
        let (statement, rest) = prepare_first(connection, &sql)?;
        if !statement.is_null() {
            return Ok(true);
        }
        if rest.as_bytes().len() >= sql.as_bytes().len() {
            break;
        }
        sql = rest;
    }
    Ok(false)
}

impl SqliteConnection {
    pub(crate) fn run_statement(
        statement: CBox<*mut sqlite3_stmt>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        try_stream! {
            let count = unsafe { sqlite3_column_count(*statement) };
            let labels = (0..count)
                .map(|i| extract_name(*statement, i))
                .collect::<Result<RowNames>>()?;
            clear_last_insert_rowid(*statement);
            let before = total_changes(*statement);
            loop {
                match unsafe { sqlite3_step(*statement) } {
                    SQLITE_ROW => {
                        let values = (0..count)
                            .map(|i| extract_value(*statement, i))
                            .collect::<Result<Row>>()?;
                        yield QueryResult::Row(RowLabeled::new(labels.clone(), values));
                    }
                    SQLITE_DONE => break,
                    _ => Err(statement_error(*statement))?,
                }
            }
            if count == 0 {
                yield QueryResult::Affected(rows_affected(*statement, before));
            }
        }
    }

    /// Run every statement of `sql` one after the other.
    pub(crate) fn run_unprepared(
        &mut self,
        sql: String,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        try_stream! {
            let mut sql = CString::new(sql)?;
            loop {
                let (statement, rest) = prepare_first(*self.connection, &sql)?;
                if !statement.is_null() {
                    let mut stream = pin!(Self::run_statement(statement));
                    while let Some(value) = stream.next().await {
                        yield value?;
                    }
                }
                if rest.as_bytes().iter().all(u8::is_ascii_whitespace) {
                    break;
                }
                sql = rest;
            }
        }
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver {}
    }

    async fn prepare(&mut self, sql: String) -> Result<Query<Self::Driver>> {
        let connection = AtomicPtr::new(*self.connection);
        let context = format!("While preparing the query:\n{}", truncate_long!(sql));
        let prepared = spawn_blocking(move || -> Result<CBox<*mut sqlite3_stmt>> {
            let connection = connection.load(Ordering::Relaxed);
            let sql = CString::new(sql)
                .context("Could not create a CString from the query String")?;
            let (statement, rest) = prepare_first(connection, &sql)?;
            if statement.is_null() {
                return Err(Error::msg("The query does not contain any statement"));
            }
            if has_statement(connection, rest)? {
                return Err(Error::msg(
                    "Cannot prepare more than one statement at a time",
                ));
            }
            Ok(statement)
        })
        .await?
        .map_err(|e| {
            let e = e.context(context);
            log::error!("{:#}", e);
            e
        })?;
        Ok(Query::Prepared(SqlitePrepared::new(prepared)))
    }

    fn run(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        match query {
            Query::Raw(sql) => Either::Left(self.run_unprepared(sql)),
            Query::Prepared(prepared) => Either::Right(Self::run_statement(prepared.statement)),
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

impl Connection for SqliteConnection {
    async fn connect(descriptor: &ConnectionDescriptor) -> Result<SqliteConnection> {
        let url = descriptor.url();
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        if descriptor.driver() != SqliteDriver::NAME {
            let error = Error::msg(format!(
                "Expected a `{}` connection descriptor, found `{}`",
                SqliteDriver::NAME,
                descriptor.driver()
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let path = CString::new(descriptor.database()).with_context(context)?;
        let timeout = descriptor.timeout().as_millis().min(c_int::MAX as u128) as c_int;
        let mut connection = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_close(p);
        });
        unsafe {
            let rc = sqlite3_open_v2(
                path.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            );
            if rc != SQLITE_OK {
                let error = connection_error(*connection).context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
            sqlite3_busy_timeout(*connection, timeout);
        }
        Ok(Self { connection })
    }
}
