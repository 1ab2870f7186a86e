mod as_value;
mod clause;
mod connection;
mod descriptor;
mod driver;
mod executor;
mod helper;
mod ordered_map;
mod prepared;
mod query;
mod select;
mod sql_writer;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use clause::*;
pub use connection::*;
pub use descriptor::*;
pub use driver::*;
pub use executor::*;
pub use helper::*;
pub use ordered_map::*;
pub use prepared::*;
pub use query::*;
pub use select::*;
pub use sql_writer::*;
pub use statement::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
