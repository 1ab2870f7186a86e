use crate::{ConnectionDescriptor, Executor, Result};
use std::future::Future;

pub trait Connection: Executor {
    /// Open a connection described by `descriptor`, honoring its connection timeout.
    fn connect(descriptor: &ConnectionDescriptor) -> impl Future<Output = Result<Self>> + Send;

    /// Close the connection, the default implementation just drops it.
    fn disconnect(self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}
