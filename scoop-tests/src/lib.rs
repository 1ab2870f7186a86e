mod lifecycle;
mod multiple;
mod upsert;
mod users;
mod values;

use lifecycle::lifecycle;
use log::LevelFilter;
#[cfg(not(feature = "disable-multiple-statements"))]
use multiple::multiple;
use scoop::{Driver, QueryHelper};
use std::env;
use upsert::upsert;
use users::users;
use values::values;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Primary key column that the backend fills on insert.
pub(crate) fn auto_id<D: Driver>() -> &'static str {
    match D::NAME {
        "mysql" => "id BIGINT PRIMARY KEY AUTO_INCREMENT",
        _ => "id INTEGER PRIMARY KEY AUTOINCREMENT",
    }
}

pub async fn execute_tests<D: Driver>(helper: &mut QueryHelper<D>) {
    users(helper).await;
    upsert(helper).await;
    values(helper).await;
    #[cfg(not(feature = "disable-multiple-statements"))]
    multiple(helper).await;
    lifecycle(helper).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
