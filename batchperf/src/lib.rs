mod runner;
mod timing;
mod workload;

pub use batchperf_conn as conn;
pub use batchperf_error as error;

pub use conn::{ConnectOptions, Connection, DriverKind};
pub use runner::{compare, run, run_batched, run_unbatched};
pub use timing::{Mode, Outcome, Timing};
pub use workload::{Workload, COLUMNS, ROW_COUNT, TABLE_NAME};
