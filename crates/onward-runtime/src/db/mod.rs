mod pool;

pub use pool::{Database, PgExecutor};
