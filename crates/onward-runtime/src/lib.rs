//! Runtime collaborators for onward: PostgreSQL execution, migration files
//! on disk, and logging setup.

pub mod db;
pub mod observability;
pub mod source;

pub use db::{Database, PgExecutor};
pub use observability::init_logging;
pub use source::DirectorySource;
