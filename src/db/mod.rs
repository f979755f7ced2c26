//! Database handle and its request/response protocol
//!
//! ```ignore
//! use stratakv::{Database, EngineOptions, ReadOptions, WriteOptions};
//!
//! let db: Database = Database::open_primary("/var/lib/strata", &EngineOptions::create_if_missing())?;
//! db.put(&WriteOptions::default(), "user:1", "alice")?;
//! let response = db.get(&ReadOptions::default(), "user:1")?;
//! assert_eq!(response.value(), Some("alice"));
//! ```

mod errors;
mod handle;
mod lifecycle;
mod response;

pub use errors::{DbError, DbResult};
pub use handle::Database;
pub use lifecycle::{AccessMode, HandleState};
pub use response::Response;
