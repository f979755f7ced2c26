//! Option bundles
//!
//! Four independent records, each passed into the operation that needs it:
//!
//! - `EngineOptions`: handed to the engine on open, snapshotted by GetOptions
//! - `ReadOptions`: Get, KeyMayExist
//! - `WriteOptions`: Put, Merge, Del
//! - `FlushOptions`: Flush
//!
//! `OptionsPatch` is the string mapping accepted by SetOptions/SetDBOptions.

mod engine;
mod flush;
mod patch;
mod read;
mod write;

pub use engine::EngineOptions;
pub use flush::FlushOptions;
pub use patch::{OptionScope, OptionsPatch};
pub use read::ReadOptions;
pub use write::WriteOptions;
