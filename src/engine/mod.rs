//! Engine boundary
//!
//! The database handle talks to storage only through [`Engine`]. Every
//! fallible engine call reports failure as a [`Status`]; the handle decides
//! how that status reaches the caller.
//!
//! [`log::LogEngine`] is the bundled implementation.

pub mod log;

use std::collections::BTreeMap;
use std::path::Path;

use crate::options::{EngineOptions, FlushOptions, OptionsPatch, ReadOptions, WriteOptions};
use crate::status::Status;

pub use self::log::LogEngine;

pub type EngineResult<T> = Result<T, Status>;

/// Point-operation interface of an embedded key-value engine.
///
/// Implementations must be safe to call concurrently through `&self`.
pub trait Engine: Send + Sync {
    /// Engine name used in build info, e.g. `"StrataLog"`
    fn name() -> &'static str
    where
        Self: Sized;

    /// Open as the primary read/write owner of `path`
    fn open(path: &Path, options: &EngineOptions) -> EngineResult<Self>
    where
        Self: Sized;

    /// Open as a read-only replica tailing the primary at `path`.
    ///
    /// `secondary_path` holds the replica's own files.
    fn open_as_secondary(
        path: &Path,
        secondary_path: &Path,
        options: &EngineOptions,
    ) -> EngineResult<Self>
    where
        Self: Sized;

    /// `Ok(None)` when the key is absent
    fn get(&self, options: &ReadOptions, key: &str) -> EngineResult<Option<String>>;

    fn put(&self, options: &WriteOptions, key: &str, value: &str) -> EngineResult<()>;

    fn merge(&self, options: &WriteOptions, key: &str, value: &str) -> EngineResult<()>;

    fn delete(&self, options: &WriteOptions, key: &str) -> EngineResult<()>;

    /// Approximate existence check.
    ///
    /// `false` means definitely absent. `true` means the key may exist; the
    /// returned buffer is whatever value was cheaply available, possibly empty.
    fn key_may_exist(&self, options: &ReadOptions, key: &str) -> (bool, String);

    fn property(&self, name: &str) -> Option<String>;

    /// Snapshot of the live options
    fn options(&self) -> EngineOptions;

    /// Change mutable column-family options
    fn set_options(&self, patch: &OptionsPatch) -> EngineResult<()>;

    /// Change mutable database-wide options
    fn set_db_options(&self, patch: &OptionsPatch) -> EngineResult<()>;

    fn flush(&self, options: &FlushOptions) -> EngineResult<()>;

    /// Replay whatever the primary has written since the last call
    fn try_catch_up_with_primary(&self) -> EngineResult<()>;

    /// Shut down and release every resource
    fn close(self) -> Status
    where
        Self: Sized;

    fn build_properties() -> BTreeMap<String, String>
    where
        Self: Sized;

    fn version() -> String
    where
        Self: Sized;

    /// `"<name> (<engine>) <version>\n"`, plus one indented
    /// `"<key>: <value>"` line per build property when `verbose`
    fn build_info(name: &str, verbose: bool) -> String
    where
        Self: Sized,
    {
        format_build_info(name, Self::name(), &Self::version(), &Self::build_properties(), verbose)
    }
}

pub(crate) fn format_build_info(
    name: &str,
    engine: &str,
    version: &str,
    properties: &BTreeMap<String, String>,
    verbose: bool,
) -> String {
    let mut info = format!("{} ({}) {}\n", name, engine, version);
    if verbose {
        for (key, value) in properties {
            info.push_str(&format!("    {}: {}\n", key, value));
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_without_properties() {
        let info = format_build_info("app", "StrataLog", "0.1.0", &BTreeMap::new(), true);
        assert_eq!(info, "app (StrataLog) 0.1.0\n");
    }

    #[test]
    fn test_build_info_verbose_lists_properties() {
        let mut properties = BTreeMap::new();
        properties.insert("target_os".to_string(), "linux".to_string());
        properties.insert("profile".to_string(), "debug".to_string());

        let terse = format_build_info("app", "E", "1", &properties, false);
        assert_eq!(terse, "app (E) 1\n");

        let verbose = format_build_info("app", "E", "1", &properties, true);
        assert_eq!(
            verbose,
            "app (E) 1\n    profile: debug\n    target_os: linux\n"
        );
    }
}
