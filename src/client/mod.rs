//! Async client
//!
//! Wraps a [`Database`] for async callers. Each call runs on tokio's
//! blocking pool; at most `workers` calls run at once. Point operations
//! share a read lock on the handle while `close` takes the write lock, so
//! close waits for in-flight calls and later calls see a closed handle.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tokio::sync::Semaphore;

use crate::config::DbConfig;
use crate::db::{Database, DbError, DbResult, Response};
use crate::engine::{Engine, LogEngine};
use crate::observability::{Event, Logger};
use crate::options::{EngineOptions, FlushOptions, OptionsPatch, ReadOptions, WriteOptions};

/// Program name reported in build info
pub const CLIENT_NAME: &str = "stratakv";

pub struct AsyncDatabase<E: Engine + 'static = LogEngine> {
    inner: Arc<RwLock<Database<E>>>,
    permits: Arc<Semaphore>,
    workers: usize,
    path: PathBuf,
    secondary_path: Option<PathBuf>,
}

impl<E: Engine + 'static> AsyncDatabase<E> {
    /// Open from a config. Paths are made absolute before validation.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let mut config = config;
        config.path = absolute(&config.path)?;
        let secondary = config.effective_secondary_path().map(absolute).transpose()?;
        if secondary.is_some() {
            config.secondary_path = secondary;
        }
        config.validate()?;

        let info = E::build_info(CLIENT_NAME, true);
        Logger::event(Event::BuildInfo, &[("info", info.as_str())]);

        let workers = config.workers;
        let path = config.path.clone();
        let secondary_path = config.effective_secondary_path().map(Path::to_path_buf);

        let db = tokio::task::spawn_blocking(move || Database::<E>::open_with_config(&config))
            .await
            .map_err(|e| DbError::TaskFailed(e.to_string()))??;

        Ok(Self {
            inner: Arc::new(RwLock::new(db)),
            permits: Arc::new(Semaphore::new(workers)),
            workers,
            path,
            secondary_path,
        })
    }

    pub async fn open_primary(
        path: impl Into<PathBuf>,
        options: EngineOptions,
        workers: usize,
    ) -> DbResult<Self> {
        Self::open(DbConfig::primary(path, options).with_workers(workers)).await
    }

    pub async fn open_secondary(
        path: impl Into<PathBuf>,
        secondary_path: impl Into<PathBuf>,
        options: EngineOptions,
        workers: usize,
    ) -> DbResult<Self> {
        Self::open(DbConfig::secondary(path, secondary_path, options).with_workers(workers)).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn secondary_path(&self) -> Option<&Path> {
        self.secondary_path.as_deref()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// False once closed, and while a close is in progress
    pub fn is_running(&self) -> bool {
        self.inner
            .try_read()
            .map(|db| db.is_running())
            .unwrap_or(false)
    }

    async fn run<F>(&self, call: F) -> DbResult<Response>
    where
        F: FnOnce(&Database<E>) -> DbResult<Response> + Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| DbError::TaskFailed(e.to_string()))?;
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let db = inner
                .read()
                .map_err(|_| DbError::TaskFailed("database lock poisoned".to_string()))?;
            call(&*db)
        })
        .await
        .map_err(|e| DbError::TaskFailed(e.to_string()))?
    }

    pub async fn get(&self, options: ReadOptions, key: impl Into<String>) -> DbResult<Response> {
        let key = key.into();
        self.run(move |db| db.get(&options, &key)).await
    }

    pub async fn put(
        &self,
        options: WriteOptions,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> DbResult<Response> {
        let (key, value) = (key.into(), value.into());
        self.run(move |db| db.put(&options, &key, &value)).await
    }

    pub async fn merge(
        &self,
        options: WriteOptions,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> DbResult<Response> {
        let (key, value) = (key.into(), value.into());
        self.run(move |db| db.merge(&options, &key, &value)).await
    }

    pub async fn key_may_exist(
        &self,
        options: ReadOptions,
        key: impl Into<String>,
    ) -> DbResult<Response> {
        let key = key.into();
        self.run(move |db| db.key_may_exist(&options, &key)).await
    }

    pub async fn delete(&self, options: WriteOptions, key: impl Into<String>) -> DbResult<Response> {
        let key = key.into();
        self.run(move |db| db.delete(&options, &key)).await
    }

    pub async fn get_options(&self) -> DbResult<Response> {
        self.run(|db| db.get_options()).await
    }

    pub async fn set_options(&self, patch: OptionsPatch) -> DbResult<Response> {
        self.run(move |db| db.set_options(&patch)).await
    }

    pub async fn set_db_options(&self, patch: OptionsPatch) -> DbResult<Response> {
        self.run(move |db| db.set_db_options(&patch)).await
    }

    pub async fn get_property(&self, name: impl Into<String>) -> DbResult<Response> {
        let name = name.into();
        self.run(move |db| db.get_property(&name)).await
    }

    pub async fn flush(&self, options: FlushOptions) -> DbResult<Response> {
        self.run(move |db| db.flush(&options)).await
    }

    pub async fn try_catch_up_with_primary(&self) -> DbResult<Response> {
        self.run(|db| db.try_catch_up_with_primary()).await
    }

    /// Waits for in-flight calls, then closes the handle
    pub async fn close(&self) -> DbResult<Response> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| DbError::TaskFailed(e.to_string()))?;
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut db = inner
                .write()
                .map_err(|_| DbError::TaskFailed("database lock poisoned".to_string()))?;
            db.close()
        })
        .await
        .map_err(|e| DbError::TaskFailed(e.to_string()))?
    }

    pub fn build_info(verbose: bool) -> String {
        E::build_info(CLIENT_NAME, verbose)
    }

    pub fn version() -> String {
        E::version()
    }
}

fn absolute(path: &Path) -> DbResult<PathBuf> {
    if path.as_os_str().is_empty() || path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| DbError::ConfigIo(format!("current directory: {}", e)))?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_keeps_absolute_paths() {
        let path = Path::new("/var/lib/strata");
        assert_eq!(absolute(path).unwrap(), PathBuf::from("/var/lib/strata"));
    }

    #[test]
    fn test_absolute_resolves_relative_paths() {
        let resolved = absolute(Path::new("data/db")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("data/db"));
    }

    #[test]
    fn test_empty_path_left_for_validation() {
        assert_eq!(absolute(Path::new("")).unwrap(), PathBuf::new());
    }
}
