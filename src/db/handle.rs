//! Database handle
//!
//! Request flow for every operation:
//! 1. Lifecycle check (fatal `DbError::NotRunning` unless Running)
//! 2. Argument validation (recoverable InvalidArgument status)
//! 3. Engine call
//! 4. Engine outcome mapped onto a `Response`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::DbConfig;
use crate::engine::{Engine, LogEngine};
use crate::observability::{Event, Logger, Severity, Timer};
use crate::options::{EngineOptions, FlushOptions, OptionsPatch, ReadOptions, WriteOptions};
use crate::status::Status;

use super::errors::{DbError, DbResult};
use super::lifecycle::{AccessMode, HandleState};
use super::response::Response;

const KEY_REQUIRED: &str = "Key must be non-empty";
const VALUE_REQUIRED: &str = "Value must be non-empty";
const CATCH_UP_ON_PRIMARY: &str =
    "TryCatchUpWithPrimary is not supported for non-secondary instance";

/// A stateful handle owning one engine connection.
///
/// Point operations take `&self` and may run concurrently. `close` takes
/// `&mut self`, so it cannot overlap them.
pub struct Database<E: Engine = LogEngine> {
    path: PathBuf,
    secondary_path: Option<PathBuf>,
    mode: AccessMode,
    state: HandleState,
    engine: Option<E>,
}

impl<E: Engine> Database<E> {
    /// Open a database.
    ///
    /// `read_only` opens a secondary instance tailing `path`, which requires
    /// a non-empty `secondary_path`.
    pub fn open(
        path: impl AsRef<Path>,
        options: &EngineOptions,
        read_only: bool,
        secondary_path: Option<&Path>,
    ) -> DbResult<Self> {
        let path = path.as_ref();
        let secondary_path = secondary_path.filter(|p| !p.as_os_str().is_empty());
        let mode = if read_only {
            AccessMode::Secondary
        } else {
            AccessMode::Primary
        };
        if read_only && secondary_path.is_none() {
            Logger::event(
                Event::DbOpenFailed,
                &[("error", DbError::MissingSecondaryPath.code())],
            );
            return Err(DbError::MissingSecondaryPath);
        }

        let db_path = path.display().to_string();
        Logger::event(
            Event::DbOpenBegin,
            &[("mode", mode.as_str()), ("path", db_path.as_str())],
        );
        let timer = Timer::new();

        let opened = match (mode, secondary_path) {
            (AccessMode::Secondary, Some(secondary)) => {
                E::open_as_secondary(path, secondary, options)
            }
            _ => E::open(path, options),
        };
        let engine = match opened {
            Ok(engine) => engine,
            Err(status) => {
                let status_text = status.to_string();
                Logger::event(
                    Event::DbOpenFailed,
                    &[("path", db_path.as_str()), ("status", status_text.as_str())],
                );
                return Err(DbError::OpenFailed(status));
            }
        };

        let db = Self {
            path: path.to_path_buf(),
            secondary_path: if read_only {
                secondary_path.map(Path::to_path_buf)
            } else {
                None
            },
            mode,
            state: HandleState::new().start()?,
            engine: Some(engine),
        };

        let elapsed = timer.elapsed_ms();
        Logger::event(
            Event::DbOpenComplete,
            &[
                ("duration_ms", elapsed.as_str()),
                ("mode", mode.as_str()),
                ("path", db_path.as_str()),
            ],
        );
        Ok(db)
    }

    pub fn open_primary(path: impl AsRef<Path>, options: &EngineOptions) -> DbResult<Self> {
        Self::open(path, options, false, None)
    }

    pub fn open_secondary(
        path: impl AsRef<Path>,
        secondary_path: impl AsRef<Path>,
        options: &EngineOptions,
    ) -> DbResult<Self> {
        Self::open(path, options, true, Some(secondary_path.as_ref()))
    }

    /// Validate `config`, apply its log level, then open
    pub fn open_with_config(config: &DbConfig) -> DbResult<Self> {
        config.validate()?;
        Logger::set_min_severity(config.log_level);
        Self::open(
            &config.path,
            &config.options,
            config.read_only,
            config.effective_secondary_path(),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn secondary_path(&self) -> Option<&Path> {
        self.secondary_path.as_deref()
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    fn engine(&self) -> DbResult<&E> {
        self.state.ensure_running()?;
        self.engine.as_ref().ok_or(DbError::NotRunning)
    }

    /// Found: ok with the value. Absent: NotFound with no value.
    pub fn get(&self, options: &ReadOptions, key: &str) -> DbResult<Response> {
        let engine = self.engine()?;
        if key.is_empty() {
            return Ok(invalid_argument(KEY_REQUIRED));
        }
        Ok(match engine.get(options, key) {
            Ok(Some(value)) => Response::with_value(Status::ok(), value),
            Ok(None) => Response::from_status(Status::not_found("")),
            Err(status) => Response::from_status(status),
        })
    }

    pub fn put(&self, options: &WriteOptions, key: &str, value: &str) -> DbResult<Response> {
        let engine = self.engine()?;
        if let Some(response) = validate_key_value(key, value) {
            return Ok(response);
        }
        Ok(Response::from_result(engine.put(options, key, value)))
    }

    /// On success the response echoes `value`
    pub fn merge(&self, options: &WriteOptions, key: &str, value: &str) -> DbResult<Response> {
        let engine = self.engine()?;
        if let Some(response) = validate_key_value(key, value) {
            return Ok(response);
        }
        Ok(match engine.merge(options, key, value) {
            Ok(()) => Response::with_value(Status::ok(), value),
            Err(status) => Response::from_status(status),
        })
    }

    /// Approximate existence check. Both outcomes carry the looked-up buffer as-is:
    /// ok when the key may exist, NotFound when it definitely does not.
    pub fn key_may_exist(&self, options: &ReadOptions, key: &str) -> DbResult<Response> {
        let engine = self.engine()?;
        if key.is_empty() {
            return Ok(invalid_argument(KEY_REQUIRED));
        }
        let (may_exist, value) = engine.key_may_exist(options, key);
        let status = if may_exist {
            Status::ok()
        } else {
            Status::not_found("")
        };
        Ok(Response::with_value(status, value))
    }

    pub fn delete(&self, options: &WriteOptions, key: &str) -> DbResult<Response> {
        let engine = self.engine()?;
        if key.is_empty() {
            return Ok(invalid_argument(KEY_REQUIRED));
        }
        Ok(Response::from_result(engine.delete(options, key)))
    }

    /// Always ok; carries a snapshot of the live options
    pub fn get_options(&self) -> DbResult<Response> {
        let engine = self.engine()?;
        Ok(Response::with_options(engine.options()))
    }

    /// Change mutable column-family options
    pub fn set_options(&self, patch: &OptionsPatch) -> DbResult<Response> {
        let engine = self.engine()?;
        let response = Response::from_result(engine.set_options(patch));
        self.log_options_change("column_family", patch, &response);
        Ok(response)
    }

    /// Change mutable database-wide options
    pub fn set_db_options(&self, patch: &OptionsPatch) -> DbResult<Response> {
        let engine = self.engine()?;
        let response = Response::from_result(engine.set_db_options(patch));
        self.log_options_change("database", patch, &response);
        Ok(response)
    }

    pub fn get_property(&self, name: &str) -> DbResult<Response> {
        let engine = self.engine()?;
        if name.is_empty() {
            return Ok(invalid_argument(KEY_REQUIRED));
        }
        Ok(match engine.property(name) {
            Some(value) => Response::with_value(Status::ok(), value),
            None => Response::from_status(Status::not_found(format!(
                "Property '{}' not found",
                name
            ))),
        })
    }

    pub fn flush(&self, options: &FlushOptions) -> DbResult<Response> {
        let engine = self.engine()?;
        let timer = Timer::new();
        let response = Response::from_result(engine.flush(options));
        let db_path = self.path.display().to_string();
        if response.is_ok() {
            let elapsed = timer.elapsed_ms();
            Logger::event(
                Event::FlushComplete,
                &[("duration_ms", elapsed.as_str()), ("path", db_path.as_str())],
            );
        } else {
            log_failure("flush", &db_path, response.status());
        }
        Ok(response)
    }

    /// Secondary only; a primary gets NotSupported without touching the engine
    pub fn try_catch_up_with_primary(&self) -> DbResult<Response> {
        let engine = self.engine()?;
        if !self.mode.is_secondary() {
            return Ok(Response::from_status(Status::not_supported(
                CATCH_UP_ON_PRIMARY,
            )));
        }
        let response = Response::from_result(engine.try_catch_up_with_primary());
        let db_path = self.path.display().to_string();
        if response.is_ok() {
            Logger::event(Event::CatchUpComplete, &[("path", db_path.as_str())]);
        } else {
            log_failure("try_catch_up_with_primary", &db_path, response.status());
        }
        Ok(response)
    }

    /// Running -> Closed; returns the engine's shutdown status.
    pub fn close(&mut self) -> DbResult<Response> {
        self.state = self.state.close()?;
        let status = match self.engine.take() {
            Some(engine) => engine.close(),
            None => Status::ok(),
        };

        let db_path = self.path.display().to_string();
        let status_text = status.to_string();
        let severity = if status.is_ok() {
            Severity::Info
        } else {
            Severity::Warn
        };
        Logger::event_at(
            severity,
            Event::DbClose,
            &[("path", db_path.as_str()), ("status", status_text.as_str())],
        );
        Ok(Response::from_status(status))
    }

    pub fn build_properties() -> BTreeMap<String, String> {
        E::build_properties()
    }

    pub fn version() -> String {
        E::version()
    }

    pub fn build_info(name: &str, verbose: bool) -> String {
        E::build_info(name, verbose)
    }

    fn log_options_change(&self, scope: &str, patch: &OptionsPatch, response: &Response) {
        let db_path = self.path.display().to_string();
        if !response.is_ok() {
            log_failure("set_options", &db_path, response.status());
            return;
        }
        let names = patch.iter().map(|(k, _)| k).collect::<Vec<_>>().join(",");
        Logger::event(
            Event::OptionsChanged,
            &[
                ("names", names.as_str()),
                ("path", db_path.as_str()),
                ("scope", scope),
            ],
        );
    }
}

impl<E: Engine> Drop for Database<E> {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.take() {
            let status = engine.close();
            if !status.is_ok() {
                let db_path = self.path.display().to_string();
                log_failure("close_on_drop", &db_path, &status);
            }
        }
    }
}

fn invalid_argument(message: &str) -> Response {
    Response::from_status(Status::invalid_argument(message))
}

fn validate_key_value(key: &str, value: &str) -> Option<Response> {
    if key.is_empty() {
        return Some(invalid_argument(KEY_REQUIRED));
    }
    if value.is_empty() {
        return Some(invalid_argument(VALUE_REQUIRED));
    }
    None
}

fn log_failure(operation: &str, path: &str, status: &Status) {
    let status_text = status.to_string();
    Logger::event(
        Event::OperationFailed,
        &[
            ("operation", operation),
            ("path", path),
            ("status", status_text.as_str()),
        ],
    );
}
