//! stratakv - a synchronous request facade over an embedded key-value engine
//!
//! A [`Database`] handle owns one engine connection, opened either as the
//! primary read/write owner or as a read-only secondary tailing a primary.
//! Every operation returns `Result<Response, DbError>`: recoverable engine
//! outcomes travel as a [`Status`] inside the [`Response`], contract
//! violations as a [`DbError`].

pub mod client;
pub mod config;
pub mod db;
pub mod engine;
pub mod observability;
pub mod options;
pub mod status;

pub use client::AsyncDatabase;
pub use config::DbConfig;
pub use db::{AccessMode, Database, DbError, DbResult, HandleState, Response};
pub use engine::{Engine, EngineResult, LogEngine};
pub use options::{EngineOptions, FlushOptions, OptionScope, OptionsPatch, ReadOptions, WriteOptions};
pub use status::{Code, Status};
