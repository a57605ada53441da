//! # nodeconf-core
//!
//! Settings model for a sensor/alarm node.
//!
//! This crate provides:
//! - A declarative field schema (name, kind, default, sentinel, form policy)
//! - `ConfigStore`, the in-memory settings record driven by a schema
//! - JSON persistence through a pluggable `Storage` backend
//! - HTML form rendering and form submission binding
//!
//! This crate is intentionally runtime-agnostic and contains no async code,
//! making it usable on both a Linux host and a device target.

pub mod error;
pub mod form;
pub mod html;
pub mod node;
pub mod schema;
pub mod storage;
pub mod store;
pub mod value;

pub use error::{FieldError, FormErrors, InvalidNumber, LoadError, SaveError};
pub use form::FormArgs;
pub use node::NodeConfig;
pub use schema::{BlankPolicy, FieldSpec, Literal, Schema, Sentinel, NODE_SCHEMA};
pub use storage::{FileStorage, MemoryStorage, Storage, CONFIG_PATH, MAX_CONFIG_SIZE};
pub use store::{ConfigStore, LoadReport};
pub use value::{FieldKind, FieldValue, Value};
