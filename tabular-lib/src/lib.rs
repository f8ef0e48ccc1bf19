//! Tabular data engine for administrative list screens.
//!
//! The recurring logic behind form-driven CRUD tables — free-text search,
//! filter predicates, stable sorting, pagination, row selection with
//! indeterminate state, and bulk-action dispatch — extracted into one
//! reusable, I/O-free library. Hosts supply rows through the
//! [`source`] boundary and render whatever [`engine::TableEngine`]
//! derives.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod model;
pub mod patch;
pub mod query;
pub mod selection;
pub mod source;
pub mod store;

pub use config::TableConfig;
pub use engine::PageView;
pub use engine::TableEngine;
pub use engine::TableEvents;
pub use error::TableError;
