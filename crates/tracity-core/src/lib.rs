//! Tracity Core: error taxonomy, configuration, record model, query IR.

pub mod chart;
pub mod config;
pub mod error;
pub mod query;
pub mod record;

pub use chart::ChartKind;
pub use config::{DataPaths, TracityConfig};
pub use error::{Error, Result};
pub use query::{CompiledQuery, Predicate, SortDirection, SortSpec};
pub use record::{FieldKind, Record};
