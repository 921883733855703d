//! The Report Tree (R): the append-only accumulator a Test Shell run writes
//! into, and its JSON projection (spec §3, §4.2, §6).
//!
//! `steer_report` depends on [`steer_core`] for the Value Model but knows
//! nothing about the worker pool, plug-in ABI, or scheduler — those crates
//! depend on this one, not the reverse.

pub mod error;
pub mod header;
pub mod parameter_set;
pub mod projection;
pub mod tree;

pub use error::{ReportError, ReportResult};
pub use header::{Header, ReportLevel};
pub use parameter_set::ParameterSet;
pub use projection::{parse_json, serialize_json};
pub use tree::{Configuration, Report, Test};
