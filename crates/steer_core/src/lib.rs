//! steer_core — the Value Model (V).
//!
//! A uniformly typed container for named numeric/string results and grouped
//! result sets, with parse/format conversions to/from a small fixed set of
//! primitive types. This crate has no I/O and no knowledge of the report
//! tree, worker pool, or shell built on top of it; those live in
//! `steer_report`, `steer_pool`, and `steer_shell` respectively.

pub mod criterion;
pub mod data_type;
pub mod error;
pub mod value;

pub use criterion::{evaluate, Criterion, Evaluation};
pub use data_type::{get_native_value, DataType, NativeValue};
pub use error::{CoreError, CoreResult};
pub use value::{Value, ValueSet, ValueSetItem};
