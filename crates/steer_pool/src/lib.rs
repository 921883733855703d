//! The Worker Pool (W): a bounded pool that executes a caller-supplied
//! per-bitstream function concurrently, behind a batch-and-drain barrier
//! (spec §4.3). Knows nothing about the Report tree or the plug-in ABI —
//! it moves opaque buffers in and opaque results out.

pub mod error;
pub mod pool;

pub use error::{PoolError, PoolResult};
pub use pool::WorkerPool;
