use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("thread_count must satisfy 1 <= N <= 128, got {0}")]
    InvalidThreadCount(usize),

    #[error("slot {0} is already occupied")]
    SlotOccupied(usize),

    #[error("slot {0} does not exist in a pool of size {1}")]
    NoSuchSlot(usize, usize),

    #[error("worker thread for slot {0} disconnected unexpectedly")]
    WorkerDisconnected(usize),
}

pub type PoolResult<T> = Result<T, PoolError>;
