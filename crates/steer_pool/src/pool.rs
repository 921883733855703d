//! Bounded worker pool with per-thread slot ownership (spec §4.3, §5).
//!
//! A slot is `(thread_id, test_id, input_buffer_ownership, scratch, result)`.
//! The shell hands a freshly-read buffer to the first available slot; when
//! every slot is occupied (or at end-of-stream) it *barriers*: awaits every
//! occupied worker, then folds results into the Report **in slot order**,
//! never in completion order (spec §4.3, §5 Ordering).
//!
//! Cross-thread shared mutable state is limited to one mutex-guarded
//! `running_count`, mirroring spec §5's single-counter rule; everything
//! else is per-slot and touched only by its owning worker during execution
//! and by the pool strictly after that worker has returned.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::error::{PoolError, PoolResult};

enum Task {
    Run { test_id: u64, buffer: Vec<u8> },
    Shutdown,
}

struct Slot<R> {
    task_tx: Sender<Task>,
    result_rx: Receiver<(u64, R)>,
    handle: Option<JoinHandle<()>>,
    occupied: bool,
}

/// A fixed-size worker pool. `R` is the per-bitstream result a worker
/// hands back to the shell for folding into the Report.
pub struct WorkerPool<R> {
    slots: Vec<Slot<R>>,
    running_count: Arc<Mutex<usize>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawns `thread_count` persistent worker threads, each running `work`
    /// against whatever buffer it is dispatched. `thread_count` must
    /// satisfy `1 <= N <= 128` (spec §4.3).
    pub fn new<F>(thread_count: usize, work: F) -> PoolResult<Self>
    where
        F: Fn(u64, &[u8]) -> R + Send + Sync + 'static,
    {
        if !(1..=128).contains(&thread_count) {
            return Err(PoolError::InvalidThreadCount(thread_count));
        }
        let work = Arc::new(work);
        let running_count = Arc::new(Mutex::new(0usize));
        let mut slots = Vec::with_capacity(thread_count);
        for thread_id in 0..thread_count {
            let (task_tx, task_rx) = crossbeam_channel::bounded::<Task>(1);
            let (result_tx, result_rx) = crossbeam_channel::bounded::<(u64, R)>(1);
            let work = work.clone();
            let running_count = running_count.clone();
            let handle = thread::Builder::new()
                .name(format!("steer-worker-{thread_id}"))
                .spawn(move || worker_main(thread_id, task_rx, result_tx, work, running_count))
                .expect("failed to spawn worker thread");
            slots.push(Slot {
                task_tx,
                result_rx,
                handle: Some(handle),
                occupied: false,
            });
        }
        Ok(Self { slots, running_count })
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_slot_available(&self, slot: usize) -> bool {
        self.slots.get(slot).map(|s| !s.occupied).unwrap_or(false)
    }

    /// Index of the first available slot, if any.
    pub fn first_available_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.occupied)
    }

    /// Hands `buffer` to `slot`'s thread, recording `test_id` as that slot's
    /// owner (spec §4.3 step 1). The slot must currently be available.
    pub fn dispatch(&mut self, slot: usize, test_id: u64, buffer: Vec<u8>) -> PoolResult<()> {
        let count = self.slots.len();
        let s = self
            .slots
            .get_mut(slot)
            .ok_or(PoolError::NoSuchSlot(slot, count))?;
        if s.occupied {
            return Err(PoolError::SlotOccupied(slot));
        }
        s.task_tx
            .send(Task::Run { test_id, buffer })
            .map_err(|_| PoolError::WorkerDisconnected(slot))?;
        s.occupied = true;
        Ok(())
    }

    /// Awaits completion of every occupied slot, applies results **in slot
    /// order**, and resets each drained slot back to available (spec §4.3
    /// step 2/3, §5 Ordering). Slots that were never dispatched this round
    /// are skipped.
    pub fn barrier(&mut self) -> PoolResult<Vec<(u64, R)>> {
        let mut results = Vec::new();
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if !slot.occupied {
                continue;
            }
            let (test_id, result) = slot
                .result_rx
                .recv()
                .map_err(|_| PoolError::WorkerDisconnected(idx))?;
            slot.occupied = false;
            results.push((test_id, result));
        }
        Ok(results)
    }

    /// Number of workers currently mid-task, observed through the single
    /// mutex-guarded counter (spec §5 "Shared mutable state").
    pub fn running_count(&self) -> usize {
        *self.running_count.lock().expect("running_count mutex poisoned")
    }
}

impl<R> Drop for WorkerPool<R> {
    fn drop(&mut self) {
        for slot in &self.slots {
            let _ = slot.task_tx.send(Task::Shutdown);
        }
        for slot in &mut self.slots {
            if let Some(handle) = slot.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

fn worker_main<R: Send + 'static>(
    thread_id: usize,
    task_rx: Receiver<Task>,
    result_tx: Sender<(u64, R)>,
    work: Arc<dyn Fn(u64, &[u8]) -> R + Send + Sync>,
    running_count: Arc<Mutex<usize>>,
) {
    while let Ok(task) = task_rx.recv() {
        match task {
            Task::Shutdown => break,
            Task::Run { test_id, buffer } => {
                {
                    let mut count = running_count.lock().expect("running_count mutex poisoned");
                    *count += 1;
                }
                let result = work(test_id, &buffer);
                {
                    let mut count = running_count.lock().expect("running_count mutex poisoned");
                    *count -= 1;
                }
                if result_tx.send((test_id, result)).is_err() {
                    tracing::warn!(thread_id, "worker result channel closed before send");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_oversized_thread_counts() {
        assert!(WorkerPool::new(0, |_, buf: &[u8]| buf.len()).is_err());
        assert!(WorkerPool::new(129, |_, buf: &[u8]| buf.len()).is_err());
    }

    #[test]
    fn dispatch_and_barrier_round_trip_in_slot_order() {
        let mut pool = WorkerPool::new(4, |test_id, buf: &[u8]| (test_id, buf.iter().map(|&b| b as u32).sum::<u32>())).unwrap();
        for slot in 0..4 {
            let test_id = slot as u64;
            pool.dispatch(slot, test_id, vec![1, 2, 3]).unwrap();
        }
        let results = pool.barrier().unwrap();
        assert_eq!(results.len(), 4);
        for (slot, (test_id, (echoed_id, sum))) in results.into_iter().enumerate() {
            assert_eq!(test_id, slot as u64);
            assert_eq!(echoed_id, slot as u64);
            assert_eq!(sum, 6);
        }
    }

    #[test]
    fn partial_batch_at_end_of_stream_drains_only_occupied_slots() {
        let mut pool = WorkerPool::new(4, |_, buf: &[u8]| buf.len()).unwrap();
        pool.dispatch(0, 0, vec![0; 8]).unwrap();
        pool.dispatch(2, 1, vec![0; 16]).unwrap();
        let results = pool.barrier().unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn dispatching_an_occupied_slot_is_an_error() {
        let mut pool = WorkerPool::new(1, |_, buf: &[u8]| buf.len()).unwrap();
        pool.dispatch(0, 0, vec![0; 8]).unwrap();
        assert!(matches!(pool.dispatch(0, 1, vec![0; 8]), Err(PoolError::SlotOccupied(0))));
        pool.barrier().unwrap();
    }
}
