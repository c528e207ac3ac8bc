//! Exclusive hand-out of stateful processors to concurrent callers.
//!
//! A [`ProcessorPool`] owns a fixed set of processors. [`ProcessorPool::perform`]
//! leases one for the duration of a closure; when all of them are busy the
//! caller joins a FIFO queue and blocks until a finishing caller hands its
//! processor over directly. Only the head of the queue is woken, never the
//! whole queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

use crate::fft::FftError;

/// Override for the number of processors/transformers created per engine.
///
/// `0` means no override and `num_cpus::get()` is used.
static PROCESSOR_COUNT_OVERRIDE: AtomicUsize = AtomicUsize::new(0);

/// Set how many processors newly created pools and transformer sets get.
///
/// Passing `0` reverts to one per logical CPU. Existing pools are unaffected.
pub fn set_processor_count(count: usize) {
    PROCESSOR_COUNT_OVERRIDE.store(count, Ordering::Relaxed);
}

/// Processor count for new pools: the override, else the logical CPU count.
pub fn default_processor_count() -> usize {
    let override_count = PROCESSOR_COUNT_OVERRIDE.load(Ordering::Relaxed);
    if override_count != 0 {
        return override_count;
    }
    num_cpus::get().max(1)
}

struct Slot<P> {
    index: usize,
    processor: P,
}

/// Queue entry of a blocked caller. `slot` is only touched while the pool
/// mutex is held.
struct Waiter<P> {
    wake: Condvar,
    slot: Mutex<Option<Slot<P>>>,
}

struct PoolState<P> {
    free: Vec<Slot<P>>,
    queue: VecDeque<Arc<Waiter<P>>>,
}

pub struct ProcessorPool<P> {
    state: Mutex<PoolState<P>>,
    count: usize,
}

impl<P> ProcessorPool<P> {
    /// Create `count` processors with `make(index)`.
    pub fn new<F>(count: usize, mut make: F) -> Self
    where
        F: FnMut(usize) -> P,
    {
        let free = (0..count)
            .map(|index| Slot {
                index,
                processor: make(index),
            })
            .collect();
        engine_debug!("processor pool created with {} processors", count);
        Self {
            state: Mutex::new(PoolState {
                free,
                queue: VecDeque::new(),
            }),
            count,
        }
    }

    /// Pool sized by [`default_processor_count`].
    pub fn with_default_count<F>(make: F) -> Self
    where
        F: FnMut(usize) -> P,
    {
        Self::new(default_processor_count(), make)
    }

    pub fn processor_count(&self) -> usize {
        self.count
    }

    /// Processors not leased right now.
    pub fn idle_count(&self) -> usize {
        self.lock_state().free.len()
    }

    /// Callers blocked waiting for a processor.
    pub fn waiting_count(&self) -> usize {
        self.lock_state().queue.len()
    }

    /// Run `job` with exclusive access to one processor.
    ///
    /// Blocks while every processor is leased. The processor goes back into
    /// circulation when `job` returns or unwinds.
    pub fn perform<R, F>(&self, job: F) -> Result<R, FftError>
    where
        F: FnOnce(&mut P) -> R,
    {
        if self.count == 0 {
            return Err(FftError::EmptyPool);
        }
        let slot = self.acquire();
        let mut lease = Lease {
            pool: self,
            slot: Some(slot),
        };
        Ok(job(lease.processor()))
    }

    /// Like [`perform`](Self::perform), also passing the processor index.
    pub fn perform_indexed<R, F>(&self, job: F) -> Result<R, FftError>
    where
        F: FnOnce(usize, &mut P) -> R,
    {
        if self.count == 0 {
            return Err(FftError::EmptyPool);
        }
        let slot = self.acquire();
        let index = slot.index;
        let mut lease = Lease {
            pool: self,
            slot: Some(slot),
        };
        Ok(job(index, lease.processor()))
    }

    fn lock_state(&self) -> MutexGuard<'_, PoolState<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self) -> Slot<P> {
        let mut state = self.lock_state();
        if let Some(slot) = state.free.pop() {
            return slot;
        }
        let waiter = Arc::new(Waiter {
            wake: Condvar::new(),
            slot: Mutex::new(None),
        });
        state.queue.push_back(Arc::clone(&waiter));
        engine_debug!(
            "all {} processors busy, waiting at queue position {}",
            self.count,
            state.queue.len()
        );
        loop {
            state = waiter
                .wake
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            // spurious wake-ups find the slot still empty
            let handed = waiter
                .slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            if let Some(slot) = handed {
                return slot;
            }
        }
    }

    fn release(&self, slot: Slot<P>) {
        let mut state = self.lock_state();
        match state.queue.pop_front() {
            Some(waiter) => {
                *waiter.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(slot);
                waiter.wake.notify_one();
            }
            None => state.free.push(slot),
        }
    }
}

/// Returns the leased processor to the pool on drop.
struct Lease<'a, P> {
    pool: &'a ProcessorPool<P>,
    slot: Option<Slot<P>>,
}

impl<P> Lease<'_, P> {
    fn processor(&mut self) -> &mut P {
        match self.slot.as_mut() {
            Some(slot) => &mut slot.processor,
            None => unreachable!("lease holds its slot until dropped"),
        }
    }
}

impl<P> Drop for Lease<'_, P> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            self.pool.release(slot);
        }
    }
}
