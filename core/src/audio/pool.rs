//! Fixed-size pool of audio sample slots
//!
//! Slots move between a FIFO *free* queue, a FIFO *ready* queue and an
//! in-flight state (checked out for writing or playback). The pool never
//! grows: once a slot is checked out it must come back through `seal` or
//! `release`.

use std::collections::VecDeque;

use nees_shared::RENDER_QUANTUM;
use thiserror::Error;

/// One render quantum of signed 16-bit mono samples.
///
/// Copied by value across the audio channel, so producer and consumer never
/// alias the same storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBatch([i16; RENDER_QUANTUM]);

impl SampleBatch {
    /// A batch of digital silence.
    pub const fn silent() -> Self {
        Self([0; RENDER_QUANTUM])
    }

    pub fn samples(&self) -> &[i16; RENDER_QUANTUM] {
        &self.0
    }

    pub fn samples_mut(&mut self) -> &mut [i16; RENDER_QUANTUM] {
        &mut self.0
    }
}

impl Default for SampleBatch {
    fn default() -> Self {
        Self::silent()
    }
}

impl From<[i16; RENDER_QUANTUM]> for SampleBatch {
    fn from(samples: [i16; RENDER_QUANTUM]) -> Self {
        Self(samples)
    }
}

/// Index of a slot within one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a slot currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// In the free queue
    Free,
    /// Checked out by `acquire_free`, awaiting `seal`
    Writing,
    /// In the ready queue
    Ready,
    /// Checked out by `take_ready`, awaiting `release`
    Playing,
}

/// Misuse of the slot protocol. Pool state is unchanged when returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("slot {slot} is out of range for a pool of {capacity}")]
    OutOfRange { slot: usize, capacity: usize },
    #[error("slot {slot} is {actual:?}, expected {expected:?}")]
    WrongState {
        slot: usize,
        actual: SlotState,
        expected: SlotState,
    },
}

/// Bounded pool of sample slots with free and ready queues.
///
/// Both queues are preallocated to the pool size and never reallocate.
pub struct BufferPool {
    slots: Box<[SampleBatch]>,
    states: Box<[SlotState]>,
    free: VecDeque<SlotIndex>,
    ready: VecDeque<SlotIndex>,
}

impl BufferPool {
    /// Create a pool with `slots` entries, all free. A size of zero is
    /// raised to one.
    pub fn new(slots: usize) -> Self {
        let capacity = slots.max(1);
        let mut free = VecDeque::with_capacity(capacity);
        free.extend((0..capacity).map(SlotIndex));

        Self {
            slots: vec![SampleBatch::silent(); capacity].into_boxed_slice(),
            states: vec![SlotState::Free; capacity].into_boxed_slice(),
            free,
            ready: VecDeque::with_capacity(capacity),
        }
    }

    /// Pop the head of the free queue for writing.
    ///
    /// `None` means the pool is exhausted; callers drop their batch.
    pub fn acquire_free(&mut self) -> Option<SlotIndex> {
        let slot = self.free.pop_front()?;
        self.states[slot.0] = SlotState::Writing;
        Some(slot)
    }

    /// Write `batch` into an acquired slot and append it to the ready queue.
    pub fn seal(&mut self, slot: SlotIndex, batch: &SampleBatch) -> Result<(), PoolError> {
        self.expect_state(slot, SlotState::Writing)?;
        self.slots[slot.0] = *batch;
        self.states[slot.0] = SlotState::Ready;
        self.ready.push_back(slot);
        Ok(())
    }

    /// Pop the oldest sealed slot for playback, or `None` on starvation.
    pub fn take_ready(&mut self) -> Option<SlotIndex> {
        let slot = self.ready.pop_front()?;
        self.states[slot.0] = SlotState::Playing;
        Some(slot)
    }

    /// Return a played slot to the tail of the free queue.
    pub fn release(&mut self, slot: SlotIndex) -> Result<(), PoolError> {
        self.expect_state(slot, SlotState::Playing)?;
        self.states[slot.0] = SlotState::Free;
        self.free.push_back(slot);
        Ok(())
    }

    /// Samples held by `slot`.
    pub fn batch(&self, slot: SlotIndex) -> Option<&SampleBatch> {
        self.slots.get(slot.0)
    }

    pub fn state(&self, slot: SlotIndex) -> Option<SlotState> {
        self.states.get(slot.0).copied()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    /// Slots checked out for writing or playback.
    pub fn in_flight_len(&self) -> usize {
        self.capacity() - self.free.len() - self.ready.len()
    }

    fn expect_state(&self, slot: SlotIndex, expected: SlotState) -> Result<(), PoolError> {
        let actual = self.state(slot).ok_or(PoolError::OutOfRange {
            slot: slot.0,
            capacity: self.capacity(),
        })?;
        if actual != expected {
            return Err(PoolError::WrongState {
                slot: slot.0,
                actual,
                expected,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("capacity", &self.capacity())
            .field("free", &self.free)
            .field("ready", &self.ready)
            .finish()
    }
}
