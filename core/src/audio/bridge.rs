//! Audio handoff between the control loop and the real-time audio callback
//!
//! The render side owns the [`BufferPool`]. Slot indices circulate through
//! two fixed-capacity SPSC rings: free slots travel to the producer, sealed
//! batches travel back as `(slot, copy)` pairs. The producer claims a slot
//! before sending, so the pool size is the only bound on buffered audio and
//! a batch that finds no free slot is dropped on the producer side.
//!
//! Neither half blocks or allocates after construction.

use std::sync::Arc;

use nees_shared::RENDER_QUANTUM;
use ringbuf::{
    HeapCons, HeapProd, HeapRb,
    traits::{Consumer, Observer, Producer, Split},
};
use tracing::trace;

use super::metrics::BridgeStats;
use super::pool::{BufferPool, SampleBatch, SlotIndex};
use crate::config::AudioConfig;

/// Scale factor from signed 16-bit to normalised float
const I16_SCALE: f32 = 32768.0;

/// Create a connected producer/consumer pair sized from `config`.
///
/// Every slot starts in producer custody. Both rings hold as many entries
/// as the pool has slots, so neither can fill while slots are conserved.
pub fn channel(config: &AudioConfig) -> (SampleProducer, RenderConsumer) {
    let mut pool = BufferPool::new(config.pool_slots());
    let capacity = pool.capacity();
    let stats = Arc::new(BridgeStats::default());
    let (tx, rx) = HeapRb::<(SlotIndex, SampleBatch)>::new(capacity).split();
    let (mut free_tx, free_rx) = HeapRb::<SlotIndex>::new(capacity).split();

    while let Some(slot) = pool.acquire_free() {
        let _ = free_tx.try_push(slot);
    }

    let producer = SampleProducer {
        tx,
        free: free_rx,
        staging: SampleBatch::silent(),
        filled: 0,
        stats: Arc::clone(&stats),
    };
    let consumer = RenderConsumer {
        rx,
        free: free_tx,
        pool,
        cursor: None,
        volume: config.volume(),
        stats,
    };
    (producer, consumer)
}

/// Control-side half: accumulates emitted samples into batches.
pub struct SampleProducer {
    tx: HeapProd<(SlotIndex, SampleBatch)>,
    free: HeapCons<SlotIndex>,
    staging: SampleBatch,
    filled: usize,
    stats: Arc<BridgeStats>,
}

impl SampleProducer {
    /// Append one sample, handing the batch off once it is full.
    pub fn push_sample(&mut self, sample: i16) {
        self.staging.samples_mut()[self.filled] = sample;
        self.filled += 1;
        if self.filled == RENDER_QUANTUM {
            self.flush();
        }
    }

    pub fn push_samples(&mut self, samples: &[i16]) {
        for &sample in samples {
            self.push_sample(sample);
        }
    }

    /// Samples waiting in the current, not yet full batch.
    pub fn pending_len(&self) -> usize {
        self.filled
    }

    /// Slots the producer can still fill before batches are dropped.
    pub fn free_len(&self) -> usize {
        self.free.occupied_len()
    }

    /// Counters shared with the consumer half.
    pub fn stats(&self) -> &Arc<BridgeStats> {
        &self.stats
    }

    fn flush(&mut self) {
        self.filled = 0;
        let Some(slot) = self.free.try_pop() else {
            // Renderer is behind; the batch is dropped rather than waited on
            self.stats.record_overrun();
            trace!("no free audio slot, batch dropped");
            return;
        };
        match self.tx.try_push((slot, self.staging)) {
            Ok(()) => self.stats.record_sent(),
            Err(_) => self.stats.record_overrun(),
        }
    }
}

/// Read position inside the slot currently being played.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    slot: SlotIndex,
    pos: usize,
}

/// Render-side half: owns the buffer pool and fills host output buffers.
///
/// Every method is safe to call from a real-time audio callback.
pub struct RenderConsumer {
    rx: HeapCons<(SlotIndex, SampleBatch)>,
    free: HeapProd<SlotIndex>,
    pool: BufferPool,
    cursor: Option<Cursor>,
    volume: f32,
    stats: Arc<BridgeStats>,
}

impl RenderConsumer {
    /// Seal every batch waiting in the channel into its slot, appending it
    /// to the ready queue. Returns the number of batches sealed.
    pub fn receive(&mut self) -> usize {
        let mut sealed = 0;
        while let Some((slot, batch)) = self.rx.try_pop() {
            if self.pool.seal(slot, &batch).is_ok() {
                sealed += 1;
            }
        }
        sealed
    }

    /// Fill `out` with mono samples normalised to `[-1.0, 1.0)`.
    ///
    /// Ready slots are consumed in seal order. A slot that is only partly
    /// read stays in flight until the next call. When no slot is ready the
    /// remainder of `out` is silence and one underrun is counted.
    pub fn render(&mut self, out: &mut [f32]) {
        self.render_interleaved(out, 1);
    }

    /// Like [`render`](Self::render) for an interleaved buffer: each mono
    /// sample is written to all `channels` of a frame.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        self.receive();

        let mut frames = out.chunks_mut(channels.max(1));
        while let Some(frame) = frames.next() {
            match self.next_sample() {
                Some(sample) => frame.fill(sample),
                None => {
                    frame.fill(0.0);
                    frames.by_ref().for_each(|rest| rest.fill(0.0));
                    self.stats.record_underrun();
                    return;
                }
            }
        }
    }

    /// Batches waiting in the channel that have not yet reached the pool.
    pub fn queued_len(&self) -> usize {
        self.rx.occupied_len()
    }

    /// Slots handed back to the producer and not yet claimed.
    pub fn free_len(&self) -> usize {
        self.free.occupied_len()
    }

    /// Sealed batches not yet playing, including those still in the channel.
    pub fn ready_len(&self) -> usize {
        self.pool.ready_len() + self.queued_len()
    }

    /// Slots partly played, 0 or 1.
    pub fn in_flight_len(&self) -> usize {
        usize::from(self.cursor.is_some())
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    pub fn stats(&self) -> &Arc<BridgeStats> {
        &self.stats
    }

    fn next_sample(&mut self) -> Option<f32> {
        let cursor = match self.cursor {
            Some(cursor) => cursor,
            None => Cursor {
                slot: self.pool.take_ready()?,
                pos: 0,
            },
        };

        let raw = self
            .pool
            .batch(cursor.slot)
            .map_or(0, |batch| batch.samples()[cursor.pos]);

        let pos = cursor.pos + 1;
        if pos == RENDER_QUANTUM {
            self.cursor = None;
            if self.pool.release(cursor.slot).is_ok() {
                self.stats.record_played();
                self.hand_back();
            }
        } else {
            self.cursor = Some(Cursor { pos, ..cursor });
        }

        Some(f32::from(raw) / I16_SCALE * self.volume)
    }

    /// Move a released slot back into producer custody.
    fn hand_back(&mut self) {
        if let Some(slot) = self.pool.acquire_free() {
            let _ = self.free.try_push(slot);
        }
    }
}

impl std::fmt::Debug for RenderConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderConsumer")
            .field("pool", &self.pool)
            .field("cursor", &self.cursor)
            .field("volume", &self.volume)
            .finish()
    }
}
