//! Audio bridge tests

use nees_shared::RENDER_QUANTUM;

use super::{RenderConsumer, SampleProducer, channel};
use crate::config::AudioConfig;

fn bridge(slots: usize) -> (SampleProducer, RenderConsumer) {
    channel(&AudioConfig {
        pool_slots: slots,
        ..Default::default()
    })
}

/// Push one full batch whose samples all equal `value`
fn push_batch(producer: &mut SampleProducer, value: i16) {
    producer.push_samples(&[value; RENDER_QUANTUM]);
}

fn quantum() -> [f32; RENDER_QUANTUM] {
    [f32::NAN; RENDER_QUANTUM]
}

fn assert_conserved(consumer: &RenderConsumer) {
    assert_eq!(
        consumer.free_len() + consumer.ready_len() + consumer.in_flight_len(),
        consumer.capacity()
    );
}

// ============================================================================
// Producer Tests
// ============================================================================

#[test]
fn test_partial_batch_is_not_sent() {
    let (mut producer, consumer) = bridge(4);
    producer.push_samples(&[1; RENDER_QUANTUM - 1]);
    assert_eq!(producer.pending_len(), RENDER_QUANTUM - 1);
    assert_eq!(consumer.queued_len(), 0);

    producer.push_sample(1);
    assert_eq!(producer.pending_len(), 0);
    assert_eq!(consumer.queued_len(), 1);
    assert_eq!(producer.stats().batches_sent(), 1);
}

#[test]
fn test_exhausted_pool_drops_newest_at_producer() {
    let (mut producer, mut consumer) = bridge(4);
    for value in 1..=5 {
        push_batch(&mut producer, value);
    }
    assert_eq!(producer.stats().overruns(), 1);
    assert_eq!(producer.stats().batches_sent(), 4);
    assert_eq!(producer.free_len(), 0);
    assert_eq!(consumer.queued_len(), 4);

    assert_eq!(consumer.receive(), 4);
    let mut out = quantum();
    consumer.render(&mut out);
    assert_eq!(out[0], 1.0 / 32768.0);
}

// ============================================================================
// Consumer Tests
// ============================================================================

#[test]
fn test_received_batches_still_hold_their_slots() {
    let (mut producer, mut consumer) = bridge(4);
    for value in 1..=4 {
        push_batch(&mut producer, value);
    }
    assert_eq!(consumer.receive(), 4);
    assert_eq!(consumer.ready_len(), 4);
    assert_eq!(consumer.free_len(), 0);

    // Nothing was played, so every further batch overruns before it is sent
    for value in 5..=8 {
        push_batch(&mut producer, value);
        assert_eq!(consumer.queued_len(), 0);
    }
    assert_eq!(producer.stats().overruns(), 4);
    assert_eq!(producer.stats().batches_sent(), 4);
    assert_eq!(consumer.receive(), 0);
    assert_eq!(consumer.ready_len(), 4);
    assert_conserved(&consumer);
}

#[test]
fn test_played_slot_returns_to_producer() {
    let (mut producer, mut consumer) = bridge(4);
    for value in 1..=4 {
        push_batch(&mut producer, value);
    }
    let mut out = quantum();
    consumer.render(&mut out);
    assert_eq!(producer.free_len(), 1);

    push_batch(&mut producer, 5);
    push_batch(&mut producer, 6);
    assert_eq!(producer.stats().overruns(), 1);
    assert_conserved(&consumer);

    for expected in 2..=5 {
        consumer.render(&mut out);
        assert_eq!(out[0], f32::from(expected as i16) / 32768.0);
    }
    assert_eq!(consumer.stats().underruns(), 0);
}

#[test]
fn test_render_plays_in_seal_order() {
    let (mut producer, mut consumer) = bridge(8);
    let mut out = quantum();

    // Two batches produced per render, so slots are recycled while the
    // ready queue grows
    let mut expected = 0i16;
    for value in 0..12i16 {
        push_batch(&mut producer, value);
        if value % 2 == 1 {
            consumer.render(&mut out);
            assert_eq!(out[0], f32::from(expected) / 32768.0);
            expected += 1;
        }
    }
    while consumer.ready_len() > 0 {
        consumer.render(&mut out);
        assert_eq!(out[0], f32::from(expected) / 32768.0);
        expected += 1;
    }
    assert_eq!(expected, 12);
    assert_eq!(consumer.stats().overruns(), 0);
}

#[test]
fn test_conversion_range() {
    let (mut producer, mut consumer) = bridge(1);
    let mut batch = [0i16; RENDER_QUANTUM];
    batch[0] = i16::MIN;
    batch[1] = i16::MAX;
    batch[2] = -16384;
    producer.push_samples(&batch);

    let mut out = quantum();
    consumer.render(&mut out);
    assert_eq!(out[0], -1.0);
    assert_eq!(out[1], 32767.0 / 32768.0);
    assert_eq!(out[2], -0.5);
    assert_eq!(out[3], 0.0);
}

#[test]
fn test_volume_scales_output() {
    let (mut producer, mut consumer) = channel(&AudioConfig {
        volume: 0.5,
        ..Default::default()
    });
    push_batch(&mut producer, 16384);

    let mut out = quantum();
    consumer.render(&mut out);
    assert_eq!(out[0], 0.25);
}

#[test]
fn test_underrun_writes_silence() {
    let (_producer, mut consumer) = bridge(4);
    let mut out = quantum();
    consumer.render(&mut out);

    assert!(out.iter().all(|&s| s == 0.0));
    assert_eq!(consumer.stats().underruns(), 1);
    assert_eq!(consumer.free_len(), 4);
    assert_eq!(consumer.ready_len(), 0);
}

#[test]
fn test_consuming_all_slots_frees_pool() {
    let (mut producer, mut consumer) = bridge(4);
    for value in 0..4 {
        push_batch(&mut producer, value);
    }

    let mut out = quantum();
    for _ in 0..4 {
        consumer.render(&mut out);
    }
    assert_eq!(consumer.free_len(), 4);
    assert_eq!(consumer.ready_len(), 0);
    assert_eq!(consumer.in_flight_len(), 0);
    assert_eq!(consumer.stats().batches_played(), 4);
    assert_eq!(consumer.stats().underruns(), 0);
}

// ============================================================================
// Partial Quantum Tests
// ============================================================================

#[test]
fn test_short_requests_keep_slot_in_flight() {
    let (mut producer, mut consumer) = bridge(2);
    let samples: Vec<i16> = (0..RENDER_QUANTUM as i16).collect();
    producer.push_samples(&samples);

    let mut out = [0.0f32; 100];
    consumer.render(&mut out);
    assert_eq!(out[99], 99.0 / 32768.0);
    assert_eq!(consumer.in_flight_len(), 1);

    let mut rest = [f32::NAN; 28];
    consumer.render(&mut rest);
    assert_eq!(rest[0], 100.0 / 32768.0);
    assert_eq!(rest[27], 127.0 / 32768.0);
    assert_eq!(consumer.in_flight_len(), 0);
    assert_eq!(consumer.free_len(), 2);
    assert_eq!(consumer.stats().underruns(), 0);
}

#[test]
fn test_long_request_spans_slots_then_underruns_once() {
    let (mut producer, mut consumer) = bridge(4);
    push_batch(&mut producer, 7);
    push_batch(&mut producer, 9);

    let mut out = [f32::NAN; RENDER_QUANTUM * 3];
    consumer.render(&mut out);
    assert_eq!(out[0], 7.0 / 32768.0);
    assert_eq!(out[RENDER_QUANTUM], 9.0 / 32768.0);
    assert!(out[RENDER_QUANTUM * 2..].iter().all(|&s| s == 0.0));
    assert_eq!(consumer.stats().underruns(), 1);
    assert_eq!(consumer.stats().batches_played(), 2);
}

#[test]
fn test_interleaved_duplicates_mono() {
    let (mut producer, mut consumer) = bridge(1);
    let samples: Vec<i16> = (0..RENDER_QUANTUM as i16).collect();
    producer.push_samples(&samples);

    let mut out = [f32::NAN; RENDER_QUANTUM * 2];
    consumer.render_interleaved(&mut out, 2);
    for (i, frame) in out.chunks(2).enumerate() {
        let expected = i as f32 / 32768.0;
        assert_eq!(frame, [expected, expected]);
    }
    assert_eq!(consumer.stats().batches_played(), 1);
}
