//! Audio output using cpal
//!
//! The stream callback runs the render half of the audio bridge directly.
//! The device is opened at the pipeline's sample rate when it supports it;
//! there is no resampling, so any other rate plays at the wrong pitch.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use nees_core::{AudioConfig, BridgeStats, RenderConsumer};
use nees_shared::RENDER_QUANTUM;

/// Frames converted per pass in the callback; sized so no callback allocates
const SCRATCH_FRAMES: usize = 2048;

#[derive(Debug, Error)]
pub enum AudioOutputError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("failed to query output configs: {0}")]
    Configs(#[from] cpal::SupportedStreamConfigsError),
    #[error("failed to get default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build audio stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to play audio stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),
}

/// Running output stream fed by a [`RenderConsumer`]
pub struct AudioOutput {
    /// The cpal stream (kept alive for the duration)
    _stream: cpal::Stream,
    sample_rate: u32,
    channels: u16,
    stats: Arc<BridgeStats>,
}

impl AudioOutput {
    /// Open the default output device and start pulling from `consumer`.
    pub fn new(consumer: RenderConsumer, config: &AudioConfig) -> Result<Self, AudioOutputError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioOutputError::NoDevice)?;

        let supported = match pick_config(device.supported_output_configs()?, config.sample_rate)
        {
            Some(supported) => supported,
            None => {
                let fallback = device.default_output_config()?;
                warn!(
                    "Output device does not support {} Hz, using {} Hz (audio pitch will be off)",
                    config.sample_rate,
                    fallback.sample_rate().0
                );
                fallback
            }
        };

        let sample_format = supported.sample_format();
        let buffer_size = quantum_buffer_size(supported.buffer_size(), RENDER_QUANTUM as u32);
        let mut stream_config: cpal::StreamConfig = supported.into();
        stream_config.buffer_size = buffer_size;
        let stats = Arc::clone(consumer.stats());

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream(&device, &stream_config, consumer, |s| s)?,
            cpal::SampleFormat::I16 => build_stream(&device, &stream_config, consumer, f32_to_i16)?,
            cpal::SampleFormat::U16 => build_stream(&device, &stream_config, consumer, f32_to_u16)?,
            other => return Err(AudioOutputError::UnsupportedFormat(other)),
        };
        stream.play()?;

        info!(
            "Audio output: {} Hz, {} channel(s), {:?}, buffer {:?}",
            stream_config.sample_rate.0, stream_config.channels, sample_format, buffer_size
        );
        debug!("Audio stream started");

        Ok(Self {
            _stream: stream,
            sample_rate: stream_config.sample_rate.0,
            channels: stream_config.channels,
            stats,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn stats(&self) -> &Arc<BridgeStats> {
        &self.stats
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut consumer: RenderConsumer,
    convert: fn(f32) -> T,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + Send + 'static,
{
    let channels = usize::from(config.channels.max(1));
    let mut scratch = vec![0.0f32; SCRATCH_FRAMES * channels];

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for chunk in data.chunks_mut(scratch.len()) {
                let mixed = &mut scratch[..chunk.len()];
                consumer.render_interleaved(mixed, channels);
                for (dst, &src) in chunk.iter_mut().zip(mixed.iter()) {
                    *dst = convert(src);
                }
            }
        },
        |err| error!("Audio stream error: {}", err),
        None,
    )
}

/// Choose a config that runs at exactly `sample_rate`, preferring float
/// output and then the fewest channels.
fn pick_config(
    ranges: impl IntoIterator<Item = cpal::SupportedStreamConfigRange>,
    sample_rate: u32,
) -> Option<cpal::SupportedStreamConfig> {
    let rate = cpal::SampleRate(sample_rate);
    ranges
        .into_iter()
        .filter(|range| range.min_sample_rate() <= rate && rate <= range.max_sample_rate())
        .filter_map(|range| format_rank(range.sample_format()).map(|rank| (rank, range)))
        .min_by_key(|(rank, range)| (*rank, range.channels()))
        .map(|(_, range)| range.with_sample_rate(rate))
}

/// Ask for callbacks of exactly one render quantum when the device allows
/// it. Otherwise the host default applies and partial quanta carry over.
fn quantum_buffer_size(supported: &cpal::SupportedBufferSize, frames: u32) -> cpal::BufferSize {
    match supported {
        cpal::SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&frames) => {
            cpal::BufferSize::Fixed(frames)
        }
        _ => cpal::BufferSize::Default,
    }
}

fn format_rank(format: cpal::SampleFormat) -> Option<u8> {
    match format {
        cpal::SampleFormat::F32 => Some(0),
        cpal::SampleFormat::I16 => Some(1),
        cpal::SampleFormat::U16 => Some(2),
        _ => None,
    }
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample * 32768.0).clamp(-32768.0, 32767.0) as i16
}

fn f32_to_u16(sample: f32) -> u16 {
    (sample * 32768.0 + 32768.0).clamp(0.0, 65535.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpal::{SampleFormat, SampleRate, SupportedBufferSize, SupportedStreamConfigRange};

    fn range(channels: u16, min: u32, max: u32, format: SampleFormat) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn test_pick_config_requires_rate() {
        let ranges = vec![range(2, 44_100, 48_000, SampleFormat::F32)];
        assert!(pick_config(ranges, 15_720).is_none());
    }

    #[test]
    fn test_pick_config_prefers_float_then_fewer_channels() {
        let ranges = vec![
            range(1, 8_000, 48_000, SampleFormat::I16),
            range(2, 8_000, 48_000, SampleFormat::F32),
            range(1, 8_000, 48_000, SampleFormat::F32),
        ];
        let config = pick_config(ranges, 15_720).unwrap();
        assert_eq!(config.sample_format(), SampleFormat::F32);
        assert_eq!(config.channels(), 1);
        assert_eq!(config.sample_rate(), SampleRate(15_720));
    }

    #[test]
    fn test_quantum_buffer_size_when_in_range() {
        let range = SupportedBufferSize::Range { min: 64, max: 4096 };
        assert_eq!(quantum_buffer_size(&range, 128), cpal::BufferSize::Fixed(128));
    }

    #[test]
    fn test_quantum_buffer_size_falls_back_to_default() {
        let too_small = SupportedBufferSize::Range { min: 256, max: 4096 };
        assert_eq!(quantum_buffer_size(&too_small, 128), cpal::BufferSize::Default);
        assert_eq!(
            quantum_buffer_size(&SupportedBufferSize::Unknown, 128),
            cpal::BufferSize::Default
        );
    }

    #[test]
    fn test_integer_conversion_inverts_normalisation() {
        assert_eq!(f32_to_i16(-1.0), i16::MIN);
        assert_eq!(f32_to_i16(32767.0 / 32768.0), i16::MAX);
        assert_eq!(f32_to_i16(0.0), 0);
        assert_eq!(f32_to_u16(0.0), 32768);
        assert_eq!(f32_to_u16(-1.0), 0);
        assert_eq!(f32_to_u16(1.0), 65535);
    }
}
